// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod cli;
pub mod config;
pub mod ids;
pub mod model;
pub mod publish;
pub mod render;
pub mod scout;
pub mod store;

// ---- Re-exports for stable public API ----
pub use crate::model::{AdminConfig, Article, Candidate, CandidateStore, IssueArchive, WeeklyIssue};
pub use crate::publish::{PublishOutcome, PublishReport, Publisher};
pub use crate::store::{JsonFileStore, MemoryStore, Store};
