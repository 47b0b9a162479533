// src/config/mod.rs
pub mod admin;

use clap::Args;
use std::path::PathBuf;

pub const ENV_ADMIN_PATH: &str = "KETOGO_ADMIN_PATH";
pub const ENV_CANDIDATES_PATH: &str = "KETOGO_CANDIDATES_PATH";
pub const ENV_NUMERI_PATH: &str = "KETOGO_NUMERI_PATH";
pub const ENV_ISSUE_BODY_PATH: &str = "ISSUE_BODY_PATH";

pub const DEFAULT_ADMIN_PATH: &str = "data/ketogo_admin.json";
pub const DEFAULT_CANDIDATES_PATH: &str = "data/candidates.json";
pub const DEFAULT_NUMERI_PATH: &str = "data/numeri.json";
pub const DEFAULT_ISSUE_BODY_PATH: &str = "ISSUE_BODY.md";

/// Locations of the three persisted JSON documents.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    /// Admin config (issue title, feeds, limits)
    #[arg(long, global = true, env = ENV_ADMIN_PATH, default_value = DEFAULT_ADMIN_PATH)]
    pub admin: PathBuf,

    /// Candidate backlog
    #[arg(long, global = true, env = ENV_CANDIDATES_PATH, default_value = DEFAULT_CANDIDATES_PATH)]
    pub candidates: PathBuf,

    /// Published weekly issues
    #[arg(long, global = true, env = ENV_NUMERI_PATH, default_value = DEFAULT_NUMERI_PATH)]
    pub numeri: PathBuf,
}

impl Default for DataPaths {
    fn default() -> Self {
        Self {
            admin: PathBuf::from(DEFAULT_ADMIN_PATH),
            candidates: PathBuf::from(DEFAULT_CANDIDATES_PATH),
            numeri: PathBuf::from(DEFAULT_NUMERI_PATH),
        }
    }
}
