// src/model.rs
//! Persisted data shapes: backlog candidates, weekly issues and the admin config.
//! Field names follow the JSON files already in use (Italian keys included).

use serde::{Deserialize, Deserializer, Serialize};

pub const DEFAULT_ISSUE_TITLE: &str = "Ketogo — Backlog proposte";
pub const DEFAULT_PUBLICATION_NAME: &str = "Ketogo";
pub const DEFAULT_MAX_CANDIDATES_IN_ISSUE: usize = 50;
pub const DEFAULT_MAX_BACKLOG: usize = 500;
pub const DEFAULT_ENTRIES_PER_FEED: usize = 20;

/// A content suggestion waiting for human review.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Candidate {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub title_suggested: String,
    /// Editor override; empty means "use the suggested title".
    #[serde(default)]
    pub title_final: String,
    #[serde(default)]
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

/// The backlog, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct CandidateStore {
    #[serde(default, deserialize_with = "candidates_with_id")]
    pub candidates: Vec<Candidate>,
}

/// Records without an id can never be selected; they are dropped on load.
fn candidates_with_id<'de, D>(deserializer: D) -> Result<Vec<Candidate>, D::Error>
where
    D: Deserializer<'de>,
{
    let all = Vec::<Candidate>::deserialize(deserializer)?;
    let total = all.len();
    let kept: Vec<Candidate> = all
        .into_iter()
        .filter(|c| !c.id.trim().is_empty())
        .collect();
    if kept.len() < total {
        tracing::warn!(dropped = total - kept.len(), "backlog entries without id ignored");
    }
    Ok(kept)
}

impl CandidateStore {
    pub fn find(&self, id: &str) -> Option<&Candidate> {
        self.candidates.iter().find(|c| c.id == id)
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.candidates.iter().any(|c| c.url == url)
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Fonte {
    #[serde(default)]
    pub nome: String,
    #[serde(default)]
    pub url: String,
}

/// A published item. `id` is the id of the candidate it came from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Article {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub titolo: String,
    #[serde(default)]
    pub testo: String,
    #[serde(default)]
    pub fonte: Fonte,
}

impl Article {
    /// Builds the article for `candidate`; a non-blank override wins over the suggested title.
    pub fn from_candidate(candidate: &Candidate, title_override: &str) -> Self {
        let override_trimmed = title_override.trim();
        let titolo = if override_trimmed.is_empty() {
            candidate.title_suggested.clone()
        } else {
            override_trimmed.to_string()
        };
        Self {
            id: candidate.id.clone(),
            titolo,
            testo: candidate
                .summary
                .as_deref()
                .unwrap_or_default()
                .trim()
                .to_string(),
            fonte: Fonte {
                nome: candidate.source.clone().unwrap_or_default(),
                url: candidate.url.clone(),
            },
        }
    }
}

/// One bundle per ISO week. `id` is `YYYYWW` as an integer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WeeklyIssue {
    #[serde(default)]
    pub id: u32,
    #[serde(default)]
    pub titolo: String,
    #[serde(default)]
    pub tema: String,
    /// ISO date (YYYY-MM-DD) of the first publish into this issue.
    #[serde(default)]
    pub data: String,
    #[serde(default)]
    pub articoli: Vec<Article>,
}

impl WeeklyIssue {
    pub fn has_article(&self, id: &str) -> bool {
        self.articoli.iter().any(|a| a.id == id)
    }
}

/// Published issues, newest first.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct IssueArchive {
    #[serde(default)]
    pub numeri: Vec<WeeklyIssue>,
}

impl IssueArchive {
    pub fn find(&self, id: u32) -> Option<&WeeklyIssue> {
        self.numeri.iter().find(|n| n.id == id)
    }

    /// Returns the issue with `id`, inserting the one built by `create` at the head if absent.
    pub fn get_or_insert_with<F>(&mut self, id: u32, create: F) -> &mut WeeklyIssue
    where
        F: FnOnce() -> WeeklyIssue,
    {
        let idx = match self.numeri.iter().position(|n| n.id == id) {
            Some(idx) => idx,
            None => {
                self.numeri.insert(0, create());
                0
            }
        };
        &mut self.numeri[idx]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedConfig {
    pub url: String,
    /// Display name stored as the candidate's `source`; defaults to the channel title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

fn default_issue_title() -> String {
    DEFAULT_ISSUE_TITLE.to_string()
}
fn default_publication_name() -> String {
    DEFAULT_PUBLICATION_NAME.to_string()
}
fn default_max_candidates_in_issue() -> usize {
    DEFAULT_MAX_CANDIDATES_IN_ISSUE
}
fn default_max_backlog() -> usize {
    DEFAULT_MAX_BACKLOG
}
fn default_entries_per_feed() -> usize {
    DEFAULT_ENTRIES_PER_FEED
}

/// Admin config (`data/ketogo_admin.json`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AdminConfig {
    #[serde(default = "default_issue_title")]
    pub issue_title: String,
    #[serde(default = "default_max_candidates_in_issue")]
    pub max_candidates_in_issue: usize,
    #[serde(default)]
    pub feeds: Vec<FeedConfig>,
    #[serde(default = "default_publication_name")]
    pub publication_name: String,
    #[serde(default = "default_max_backlog")]
    pub max_backlog: usize,
    #[serde(default = "default_entries_per_feed")]
    pub entries_per_feed: usize,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            issue_title: default_issue_title(),
            max_candidates_in_issue: default_max_candidates_in_issue(),
            feeds: Vec::new(),
            publication_name: default_publication_name(),
            max_backlog: default_max_backlog(),
            entries_per_feed: default_entries_per_feed(),
        }
    }
}
