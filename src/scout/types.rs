// src/scout/types.rs
use anyhow::Result;

/// One entry as read from a feed, before it becomes a backlog candidate.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, PartialEq, Eq, Default)]
pub struct FeedEntry {
    pub title: String,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published_at: Option<i64>, // unix seconds
}

#[async_trait::async_trait]
pub trait FeedSource: Send + Sync {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>>;
    /// Name recorded as the candidate's `source`.
    fn name(&self) -> &str;
}
