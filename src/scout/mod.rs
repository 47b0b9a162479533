// src/scout/mod.rs
//! Scout: pulls configured feeds and prepends unseen links to the backlog.

pub mod providers;
pub mod types;

use crate::ids::unique_candidate_id;
use crate::model::{AdminConfig, Candidate, CandidateStore};
use crate::scout::providers::rss::RssFeed;
use crate::scout::types::{FeedEntry, FeedSource};
use crate::store::Store;
use anyhow::Result;
use metrics::{counter, describe_counter, describe_histogram, gauge};
use once_cell::sync::OnceCell;
use std::collections::HashSet;

/// Max chars kept from a feed summary.
pub const SUMMARY_MAX_CHARS: usize = 500;

/// One-time metrics registration.
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("scout_entries_total", "Entries parsed from feeds.");
        describe_counter!(
            "scout_candidates_added_total",
            "New candidates prepended to the backlog."
        );
        describe_counter!("scout_feed_errors_total", "Feed fetch/parse errors.");
        describe_histogram!("scout_parse_ms", "Feed parse time in milliseconds.");
    });
}

/// Normalize feed text: decode entities, strip tags, fold whitespace, cap length.
pub fn normalize_text(s: &str) -> String {
    // 1) HTML entity decode
    let mut out = html_escape::decode_html_entities(s).to_string();

    // 2) Strip HTML tags
    static RE_TAGS: OnceCell<regex::Regex> = OnceCell::new();
    let re_tags = RE_TAGS.get_or_init(|| regex::Regex::new(r"(?is)</?[^>]+>").unwrap());
    out = re_tags.replace_all(&out, "").to_string();

    // 3) Normalize typographic quotes to ASCII
    out = out
        .replace(['\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'], "\"")
        .replace(['\u{2018}', '\u{2019}'], "'");

    // 4) Collapse whitespace (NBSP included)
    static RE_WS: OnceCell<regex::Regex> = OnceCell::new();
    let re_ws = RE_WS.get_or_init(|| regex::Regex::new(r"[\s\u{00A0}]+").unwrap());
    out = re_ws.replace_all(&out, " ").trim().to_string();

    // 5) Length cap
    if out.chars().count() > SUMMARY_MAX_CHARS {
        out = out.chars().take(SUMMARY_MAX_CHARS).collect();
    }

    out
}

/// The `n` newest entries. Undated entries sort after dated ones; ties keep feed order.
pub fn most_recent(mut entries: Vec<FeedEntry>, n: usize) -> Vec<FeedEntry> {
    entries.sort_by_key(|e| std::cmp::Reverse(e.published_at.map_or(i64::MIN, |t| t)));
    entries.truncate(n);
    entries
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScoutOptions {
    pub entries_per_feed: usize,
    pub max_backlog: usize,
}

impl From<&AdminConfig> for ScoutOptions {
    fn from(cfg: &AdminConfig) -> Self {
        Self {
            entries_per_feed: cfg.entries_per_feed,
            max_backlog: cfg.max_backlog,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoutReport {
    pub added: usize,
    /// Oldest candidates cut by the backlog cap.
    pub dropped: usize,
    pub feed_errors: usize,
}

/// Builds HTTP feed sources from the admin config. Invalid entries are logged and skipped.
pub fn sources_from_config(cfg: &AdminConfig) -> Vec<Box<dyn FeedSource>> {
    let mut out: Vec<Box<dyn FeedSource>> = Vec::with_capacity(cfg.feeds.len());
    for f in &cfg.feeds {
        if f.url.trim().is_empty() {
            tracing::warn!("feed entry without url, skipping");
            continue;
        }
        match RssFeed::from_url(f.url.trim(), f.name.as_deref()) {
            Ok(feed) => out.push(Box::new(feed)),
            Err(e) => tracing::warn!(error = ?e, url = %f.url, "cannot build feed source"),
        }
    }
    out
}

/// Fetch every source and prepend unseen links to `backlog`, then apply the cap.
/// A failing feed is logged and skipped; the rest of the run continues.
pub async fn run_once(
    sources: &[Box<dyn FeedSource>],
    backlog: &mut CandidateStore,
    opts: ScoutOptions,
) -> ScoutReport {
    ensure_metrics_described();

    let mut report = ScoutReport::default();
    let mut urls: HashSet<String> = backlog.candidates.iter().map(|c| c.url.clone()).collect();
    let mut ids: HashSet<String> = backlog.candidates.iter().map(|c| c.id.clone()).collect();

    for source in sources {
        let entries = match source.fetch_entries().await {
            Ok(v) => v,
            Err(e) => {
                tracing::warn!(error = ?e, feed = source.name(), "feed error, skipping");
                counter!("scout_feed_errors_total").increment(1);
                report.feed_errors += 1;
                continue;
            }
        };

        let mut added_here = 0usize;
        for entry in most_recent(entries, opts.entries_per_feed) {
            let Some(url) = entry.link else { continue };
            if urls.contains(&url) {
                continue;
            }
            let Some(id) = unique_candidate_id(&url, &ids) else {
                tracing::warn!(%url, "no free id for url, skipping");
                continue;
            };
            ids.insert(id.clone());
            urls.insert(url.clone());
            backlog.candidates.insert(
                0,
                Candidate {
                    id,
                    title_suggested: entry.title,
                    title_final: String::new(),
                    url,
                    source: Some(source.name().to_string()).filter(|s| !s.is_empty()),
                    summary: entry.summary,
                },
            );
            added_here += 1;
        }
        tracing::debug!(feed = source.name(), added = added_here, "feed scanned");
        report.added += added_here;
    }

    if backlog.candidates.len() > opts.max_backlog {
        report.dropped = backlog.candidates.len() - opts.max_backlog;
        backlog.candidates.truncate(opts.max_backlog);
    }

    counter!("scout_candidates_added_total").increment(report.added as u64);
    gauge!("scout_backlog_size").set(backlog.candidates.len() as f64);

    report
}

/// Load the backlog, run once, persist.
pub async fn scout<S: Store<CandidateStore>>(
    store: &S,
    sources: &[Box<dyn FeedSource>],
    opts: ScoutOptions,
) -> Result<ScoutReport> {
    let mut backlog = store.load()?;
    let report = run_once(sources, &mut backlog, opts).await;
    store.save(&backlog)?;
    tracing::info!(
        target: "scout",
        added = report.added,
        dropped = report.dropped,
        feed_errors = report.feed_errors,
        backlog = backlog.len(),
        "scout run finished"
    );
    Ok(report)
}
