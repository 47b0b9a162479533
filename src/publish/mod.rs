// src/publish/mod.rs
//! Publisher: turns an edited checklist into articles of the current week's issue.
//!
//! Stages: Idle -> Parsing -> Resolving -> Bucketing -> Merging -> Committed, or NoOp
//! straight from Parsing when nothing is ticked. Stores are only written in the commit
//! stage: the archive first, then the pruned backlog. If the backlog write fails the
//! published candidates stay in the backlog, and a re-run skips them as duplicates.
//!
//! Re-running with the same (or a larger) document never duplicates an article: ids
//! already in the target issue are skipped, and published candidates leave the backlog.

pub mod selection;
pub mod week;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use metrics::{counter, describe_counter};
use once_cell::sync::OnceCell;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::model::{Article, Candidate, CandidateStore, IssueArchive, WeeklyIssue};
use crate::store::Store;
use selection::{parse_selections, Selection};
use week::IssueWeek;

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("{0} not found")]
    MissingInput(String),
}

/// Reads the edited document. A missing file is fatal and reported before any store is read.
pub fn read_document(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(PublishError::MissingInput(path.display().to_string()).into());
    }
    std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Parsing,
    Resolving,
    Bucketing,
    Merging,
    Committed,
    NoOp,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Idle => "idle",
            Stage::Parsing => "parsing",
            Stage::Resolving => "resolving",
            Stage::Bucketing => "bucketing",
            Stage::Merging => "merging",
            Stage::Committed => "committed",
            Stage::NoOp => "noop",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub issue_id: u32,
    pub published: usize,
    /// Resolved but already present in the target issue.
    pub skipped: usize,
    /// Ticked ids with no matching candidate.
    pub unknown: usize,
    pub remaining: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// No ticked selection lines; nothing was persisted.
    NoOp,
    Committed(PublishReport),
}

impl PublishOutcome {
    /// One-line summary printed by the CLI.
    pub fn summary(&self) -> String {
        match self {
            PublishOutcome::NoOp => "No selected items.".to_string(),
            PublishOutcome::Committed(r) => format!(
                "Published {} items. Backlog now {}.",
                r.published, r.remaining
            ),
        }
    }
}

fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("publish_articles_total", "Articles appended to weekly issues.");
        describe_counter!(
            "publish_duplicates_skipped_total",
            "Selections skipped because the issue already had the article."
        );
        describe_counter!(
            "publish_unknown_ids_total",
            "Ticked ids not found in the backlog."
        );
    });
}

fn enter(stage: Stage) {
    tracing::debug!(target: "publish", %stage, "stage");
}

/// Pairs each selection with its candidate; unknown ids are dropped.
pub fn resolve<'a>(
    selections: &'a [Selection],
    backlog: &'a CandidateStore,
) -> (Vec<(&'a Candidate, &'a str)>, usize) {
    let mut unknown = 0usize;
    let mut out = Vec::with_capacity(selections.len());
    for sel in selections {
        match backlog.find(&sel.id) {
            Some(c) => out.push((c, sel.title_override.as_str())),
            None => {
                tracing::debug!(id = %sel.id, "selected id not in backlog");
                unknown += 1;
            }
        }
    }
    (out, unknown)
}

/// Appends articles in order, skipping ids the issue already has. Returns merged ids.
pub fn merge(issue: &mut WeeklyIssue, resolved: &[(&Candidate, &str)]) -> Vec<String> {
    let mut merged = Vec::new();
    for (candidate, title_override) in resolved {
        if issue.has_article(&candidate.id) {
            tracing::debug!(id = %candidate.id, issue = issue.id, "already in issue, skipping");
            continue;
        }
        issue
            .articoli
            .push(Article::from_candidate(candidate, title_override));
        merged.push(candidate.id.clone());
    }
    merged
}

pub struct Publisher<'s, C, A> {
    candidates: &'s C,
    archive: &'s A,
    publication_name: String,
}

impl<'s, C, A> Publisher<'s, C, A>
where
    C: Store<CandidateStore>,
    A: Store<IssueArchive>,
{
    pub fn new(candidates: &'s C, archive: &'s A, publication_name: impl Into<String>) -> Self {
        Self {
            candidates,
            archive,
            publication_name: publication_name.into(),
        }
    }

    /// Publishes every ticked, known candidate into the ISO week of `today`.
    pub fn publish(&self, document: &str, today: NaiveDate) -> Result<PublishOutcome> {
        ensure_metrics_described();

        enter(Stage::Idle);
        enter(Stage::Parsing);
        let selections = parse_selections(document);
        if selections.is_empty() {
            enter(Stage::NoOp);
            tracing::info!(target: "publish", "no selected items");
            return Ok(PublishOutcome::NoOp);
        }

        enter(Stage::Resolving);
        let mut backlog = self.candidates.load()?;
        let mut archive = self.archive.load()?;
        let (resolved, unknown) = resolve(&selections, &backlog);

        enter(Stage::Bucketing);
        let week = IssueWeek::from_date(today);
        let issue = archive.get_or_insert_with(week.issue_id(), || {
            tracing::info!(target: "publish", issue = week.issue_id(), "creating weekly issue");
            week.new_issue(&self.publication_name, today)
        });

        enter(Stage::Merging);
        let merged = merge(issue, &resolved);
        let skipped = resolved.len() - merged.len();
        let issue_id = issue.id;

        let merged_ids: HashSet<String> = merged.into_iter().collect();
        backlog.candidates.retain(|c| !merged_ids.contains(&c.id));

        // Archive before backlog: a failure in between can only leave duplicates to skip.
        self.archive.save(&archive)?;
        self.candidates.save(&backlog)?;
        enter(Stage::Committed);

        counter!("publish_articles_total").increment(merged_ids.len() as u64);
        counter!("publish_duplicates_skipped_total").increment(skipped as u64);
        counter!("publish_unknown_ids_total").increment(unknown as u64);

        let report = PublishReport {
            issue_id,
            published: merged_ids.len(),
            skipped,
            unknown,
            remaining: backlog.len(),
        };
        tracing::info!(
            target: "publish",
            issue = report.issue_id,
            published = report.published,
            skipped = report.skipped,
            unknown = report.unknown,
            remaining = report.remaining,
            "publish committed"
        );
        Ok(PublishOutcome::Committed(report))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 14).unwrap()
    }

    fn backlog() -> CandidateStore {
        CandidateStore {
            candidates: vec![
                Candidate {
                    id: "abcdef1234".into(),
                    title_suggested: "Foo".into(),
                    url: "http://x/abcdef1234".into(),
                    summary: Some("S".into()),
                    ..Default::default()
                },
                Candidate {
                    id: "keepme0001".into(),
                    title_suggested: "Keep".into(),
                    url: "http://x/keepme0001".into(),
                    ..Default::default()
                },
            ],
        }
    }

    #[test]
    fn no_selection_is_noop_without_writes() {
        let c = MemoryStore::new(backlog());
        let a = MemoryStore::new(IssueArchive::default());
        let p = Publisher::new(&c, &a, "Ketogo");
        let out = p.publish("- [ ] **(ID: abcdef1234)** nope", today()).unwrap();
        assert_eq!(out, PublishOutcome::NoOp);
        assert_eq!(out.summary(), "No selected items.");
        assert_eq!(c.save_count(), 0);
        assert_eq!(a.save_count(), 0);
    }

    #[test]
    fn unknown_ids_still_create_the_week_issue() {
        let c = MemoryStore::new(backlog());
        let a = MemoryStore::new(IssueArchive::default());
        let p = Publisher::new(&c, &a, "Ketogo");
        let out = p
            .publish("- [x] **(ID: missing999)** Titolo proposto: ?", today())
            .unwrap();
        let PublishOutcome::Committed(r) = out else {
            panic!("expected commit")
        };
        assert_eq!((r.published, r.unknown, r.remaining), (0, 1, 2));
        let archive = a.snapshot();
        assert_eq!(archive.numeri.len(), 1);
        assert!(archive.numeri[0].articoli.is_empty());
    }

    #[test]
    fn stage_names_start_at_idle() {
        let names: Vec<String> = [Stage::Idle, Stage::Parsing, Stage::NoOp]
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(names, vec!["idle", "parsing", "noop"]);
    }

    #[test]
    fn merge_skips_existing_ids() {
        let store = backlog();
        let mut issue = IssueWeek::from_date(today()).new_issue("Ketogo", today());
        let pairs: Vec<(&Candidate, &str)> = vec![(&store.candidates[0], "")];
        assert_eq!(merge(&mut issue, &pairs), vec!["abcdef1234".to_string()]);
        assert!(merge(&mut issue, &pairs).is_empty());
        assert_eq!(issue.articoli.len(), 1);
    }

    #[test]
    fn missing_document_is_typed_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_document(&dir.path().join("ISSUE_BODY.md")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PublishError>(),
            Some(PublishError::MissingInput(_))
        ));
    }
}
