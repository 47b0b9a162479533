// tests/scout_pipeline.rs
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use ketogo_curator::ids::candidate_id;
use ketogo_curator::scout::types::{FeedEntry, FeedSource};
use ketogo_curator::scout::{run_once, scout, ScoutOptions};
use ketogo_curator::store::MemoryStore;
use ketogo_curator::{Candidate, CandidateStore};

struct MockFeed {
    name: &'static str,
    entries: Vec<FeedEntry>,
}

#[async_trait]
impl FeedSource for MockFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        Ok(self.entries.clone())
    }
    fn name(&self) -> &str {
        self.name
    }
}

struct BrokenFeed;

#[async_trait]
impl FeedSource for BrokenFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        Err(anyhow!("connection refused"))
    }
    fn name(&self) -> &str {
        "broken"
    }
}

fn entry(n: usize) -> FeedEntry {
    FeedEntry {
        title: format!("Post {n}"),
        link: Some(format!("https://feed.test/{n}")),
        summary: Some(format!("About {n}")),
        published_at: Some(1_790_000_000 + n as i64),
    }
}

fn opts() -> ScoutOptions {
    ScoutOptions {
        entries_per_feed: 20,
        max_backlog: 500,
    }
}

#[tokio::test]
async fn new_links_are_prepended_and_known_urls_skipped() {
    let mut backlog = CandidateStore {
        candidates: vec![Candidate {
            id: "legacy1234".into(),
            title_suggested: "Already here".into(),
            url: "https://feed.test/1".into(),
            ..Default::default()
        }],
    };
    let sources: Vec<Box<dyn FeedSource>> = vec![Box::new(MockFeed {
        name: "Feed",
        entries: vec![entry(2), entry(1), entry(2)],
    })];

    let report = run_once(&sources, &mut backlog, opts()).await;
    assert_eq!(report.added, 1);
    assert_eq!(backlog.len(), 2);

    let newest = &backlog.candidates[0];
    assert_eq!(newest.url, "https://feed.test/2");
    assert_eq!(newest.id, candidate_id("https://feed.test/2"));
    assert_eq!(newest.source.as_deref(), Some("Feed"));
    assert_eq!(newest.summary.as_deref(), Some("About 2"));
    assert_eq!(newest.title_final, "");
    // Stored legacy ids are left alone.
    assert_eq!(backlog.candidates[1].id, "legacy1234");
}

#[tokio::test]
async fn only_newest_entries_per_feed_are_taken() {
    let mut backlog = CandidateStore::default();
    let sources: Vec<Box<dyn FeedSource>> = vec![Box::new(MockFeed {
        name: "Feed",
        entries: (0..30).map(entry).collect(),
    })];
    let report = run_once(&sources, &mut backlog, opts()).await;
    assert_eq!(report.added, 20);
    // Oldest of the taken entries was inserted last, so it sits at the head.
    assert_eq!(backlog.candidates[0].url, "https://feed.test/10");
    assert!(backlog.candidates.iter().all(|c| c.url != "https://feed.test/9"));
}

#[tokio::test]
async fn backlog_never_exceeds_cap() {
    let mut backlog = CandidateStore {
        candidates: (100..108)
            .map(|n| Candidate {
                id: format!("old{n:07}"),
                url: format!("https://old.test/{n}"),
                ..Default::default()
            })
            .collect(),
    };
    let sources: Vec<Box<dyn FeedSource>> = vec![Box::new(MockFeed {
        name: "Feed",
        entries: (0..5).map(entry).collect(),
    })];
    let report = run_once(
        &sources,
        &mut backlog,
        ScoutOptions {
            entries_per_feed: 20,
            max_backlog: 10,
        },
    )
    .await;
    assert_eq!(report.added, 5);
    assert_eq!(report.dropped, 3);
    assert_eq!(backlog.len(), 10);
    // The oldest stored entries are the ones dropped.
    assert_eq!(backlog.candidates.last().unwrap().url, "https://old.test/104");
}

#[tokio::test]
async fn failing_feed_is_skipped() {
    let store = MemoryStore::new(CandidateStore::default());
    let sources: Vec<Box<dyn FeedSource>> = vec![
        Box::new(BrokenFeed),
        Box::new(MockFeed {
            name: "Good",
            entries: vec![entry(1)],
        }),
    ];
    let report = scout(&store, &sources, opts()).await.unwrap();
    assert_eq!(report.feed_errors, 1);
    assert_eq!(report.added, 1);
    assert_eq!(store.save_count(), 1);
    assert_eq!(store.snapshot().candidates[0].source.as_deref(), Some("Good"));
}

#[tokio::test]
async fn same_url_in_two_feeds_added_once() {
    let mut backlog = CandidateStore::default();
    let sources: Vec<Box<dyn FeedSource>> = vec![
        Box::new(MockFeed {
            name: "One",
            entries: vec![entry(7)],
        }),
        Box::new(MockFeed {
            name: "Two",
            entries: vec![entry(7), entry(8)],
        }),
    ];
    let report = run_once(&sources, &mut backlog, opts()).await;
    assert_eq!(report.added, 2);
    let urls: Vec<&str> = backlog.candidates.iter().map(|c| c.url.as_str()).collect();
    // Within a feed the newest entry is taken first, so the older one ends on top.
    assert_eq!(urls, vec!["https://feed.test/8", "https://feed.test/7"]);
}
