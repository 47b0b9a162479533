// src/scout/providers/rss.rs
//! RSS 2.0 / Atom feed provider (HTTP or embedded fixture).

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use metrics::{counter, histogram};
use quick_xml::de::from_str;
use serde::Deserialize;
use std::time::Duration;
use time::{
    format_description::well_known::{Rfc2822, Rfc3339},
    OffsetDateTime,
};

use crate::scout::normalize_text;
use crate::scout::types::{FeedEntry, FeedSource};

pub const USER_AGENT: &str = "ketogo-bot/1.0";
const HTTP_TIMEOUT: Duration = Duration::from_secs(20);

// --- RSS 2.0 ---
#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}
#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    item: Vec<Item>,
}
#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    description: Option<String>,
}

// --- Atom ---
#[derive(Debug, Deserialize)]
struct AtomFeed {
    #[serde(rename = "entry", default)]
    entry: Vec<AtomEntry>,
}
#[derive(Debug, Deserialize)]
struct AtomEntry {
    title: Option<AtomText>,
    #[serde(default)]
    link: Vec<AtomLink>,
    summary: Option<AtomText>,
    published: Option<String>,
    updated: Option<String>,
}
#[derive(Debug, Deserialize)]
struct AtomText {
    #[serde(rename = "$text", default)]
    value: String,
}
#[derive(Debug, Deserialize)]
struct AtomLink {
    #[serde(rename = "@href")]
    href: Option<String>,
    #[serde(rename = "@rel")]
    rel: Option<String>,
}

fn parse_rfc2822_to_unix(ts: &str) -> Option<i64> {
    OffsetDateTime::parse(ts.trim(), &Rfc2822)
        .ok()
        .map(|dt| dt.unix_timestamp())
}

fn parse_rfc3339_to_unix(ts: &str) -> Option<i64> {
    OffsetDateTime::parse(ts.trim(), &Rfc3339)
        .ok()
        .map(|dt| dt.unix_timestamp())
}

fn clean_link(link: Option<String>) -> Option<String> {
    link.map(|l| l.trim().to_string()).filter(|l| !l.is_empty())
}

fn clean_summary(s: Option<&str>) -> Option<String> {
    s.map(normalize_text).filter(|s| !s.is_empty())
}

fn from_rss(rss: Rss) -> Vec<FeedEntry> {
    rss.channel
        .item
        .into_iter()
        .map(|it| FeedEntry {
            title: normalize_title(it.title.as_deref().unwrap_or_default()),
            link: clean_link(it.link),
            summary: clean_summary(it.description.as_deref()),
            published_at: it.pub_date.as_deref().and_then(parse_rfc2822_to_unix),
        })
        .collect()
}

fn from_atom(feed: AtomFeed) -> Vec<FeedEntry> {
    feed.entry
        .into_iter()
        .map(|e| {
            // Prefer rel="alternate" (or no rel); fall back to the first href.
            let link = e
                .link
                .iter()
                .find(|l| matches!(l.rel.as_deref(), None | Some("alternate")))
                .or_else(|| e.link.first())
                .and_then(|l| l.href.clone());
            FeedEntry {
                title: normalize_title(e.title.as_ref().map(|t| t.value.as_str()).unwrap_or_default()),
                link: clean_link(link),
                summary: clean_summary(e.summary.as_ref().map(|t| t.value.as_str())),
                published_at: e
                    .published
                    .as_deref()
                    .or(e.updated.as_deref())
                    .and_then(parse_rfc3339_to_unix),
            }
        })
        .collect()
}

/// Titles keep their punctuation; only entities, tags and whitespace are cleaned.
fn normalize_title(s: &str) -> String {
    let decoded = html_escape::decode_html_entities(s);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parses an RSS 2.0 or Atom document into entries, in document order.
pub fn parse_feed(xml: &str) -> Result<Vec<FeedEntry>> {
    let t0 = std::time::Instant::now();
    let xml_clean = scrub_html_entities_for_xml(xml);

    let entries = match from_str::<Rss>(&xml_clean) {
        Ok(rss) => from_rss(rss),
        // Every Atom field is optional, so only try it on something that looks like a feed.
        Err(rss_err) if !xml_clean.contains("<feed") => {
            return Err(anyhow!("not an rss or atom document ({rss_err})"))
                .context("parsing feed xml")
        }
        Err(_) => from_atom(from_str::<AtomFeed>(&xml_clean).context("parsing atom xml")?),
    };

    let ms = t0.elapsed().as_secs_f64() * 1_000.0;
    histogram!("scout_parse_ms").record(ms);
    counter!("scout_entries_total").increment(entries.len() as u64);
    Ok(entries)
}

pub struct RssFeed {
    name: String,
    mode: Mode,
}

enum Mode {
    Fixture(String),
    Http { url: String, client: reqwest::Client },
}

impl RssFeed {
    pub fn from_fixture(name: &str, xml: &str) -> Self {
        Self {
            name: name.to_string(),
            mode: Mode::Fixture(xml.to_string()),
        }
    }

    /// HTTP feed; `name` falls back to the url's host.
    pub fn from_url(url: &str, name: Option<&str>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(HTTP_TIMEOUT)
            .build()
            .context("building http client")?;
        let name = name
            .map(str::to_string)
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| host_of(url));
        Ok(Self {
            name,
            mode: Mode::Http {
                url: url.to_string(),
                client,
            },
        })
    }
}

fn host_of(url: &str) -> String {
    reqwest::Url::parse(url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
        .unwrap_or_else(|| url.to_string())
}

#[async_trait]
impl FeedSource for RssFeed {
    async fn fetch_entries(&self) -> Result<Vec<FeedEntry>> {
        match &self.mode {
            Mode::Fixture(s) => parse_feed(s),
            Mode::Http { url, client } => {
                let resp = client
                    .get(url)
                    .header(
                        reqwest::header::ACCEPT,
                        "application/rss+xml, application/atom+xml, application/xml, text/xml, */*",
                    )
                    .send()
                    .await
                    .with_context(|| format!("GET {url}"))?
                    .error_for_status()
                    .with_context(|| format!("GET {url}"))?;
                let body = resp.text().await.context("feed http .text()")?;
                parse_feed(&body).with_context(|| format!("feed {url}"))
            }
        }
    }

    fn name(&self) -> &str {
        &self.name
    }
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&hellip;", "...")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
        .replace("&lsquo;", "'")
        .replace("&rsquo;", "'")
}
