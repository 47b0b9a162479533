// src/config/admin.rs
use anyhow::{Context, Result};
use std::{fs, path::Path};

use crate::model::{AdminConfig, DEFAULT_ISSUE_TITLE, DEFAULT_PUBLICATION_NAME};

/// Load the admin config. An absent file yields defaults; a malformed one is an error.
pub fn load_admin_config<P: AsRef<Path>>(path: P) -> Result<AdminConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "admin config absent, using defaults");
        return Ok(AdminConfig::default());
    }
    let data = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let cfg: AdminConfig =
        serde_json::from_str(&data).with_context(|| format!("parsing {}", path.display()))?;
    Ok(sanitize(cfg))
}

fn sanitize(mut cfg: AdminConfig) -> AdminConfig {
    if cfg.issue_title.trim().is_empty() {
        cfg.issue_title = DEFAULT_ISSUE_TITLE.to_string();
    }
    if cfg.publication_name.trim().is_empty() {
        cfg.publication_name = DEFAULT_PUBLICATION_NAME.to_string();
    }
    cfg.feeds.retain(|f| !f.url.trim().is_empty());
    cfg
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_admin_config(dir.path().join("nope.json")).unwrap();
        assert_eq!(cfg, AdminConfig::default());
    }

    #[test]
    fn blanks_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("admin.json");
        fs::write(
            &p,
            r#"{"issue_title":"  ","max_candidates_in_issue":5,
               "feeds":[{"url":""},{"url":"https://a.test/rss","name":"A"}]}"#,
        )
        .unwrap();
        let cfg = load_admin_config(&p).unwrap();
        assert_eq!(cfg.issue_title, DEFAULT_ISSUE_TITLE);
        assert_eq!(cfg.max_candidates_in_issue, 5);
        assert_eq!(cfg.feeds.len(), 1);
        assert_eq!(cfg.feeds[0].name.as_deref(), Some("A"));
    }

    #[test]
    fn malformed_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("admin.json");
        fs::write(&p, r#"{"max_candidates_in_issue":"many"}"#).unwrap();
        assert!(load_admin_config(&p).is_err());
    }
}
