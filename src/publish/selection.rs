// src/publish/selection.rs
//! Scanner for the edited checklist: which candidates were ticked, and with which title.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// Lines scanned for the final-title label, counting the selection line itself.
pub const FINAL_TITLE_WINDOW: usize = 10;

pub const FINAL_TITLE_LABEL: &str = "Titolo finale:";

static RE_SELECTED: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^- \[[xX]\] \*\*\(ID: ([A-Za-z0-9]{6,20})\)\*\*").expect("selection regex")
});

static RE_FINAL_TITLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"{}\s*(.*)$", regex::escape(FINAL_TITLE_LABEL)))
        .expect("final title regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub id: String,
    /// Trimmed; empty when no label was found in the window.
    pub title_override: String,
}

/// Id of a ticked selection line, if `line` is one.
pub fn selected_id(line: &str) -> Option<&str> {
    RE_SELECTED
        .captures(line.trim())
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn final_title_in(lines: &[&str]) -> String {
    lines
        .iter()
        .find_map(|l| RE_FINAL_TITLE.captures(l))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Selections in document order. A repeated id keeps its first occurrence.
pub fn parse_selections(document: &str) -> Vec<Selection> {
    let lines: Vec<&str> = document.lines().collect();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();

    for (i, &line) in lines.iter().enumerate() {
        let Some(id) = selected_id(line) else {
            continue;
        };
        if !seen.insert(id) {
            tracing::debug!(%id, line = i + 1, "duplicate selection ignored");
            continue;
        }
        let end = (i + FINAL_TITLE_WINDOW).min(lines.len());
        out.push(Selection {
            id: id.to_string(),
            title_override: final_title_in(&lines[i..end]),
        });
    }
    out
}
