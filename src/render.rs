// src/render.rs
//! Renders the backlog as the markdown checklist editors tick and annotate.
//! The line shapes here are what `publish::selection` parses back.

use crate::model::{AdminConfig, CandidateStore};
use crate::publish::selection::FINAL_TITLE_LABEL;
use std::fmt::Write as _;

pub const INSTRUCTIONS: &str = "\
Qui trovi le proposte accumulate.
**Come funziona:**
1) Metti la spunta `[x]` sulle proposte da pubblicare
2) (Opzionale) modifica la riga `Titolo finale:`
3) Commenta `PUBBLICA` per pubblicare automaticamente

---
";

pub const EMPTY_BACKLOG: &str =
    "_Nessuna proposta al momento. Lo scout giornaliero riempirà questa lista._\n";

/// Pure: same inputs, same document.
pub fn render_issue(cfg: &AdminConfig, store: &CandidateStore) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# {}\n", cfg.issue_title.trim());
    out.push_str(INSTRUCTIONS);

    if store.is_empty() || cfg.max_candidates_in_issue == 0 {
        out.push_str(EMPTY_BACKLOG);
        return out;
    }

    for c in store.candidates.iter().take(cfg.max_candidates_in_issue) {
        let _ = writeln!(
            out,
            "- [ ] **(ID: {})** Titolo proposto: {}",
            c.id, c.title_suggested
        );
        if let Some(source) = c.source.as_deref().filter(|s| !s.is_empty()) {
            let _ = writeln!(out, "  - Fonte: {source}");
        }
        let _ = writeln!(out, "  - Link: {}", c.url);
        if let Some(summary) = c.summary.as_deref().filter(|s| !s.is_empty()) {
            let _ = writeln!(out, "  - Nota: {summary}");
        }
        let _ = writeln!(out, "  - {FINAL_TITLE_LABEL} {}\n", c.title_final);
    }
    out
}
