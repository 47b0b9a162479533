// src/publish/week.rs
use chrono::{Datelike, NaiveDate};

use crate::model::WeeklyIssue;

pub const DEFAULT_THEME: &str = "Numero della settimana";

/// ISO-8601 (year, week) bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IssueWeek {
    pub year: i32,
    pub week: u32,
}

impl IssueWeek {
    pub fn from_date(date: NaiveDate) -> Self {
        let iso = date.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// `YYYYWW`, e.g. 2026 week 2 is `202602`.
    pub fn issue_id(&self) -> u32 {
        self.year.max(0) as u32 * 100 + self.week
    }

    pub fn default_title(&self, publication_name: &str) -> String {
        format!("{} #{} ({})", publication_name, self.week, self.year)
    }

    /// Fresh, empty issue for this week dated `today`.
    pub fn new_issue(&self, publication_name: &str, today: NaiveDate) -> WeeklyIssue {
        WeeklyIssue {
            id: self.issue_id(),
            titolo: self.default_title(publication_name),
            tema: DEFAULT_THEME.to_string(),
            data: today.format("%Y-%m-%d").to_string(),
            articoli: Vec::new(),
        }
    }
}
