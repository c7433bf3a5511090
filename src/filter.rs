//! Selection of one user's worklogs and their flattening into report rows.

use chrono::NaiveDate;
use jira_api::{Worklog, WorklogAuthor};

use crate::error::ExportError;

/// Inclusive calendar-date bounds. Either side may be open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DateRange {
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self, ExportError> {
        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(ExportError::Validation(
                    "startdate must be on/before enddate.".to_string(),
                ));
            }
        }
        Ok(Self { start, end })
    }

    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// An entry without a usable date only passes when no bound is set.
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        if self.is_unbounded() {
            return true;
        }
        let Some(date) = date else {
            return false;
        };
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }
}

/// Case-insensitive match of one identifier against a worklog author's identity fields.
#[derive(Clone, Debug)]
pub struct UserMatcher {
    needle: String,
}

impl UserMatcher {
    pub fn new(identifier: &str) -> Self {
        Self {
            needle: identifier.trim().to_lowercase(),
        }
    }

    /// Returns the first identity field (accountId, name, displayName, emailAddress) equal to the target.
    pub fn matched_identifier<'a>(&self, author: &'a WorklogAuthor) -> Option<&'a str> {
        if self.needle.is_empty() {
            return None;
        }
        author
            .identifiers()
            .find(|candidate| candidate.trim().to_lowercase() == self.needle)
    }

    pub fn matches(&self, author: &WorklogAuthor) -> bool {
        self.matched_identifier(author).is_some()
    }
}

/// One CSV line of the export.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputRow {
    pub issue_key: String,
    pub time_spent_seconds: u64,
    pub time_spent_hours: String,
    pub username: String,
    pub worklog_date: Option<NaiveDate>,
}

impl OutputRow {
    pub fn from_worklog(issue_key: &str, worklog: &Worklog) -> Self {
        Self {
            issue_key: issue_key.to_string(),
            time_spent_seconds: worklog.time_spent_seconds,
            time_spent_hours: format_hours(worklog.time_spent_seconds),
            username: worklog
                .author
                .as_ref()
                .and_then(WorklogAuthor::label)
                .unwrap_or_default()
                .to_string(),
            worklog_date: worklog.started_date(),
        }
    }
}

/// Renders seconds as hours with two decimals, rounding half up.
pub fn format_hours(seconds: u64) -> String {
    let hundredths = (u128::from(seconds) * 100 + 1800) / 3600;
    format!("{}.{:02}", hundredths / 100, hundredths % 100)
}

/// Keeps the worklogs authored by the matched user within `range`, in API order.
pub fn normalize_worklogs(
    issue_key: &str,
    worklogs: &[Worklog],
    matcher: &UserMatcher,
    range: &DateRange,
) -> Vec<OutputRow> {
    worklogs
        .iter()
        .filter(|worklog| worklog.author.as_ref().is_some_and(|author| matcher.matches(author)))
        .filter(|worklog| range.contains(worklog.started_date()))
        .map(|worklog| OutputRow::from_worklog(issue_key, worklog))
        .collect()
}
