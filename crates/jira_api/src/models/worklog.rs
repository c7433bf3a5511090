use crate::models::WorklogAuthor;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use serde_json::Value;

/// One page of `GET issue/{key}/worklog`.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct WorklogPage {
    #[serde(default)]
    pub start_at: u64,
    pub max_results: Option<u64>,
    pub total: Option<u64>,
    #[serde(default)]
    pub worklogs: Vec<Worklog>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Worklog {
    pub id: Option<Value>,
    pub author: Option<WorklogAuthor>,
    pub started: Option<String>,
    #[serde(default)]
    pub time_spent_seconds: u64,
}

impl Worklog {
    /// Calendar date of `started`, taken in the timestamp's own offset.
    pub fn started_date(&self) -> Option<NaiveDate> {
        self.started.as_deref().and_then(parse_started_date)
    }
}

const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%.f%:z"];

fn parse_started_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.date_naive());
    }
    for format in OFFSET_FORMATS {
        if let Ok(parsed) = DateTime::parse_from_str(raw, format) {
            return Some(parsed.date_naive());
        }
    }
    if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(parsed.date());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}
