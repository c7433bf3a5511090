//! Command-line flags and their validation.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;

use crate::error::ExportError;
use crate::filter::DateRange;

/// Export JIRA worklog entries for a specific user.
#[derive(Parser, Debug)]
#[command(name = "jira-worklog-export")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Comma-separated list of JIRA issue keys (e.g. PROJ-1,PROJ-2)
    #[arg(short = 'i', long, value_name = "KEYS")]
    pub issues: String,

    /// Output CSV path (overwritten if it exists)
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// INI file with a [jira] section holding the credentials
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Worklog user identifier override (accountId, name, displayName or email)
    #[arg(short, long, value_name = "IDENTIFIER")]
    pub user: Option<String>,

    /// Only include worklogs on/after this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub startdate: Option<String>,

    /// Only include worklogs on/before this date
    #[arg(long, value_name = "YYYY-MM-DD")]
    pub enddate: Option<String>,

    /// Warn and continue when an issue does not exist (HTTP 404) instead of failing
    #[arg(long)]
    pub skip_missing: bool,

    /// Enable verbose logging (RUST_LOG still takes precedence)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn issue_keys(&self) -> Result<Vec<String>, ExportError> {
        let keys = parse_issue_keys(&self.issues);
        if keys.is_empty() {
            return Err(ExportError::Validation("No valid issue keys provided.".to_string()));
        }
        Ok(keys)
    }

    pub fn date_range(&self) -> Result<DateRange, ExportError> {
        let start = parse_date_arg(self.startdate.as_deref(), "startdate")?;
        let end = parse_date_arg(self.enddate.as_deref(), "enddate")?;
        DateRange::new(start, end)
    }
}

pub fn parse_issue_keys(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|key| !key.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parses an optional `YYYY-MM-DD` flag value; blank counts as absent.
pub fn parse_date_arg(raw: Option<&str>, label: &str) -> Result<Option<NaiveDate>, ExportError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| ExportError::Validation(format!("{} must be in YYYY-MM-DD format.", label))),
    }
}
