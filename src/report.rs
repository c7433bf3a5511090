//! CSV serialization of export rows.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::error::ExportError;
use crate::filter::OutputRow;

pub const HEADER: [&str; 5] = [
    "JIRA Identifier",
    "Time Spent (seconds)",
    "Time Spent In Hours",
    "UserName",
    "Worklog Date",
];

#[derive(Serialize)]
struct Record<'a> {
    issue_key: &'a str,
    time_spent_seconds: u64,
    time_spent_hours: &'a str,
    username: &'a str,
    worklog_date: String,
}

impl<'a> From<&'a OutputRow> for Record<'a> {
    fn from(row: &'a OutputRow) -> Self {
        Self {
            issue_key: &row.issue_key,
            time_spent_seconds: row.time_spent_seconds,
            time_spent_hours: &row.time_spent_hours,
            username: &row.username,
            worklog_date: row
                .worklog_date
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Writes the header followed by one record per row. The header is emitted even when `rows` is empty.
pub fn write_rows<W: Write>(writer: W, rows: &[OutputRow]) -> Result<(), ExportError> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(HEADER)?;
    for row in rows {
        out.serialize(Record::from(row))?;
    }
    out.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Creates (or truncates) `path` and writes the report into it.
pub fn write_report(path: &Path, rows: &[OutputRow]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_rows(file, rows)
}
