//! Terminal error taxonomy for an export run and its exit code mapping.

use std::io;
use std::path::PathBuf;

use jira_api::JiraError;
use thiserror::Error;

/// Every failure aborts the export; the variant decides the process exit code.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Invalid input: {0}")]
    Validation(String),
    #[error("Failed to fetch worklogs: {0}")]
    Api(#[from] JiraError),
    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

impl ExportError {
    /// 2 for problems with what the operator supplied, 1 for runtime failures.
    pub fn exit_code(&self) -> u8 {
        match self {
            ExportError::Configuration(_) | ExportError::Validation(_) => 2,
            ExportError::Api(_) | ExportError::Io { .. } | ExportError::Csv(_) => 1,
        }
    }
}
