//! Error model used by Jira API client operations.

use reqwest::StatusCode;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, JiraError>;

/// Represents the failure modes of a Jira API call: non-success HTTP statuses tied to the resource being fetched, rejected credentials, timeouts, transport failures and undecodable payloads.
#[derive(Debug, Error)]
pub enum JiraError {
    #[error("http {status} while fetching {target}: {message}")]
    Http {
        status: StatusCode,
        target: String,
        message: String,
    },
    #[error("authentication error: {0}")]
    Authentication(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("serialization error: {0}")]
    Serialization(String),
    #[error("unexpected error: {0}")]
    Other(String),
}

impl JiraError {
    pub fn http(status: StatusCode, target: impl Into<String>, message: impl Into<String>) -> Self {
        JiraError::Http {
            status,
            target: target.into(),
            message: message.into(),
        }
    }

    /// Returns the HTTP status when the error came from a response.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            JiraError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

impl From<reqwest::Error> for JiraError {
    /// Converts reqwest errors into semantic JiraError variants.
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            JiraError::Timeout(err.to_string())
        } else if err.is_status() {
            let status = err.status().unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
            let target = err
                .url()
                .map(|url| url.to_string())
                .unwrap_or_default();
            JiraError::http(status, target, err.to_string())
        } else if err.is_connect() || err.is_request() {
            JiraError::Network(err.to_string())
        } else if err.is_decode() {
            JiraError::Serialization(err.to_string())
        } else {
            JiraError::Other(err.to_string())
        }
    }
}

impl From<serde_json::Error> for JiraError {
    fn from(err: serde_json::Error) -> Self {
        JiraError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::JiraError;
    use reqwest::StatusCode;

    #[test]
    fn http_error_names_target_and_status() {
        let err = JiraError::http(StatusCode::BAD_GATEWAY, "worklogs for PROJ-7", "upstream down");
        let message = err.to_string();
        assert!(message.contains("502"));
        assert!(message.contains("PROJ-7"));
        assert!(!err.is_not_found());
    }

    #[test]
    fn not_found_is_detected() {
        let err = JiraError::http(StatusCode::NOT_FOUND, "worklogs for PROJ-1", "");
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[test]
    fn json_errors_become_serialization_errors() {
        let err: JiraError = serde_json::from_str::<serde_json::Value>("{not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, JiraError::Serialization(_)));
    }
}
