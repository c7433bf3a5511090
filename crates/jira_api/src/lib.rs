//! Typed Jira REST client crate used to read issue worklogs.

pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::JiraClient;
pub use config::JiraConfig;
pub use error::{JiraError, Result};
pub use models::{Worklog, WorklogAuthor, WorklogPage};
