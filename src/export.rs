//! Sequential retrieval of worklogs for each requested issue.

use jira_api::JiraClient;
use log::{debug, info, warn};

use crate::error::ExportError;
use crate::filter::{normalize_worklogs, DateRange, OutputRow, UserMatcher};

#[derive(Clone, Debug)]
pub struct ExportRequest {
    pub issue_keys: Vec<String>,
    pub range: DateRange,
    pub skip_missing: bool,
}

/// Fetches every issue in order and returns the matching rows, issue by issue.
pub async fn collect_rows(
    client: &JiraClient,
    matcher: &UserMatcher,
    request: &ExportRequest,
) -> Result<Vec<OutputRow>, ExportError> {
    let mut rows = Vec::new();

    for issue_key in &request.issue_keys {
        let worklogs = match client.get_issue_worklogs(issue_key).await {
            Ok(worklogs) => worklogs,
            Err(err) if request.skip_missing && err.is_not_found() => {
                warn!("Issue {} not found (HTTP 404), skipping", issue_key);
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        let matched = normalize_worklogs(issue_key, &worklogs, matcher, &request.range);
        debug!(
            "{}: {} worklogs fetched, {} kept",
            issue_key,
            worklogs.len(),
            matched.len()
        );
        rows.extend(matched);
    }

    info!(
        "Collected {} worklog entries across {} issues",
        rows.len(),
        request.issue_keys.len()
    );
    Ok(rows)
}
