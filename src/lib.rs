//! Export one user's Jira worklog entries for a list of issues into a CSV file.

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod report;

use jira_api::JiraClient;
use log::info;

use cli::Cli;
use config::ConnectionSettings;
use error::ExportError;
use export::{collect_rows, ExportRequest};
use filter::UserMatcher;

/// Initializes `env_logger`; `RUST_LOG` wins over the `--verbose` default.
pub fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let _ = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_filter),
    )
    .format_timestamp_millis()
    .try_init();
}

/// Runs a full export and returns the number of rows written.
pub async fn run(cli: &Cli) -> Result<usize, ExportError> {
    let settings = ConnectionSettings::load(cli.config.as_deref(), cli.user.as_deref())?;
    let range = cli.date_range()?;
    let issue_keys = cli.issue_keys()?;

    info!(
        "Exporting worklogs of {} for {} issue(s) from {}",
        settings.worklog_user,
        issue_keys.len(),
        settings.base_url
    );

    let client = JiraClient::new(settings.jira_config())?;
    let matcher = UserMatcher::new(&settings.worklog_user);
    let request = ExportRequest {
        issue_keys,
        range,
        skip_missing: cli.skip_missing,
    };

    let rows = collect_rows(&client, &matcher, &request).await?;
    report::write_report(&cli.output, &rows)?;
    Ok(rows.len())
}
