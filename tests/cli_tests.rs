//! Integration tests for the exporter binary

use assert_cmd::Command;
use mockito::{Matcher, Server};
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const JIRA_VARS: [&str; 5] = [
    "JIRA_BASE_URL",
    "JIRA_EMAIL",
    "JIRA_API_TOKEN",
    "JIRA_WORKLOG_USER",
    "JIRA_API_VERSION",
];

fn exporter() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("jira-worklog-export"));
    for var in JIRA_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

fn worklog_body(email: &str, seconds: u64, started: &str) -> String {
    serde_json::json!({
        "startAt": 0,
        "maxResults": 100,
        "total": 2,
        "worklogs": [
            {
                "id": "10",
                "author": {"accountId": "5b10a", "displayName": "Alice", "emailAddress": email},
                "started": started,
                "timeSpentSeconds": seconds,
            },
            {
                "id": "11",
                "author": {"accountId": "77c2f", "displayName": "Bob", "emailAddress": "bob@b.com"},
                "started": started,
                "timeSpentSeconds": 900,
            }
        ],
    })
    .to_string()
}

#[test]
fn test_cli_help() {
    exporter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--issues"))
        .stdout(predicate::str::contains("--startdate"))
        .stdout(predicate::str::contains("--skip-missing"));
}

#[test]
fn test_issues_flag_is_required() {
    exporter()
        .args(["--output", "out.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--issues"));
}

#[test]
fn test_end_to_end_export_writes_one_row_per_issue() {
    let mut server = Server::new();
    for key in ["PROJ-1", "PROJ-2"] {
        server
            .mock("GET", format!("/rest/api/3/issue/{}/worklog", key).as_str())
            .match_query(Matcher::Any)
            .match_header("authorization", Matcher::Regex("^Basic ".to_string()))
            .with_body(worklog_body("a@b.com", 7200, "2024-01-10T09:00:00.000+0000"))
            .expect(1)
            .create();
    }

    let dir = TempDir::new().expect("temp dir");
    let output = dir.path().join("report.csv");

    exporter()
        .env("JIRA_BASE_URL", server.url())
        .env("JIRA_EMAIL", "a@b.com")
        .env("JIRA_API_TOKEN", "token")
        .args(["--issues", "PROJ-1,PROJ-2", "--user", "A@B.com", "--output"])
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 worklog entries"));

    let csv = fs::read_to_string(&output).expect("report should exist");
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(
        lines,
        vec![
            "JIRA Identifier,Time Spent (seconds),Time Spent In Hours,UserName,Worklog Date",
            "PROJ-1,7200,2.00,Alice,2024-01-10",
            "PROJ-2,7200,2.00,Alice,2024-01-10",
        ]
    );
}

#[test]
fn test_config_file_supplies_credentials_and_dates_filter() {
    let mut server = Server::new();
    server
        .mock("GET", "/rest/api/2/issue/PROJ-1/worklog")
        .match_query(Matcher::Any)
        .with_body(worklog_body("a@b.com", 3600, "2024-01-15T10:00:00.000+0000"))
        .create();

    let dir = TempDir::new().expect("temp dir");
    let config = dir.path().join("jira.ini");
    fs::write(
        &config,
        format!(
            "[jira]\nbase_url = {}/\nemail = a@b.com\napi_token = token\napi_version = 2\n",
            server.url()
        ),
    )
    .expect("write config");
    let output = dir.path().join("report.csv");

    exporter()
        .args(["-i", "PROJ-1", "--startdate", "2024-02-01", "--enddate", "2024-02-28", "-c"])
        .arg(&config)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 0 worklog entries"));

    let csv = fs::read_to_string(&output).expect("report should exist");
    assert_eq!(csv.lines().count(), 1);
}

#[test]
fn test_missing_credentials_exit_with_configuration_error() {
    let dir = TempDir::new().expect("temp dir");
    exporter()
        .env("JIRA_BASE_URL", "https://example.atlassian.net")
        .args(["--issues", "PROJ-1", "--output"])
        .arg(dir.path().join("out.csv"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Missing JIRA_EMAIL or email in config"));
}

#[test]
fn test_bad_date_exits_with_validation_error() {
    let dir = TempDir::new().expect("temp dir");
    exporter()
        .env("JIRA_BASE_URL", "https://example.atlassian.net")
        .env("JIRA_EMAIL", "a@b.com")
        .env("JIRA_API_TOKEN", "token")
        .args(["--issues", "PROJ-1", "--startdate", "15/01/2024", "--output"])
        .arg(dir.path().join("out.csv"))
        .assert()
        .code(2)
        .stderr(predicate::str::contains("startdate must be in YYYY-MM-DD format"));
}

#[test]
fn test_http_failure_exits_with_one_and_names_issue() {
    let mut server = Server::new();
    server
        .mock("GET", "/rest/api/3/issue/PROJ-404/worklog")
        .match_query(Matcher::Any)
        .with_status(404)
        .create();

    let dir = TempDir::new().expect("temp dir");
    exporter()
        .env("JIRA_BASE_URL", server.url())
        .env("JIRA_EMAIL", "a@b.com")
        .env("JIRA_API_TOKEN", "token")
        .args(["--issues", "PROJ-404", "--output"])
        .arg(dir.path().join("out.csv"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("PROJ-404"))
        .stderr(predicate::str::contains("404"));
}
