use crate::config::JiraConfig;
use crate::error::{JiraError, Result};
use crate::models::{Worklog, WorklogPage};
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client as HttpClient, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Clone)]
pub struct JiraClient {
    http: HttpClient,
    config: JiraConfig,
}

impl JiraClient {
    pub fn new(config: JiraConfig) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self { http, config })
    }

    /// Issues a GET against the API root extended by `segments` and decodes the JSON body.
    /// Each segment is percent-encoded. `target` names the resource in error messages.
    pub async fn get_with_query<T>(
        &self,
        segments: &[&str],
        query: &[(&str, String)],
        target: &str,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(segments)?;
        debug!(%url, ?query, "GET");
        let response = self.http.get(url).query(query).send().await?;
        Self::parse_json(response, target).await
    }

    fn url_for(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.api_root())
            .map_err(|err| JiraError::Other(format!("invalid base url: {}", err)))?;
        url.path_segments_mut()
            .map_err(|_| {
                JiraError::Other(format!("base url cannot carry a path: {}", self.config.base_url))
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn parse_json<T>(response: Response, target: &str) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str::<T>(&body).map_err(|err| {
                JiraError::Serialization(format!("invalid JSON for {}: {}", target, err))
            })
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            Err(JiraError::Authentication(format!(
                "Access denied ({}) while fetching {} - {}",
                status, target, body
            )))
        } else {
            let body = response.text().await.unwrap_or_default();
            Err(JiraError::http(status, target, body))
        }
    }

    /// Fetches a single page of worklogs for `issue_key`.
    pub async fn get_worklog_page(
        &self,
        issue_key: &str,
        start_at: u64,
        max_results: u32,
    ) -> Result<WorklogPage> {
        let query = [
            ("startAt", start_at.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        self.get_with_query(
            &["issue", issue_key, "worklog"],
            &query,
            &format!("worklogs for {}", issue_key),
        )
        .await
    }

    /// Returns every worklog of `issue_key`, following `startAt` pagination until the
    /// reported total is reached or the server runs out of entries.
    pub async fn get_issue_worklogs(&self, issue_key: &str) -> Result<Vec<Worklog>> {
        let page_size = self.config.page_size;
        let mut worklogs: Vec<Worklog> = Vec::new();
        let mut start_at: u64 = 0;

        loop {
            let page = self.get_worklog_page(issue_key, start_at, page_size).await?;
            let received = page.worklogs.len() as u64;
            start_at += received;
            worklogs.extend(page.worklogs);
            debug!(
                issue = issue_key,
                received,
                accumulated = worklogs.len(),
                total = ?page.total,
                "worklog page"
            );

            if received == 0 {
                break;
            }
            match page.total {
                Some(total) if start_at >= total => break,
                Some(_) => {}
                // Without a total, a short page is the only end marker.
                None if received < page.max_results.unwrap_or(u64::from(page_size)) => break,
                None => {}
            }
        }

        Ok(worklogs)
    }
}

fn build_http_client(config: &JiraConfig) -> Result<HttpClient> {
    let mut headers = HeaderMap::new();

    let credentials = BASE64_STANDARD.encode(format!("{}:{}", config.email, config.api_token));
    let mut auth_value = header_value(format!("Basic {}", credentials))?;
    auth_value.set_sensitive(true);
    headers.insert(AUTHORIZATION, auth_value);
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, header_value(config.user_agent.clone())?);

    HttpClient::builder()
        .default_headers(headers)
        .timeout(config.timeout)
        .connect_timeout(config.connect_timeout)
        .build()
        .map_err(|err| JiraError::Other(err.to_string()))
}

fn header_value(value: String) -> Result<HeaderValue> {
    HeaderValue::from_str(&value).map_err(|err| JiraError::Other(err.to_string()))
}
