//! GitHub REST client for commit statuses and check runs.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use serde::de::DeserializeOwned;
use statusgate_core::{
    CheckRunReport, FetchError, FetchResult, GateConfig, RawReport, Repository, StatusSource,
};
use tracing::{debug, warn};

use crate::payload::{CheckRunsPage, CommitStatus};

/// Page size requested from list endpoints (the API maximum).
pub const PER_PAGE: u32 = 100;

/// Default upper bound on pages followed per listing. A listing that is
/// still full at this page fails with [`FetchError::Truncated`].
pub const MAX_PAGES: u32 = 50;

const API_VERSION: &str = "2022-11-28";

/// Connection settings for [`GithubClient`].
#[derive(Debug, Clone)]
pub struct GithubConfig {
    /// REST base URL without trailing slash.
    pub api_url: String,
    pub repository: Repository,
    pub token: String,
    pub max_pages: u32,
}

impl GithubConfig {
    pub fn new(api_url: &str, repository: Repository, token: &str) -> Self {
        GithubConfig {
            api_url: api_url.trim_end_matches('/').to_string(),
            repository,
            token: token.to_string(),
            max_pages: MAX_PAGES,
        }
    }

    pub fn with_max_pages(mut self, max_pages: u32) -> Self {
        self.max_pages = max_pages;
        self
    }

    /// Take the platform settings out of a validated gate configuration.
    pub fn from_gate(config: &GateConfig) -> Self {
        Self::new(&config.api_url, config.repository.clone(), &config.token)
    }

    fn commit_url(&self, revision: &str, listing: &str) -> String {
        format!(
            "{}/repos/{}/{}/commits/{}/{}",
            self.api_url, self.repository.owner, self.repository.name, revision, listing
        )
    }
}

/// Fetches reports for a revision from the GitHub REST API.
///
/// Every call goes to the network; nothing is cached and nothing is retried.
pub struct GithubClient {
    config: GithubConfig,
    http_client: reqwest::Client,
}

impl GithubClient {
    pub fn new(config: GithubConfig) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(
            "x-github-api-version",
            HeaderValue::from_static(API_VERSION),
        );

        let http_client = reqwest::Client::builder()
            .user_agent(concat!("statusgate/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers)
            .build()
            .map_err(transport)?;

        Ok(GithubClient {
            config,
            http_client,
        })
    }

    async fn get_page<T: DeserializeOwned>(&self, url: &str, page: u32) -> FetchResult<T> {
        debug!(url = %url, page = page, "GET");

        let response = self
            .http_client
            .get(url)
            .query(&[("per_page", PER_PAGE), ("page", page)])
            .bearer_auth(&self.config.token)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(transport)?;
        serde_json::from_slice(&bytes).map_err(|e| FetchError::Decode(format!("{}: {}", url, e)))
    }

    fn truncated(&self, url: String) -> FetchError {
        warn!(url = %url, pages = self.config.max_pages, "listing exceeds page limit");
        FetchError::Truncated {
            url,
            pages: self.config.max_pages,
        }
    }
}

#[async_trait]
impl StatusSource for GithubClient {
    async fn fetch_commit_statuses(&self, revision: &str) -> FetchResult<Vec<RawReport>> {
        let url = self.config.commit_url(revision, "statuses");
        let mut reports = Vec::new();

        for page in 1..=self.config.max_pages {
            let statuses: Vec<CommitStatus> = self.get_page(&url, page).await?;
            let last_page = statuses.len() < PER_PAGE as usize;
            reports.extend(statuses.into_iter().map(RawReport::from));
            if last_page {
                debug!(revision = %revision, count = reports.len(), "fetched commit statuses");
                return Ok(reports);
            }
        }

        Err(self.truncated(url))
    }

    async fn fetch_check_runs(&self, revision: &str) -> FetchResult<Vec<CheckRunReport>> {
        let url = self.config.commit_url(revision, "check-runs");
        let mut reports = Vec::new();

        for page in 1..=self.config.max_pages {
            let body: CheckRunsPage = self.get_page(&url, page).await?;
            let last_page = body.check_runs.len() < PER_PAGE as usize;
            reports.extend(body.check_runs.into_iter().map(CheckRunReport::from));
            if last_page || reports.len() as u64 >= body.total_count {
                debug!(revision = %revision, count = reports.len(), "fetched check runs");
                return Ok(reports);
            }
        }

        Err(self.truncated(url))
    }
}

fn transport(err: reqwest::Error) -> FetchError {
    FetchError::Transport(err.to_string())
}
