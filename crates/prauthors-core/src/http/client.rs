//! GitHub REST API client for commit listing

use crate::error::{Error, Result};
use crate::traits::CommitProvider;
use crate::types::{CommitAuthor, CommitRecord, PullRequestContext};
use reqwest::StatusCode;
use serde::Deserialize;
use std::future::Future;

/// Page size used for every listing (the API maximum)
const PER_PAGE: usize = 100;

/// Safety limit to prevent infinite pagination loops
const MAX_PAGES: u32 = 1000;

/// GitHub API commit object (`GET .../pulls/{n}/commits`, `GET .../commits`)
#[derive(Debug, Deserialize)]
struct GitHubCommit {
    commit: GitHubCommitDetail,
    /// Linked platform account, `null` when the email matches no account
    author: Option<GitHubAccount>,
}

#[derive(Debug, Deserialize)]
struct GitHubCommitDetail {
    author: Option<GitHubGitActor>,
}

#[derive(Debug, Deserialize)]
struct GitHubGitActor {
    name: String,
    email: String,
}

#[derive(Debug, Deserialize)]
struct GitHubAccount {
    login: String,
}

impl From<GitHubCommit> for CommitRecord {
    fn from(c: GitHubCommit) -> Self {
        CommitRecord {
            author: c.commit.author.map(|a| CommitAuthor {
                name: a.name,
                email: a.email,
            }),
            login: c.author.map(|a| a.login),
        }
    }
}

/// Map a non-success status to the error taxonomy
fn status_error(status: StatusCode, what: &str) -> Error {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::AccessDenied(format!(
            "GitHub API returned {} for {}; ensure the workflow has \"pull-requests: read\" and \"contents: read\" permissions",
            status, what
        )),
        StatusCode::NOT_FOUND => Error::NotFound(format!("GitHub API returned 404 for {}", what)),
        _ => Error::Http(format!("GitHub API returned error {} for {}", status, what)),
    }
}

/// GitHub API client for fetching commits
pub struct GitHubApiClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GitHubApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubApiClient")
            .field("base_url", &self.base_url)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl GitHubApiClient {
    /// Create a new GitHub API client
    pub fn new(base_url: String, token: Option<String>) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("prauthors/", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Self {
        let base_url = std::env::var("GITHUB_API_URL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "https://api.github.com".to_string());

        let token = std::env::var("GITHUB_TOKEN").ok().filter(|s| !s.is_empty());

        Self::new(base_url, token)
    }

    /// Base URL requests are made against
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Fetch one page of commits from `url`
    async fn fetch_page(&self, url: &str, page: u32, what: &str) -> Result<Vec<CommitRecord>> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json")
            .query(&[("page", page.to_string()), ("per_page", PER_PAGE.to_string())]);

        if let Some(ref token) = self.token {
            request = request.header("Authorization", format!("Bearer {}", token));
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(status_error(response.status(), what));
        }

        let commits: Vec<GitHubCommit> = response
            .json()
            .await
            .map_err(|e| Error::Json(format!("Failed to parse GitHub API response: {}", e)))?;

        Ok(commits.into_iter().map(CommitRecord::from).collect())
    }

    /// Walk pages until a short page or `max_pages` is reached
    async fn paginate(&self, url: &str, max_pages: u32, what: &str) -> Result<Vec<CommitRecord>> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let batch = self.fetch_page(url, page, what).await?;
            let len = batch.len();
            tracing::debug!("Fetched page {} of {} ({} commits)", page, what, len);
            all.extend(batch);

            if len < PER_PAGE || page >= max_pages {
                break;
            }
            page += 1;
        }

        Ok(all)
    }

    /// Fetch all commits of a pull request, oldest first
    pub async fn list_pull_request_commits(
        &self,
        owner: &str,
        repo: &str,
        number: u64,
    ) -> Result<Vec<CommitRecord>> {
        let url = format!(
            "{}/repos/{}/{}/pulls/{}/commits",
            self.base_url, owner, repo, number
        );
        let what = format!("PR #{}", number);
        self.paginate(&url, MAX_PAGES, &what).await
    }

    /// Fetch recent repository commits, newest first
    pub async fn list_repository_commits(
        &self,
        owner: &str,
        repo: &str,
        max_pages: u32,
    ) -> Result<Vec<CommitRecord>> {
        let url = format!("{}/repos/{}/{}/commits", self.base_url, owner, repo);
        let what = format!("{}/{} commits", owner, repo);
        self.paginate(&url, max_pages.clamp(1, MAX_PAGES), &what).await
    }
}

impl CommitProvider for GitHubApiClient {
    fn pull_request_commits<'a>(
        &'a self,
        pr: &'a PullRequestContext,
    ) -> impl Future<Output = Result<Vec<CommitRecord>>> + Send + 'a {
        self.list_pull_request_commits(&pr.owner, &pr.repo, pr.number)
    }

    fn repository_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        max_pages: u32,
    ) -> impl Future<Output = Result<Vec<CommitRecord>>> + Send + 'a {
        self.list_repository_commits(owner, repo, max_pages)
    }
}
