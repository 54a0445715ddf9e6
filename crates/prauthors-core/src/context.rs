//! GitHub Actions run context: repository and pull request discovery

use crate::error::{Error, Result};
use crate::types::PullRequestContext;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct EventPayload {
    pull_request: Option<EventPullRequest>,
}

#[derive(Debug, Deserialize)]
struct EventPullRequest {
    number: u64,
}

/// Split an `owner/repo` string
pub fn parse_repository(repository: &str) -> Result<(String, String)> {
    match repository.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(Error::Config(format!(
            "Invalid GITHUB_REPOSITORY format: {}",
            repository
        ))),
    }
}

/// Pull request number from a webhook event payload.
///
/// Returns `Ok(None)` for events that carry no `pull_request` object.
pub fn pull_request_number_from_event(payload: &str) -> Result<Option<u64>> {
    let event: EventPayload = serde_json::from_str(payload)
        .map_err(|e| Error::EventParse(format!("invalid event payload: {}", e)))?;
    Ok(event.pull_request.map(|pr| pr.number))
}

/// Pull request number from a `refs/pull/<n>/merge` ref
pub fn pull_request_number_from_ref(github_ref: &str) -> Option<u64> {
    let rest = github_ref.strip_prefix("refs/pull/")?;
    let (number, _) = rest.split_once('/')?;
    number.parse().ok()
}

/// Raw environment values used to build the run context
#[derive(Debug, Default, Clone)]
pub struct RunEnvironment<'a> {
    /// `GITHUB_REPOSITORY`
    pub repository: Option<&'a str>,
    /// `GITHUB_EVENT_PATH`
    pub event_path: Option<&'a str>,
    /// `GITHUB_REF`
    pub github_ref: Option<&'a str>,
}

/// Repository and pull request resolved from the run environment
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunContext {
    /// `owner/repo` split, when known
    pub repository: Option<(String, String)>,
    /// Pull request under build, when this is a PR event
    pub pull_request: Option<PullRequestContext>,
}

impl RunContext {
    /// Resolve from raw environment values.
    ///
    /// The event payload is authoritative; `GITHUB_REF` is consulted whenever
    /// the payload yields no PR number (absent, unreadable, or not a
    /// pull request event).
    pub async fn resolve(env: &RunEnvironment<'_>) -> Result<Self> {
        let Some(repository) = env.repository.filter(|s| !s.is_empty()) else {
            return Ok(Self::default());
        };
        let (owner, repo) = parse_repository(repository)?;

        let mut number = None;
        if let Some(path) = env.event_path.filter(|s| !s.is_empty()) {
            match read_event_number(Path::new(path)).await {
                Ok(n) => number = n,
                Err(e) => tracing::warn!("Could not read event payload: {}", e),
            }
        }
        if number.is_none() {
            number = env.github_ref.and_then(pull_request_number_from_ref);
        }

        let pull_request = number.map(|number| PullRequestContext {
            owner: owner.clone(),
            repo: repo.clone(),
            number,
        });

        Ok(Self {
            repository: Some((owner, repo)),
            pull_request,
        })
    }
}

async fn read_event_number(path: &Path) -> Result<Option<u64>> {
    let payload = tokio::fs::read_to_string(path).await?;
    pull_request_number_from_event(&payload)
}
