//! Author resolution pipeline

use crate::coordination::plan::{SourceOutcome, SourcePlan, Strategy};
use crate::error::Result;
use crate::git::log_line::parse_author_lines;
use crate::identity::{resolve_assignee, AuthorAggregator};
use crate::output::{export_resolution, EnvSink};
use crate::traits::{CommitProvider, HistoryProvider};
use crate::types::{CommitRecord, InputConfig, RangeEcho, Resolution, SkipReason};

/// Resolves the authors relevant to a build from the first available source
pub struct AuthorResolver<'a, C, H> {
    commits: &'a C,
    history: &'a H,
    config: &'a InputConfig<'a>,
}

impl<'a, C, H> AuthorResolver<'a, C, H>
where
    C: CommitProvider,
    H: HistoryProvider,
{
    /// Create a new resolver
    pub fn new(commits: &'a C, history: &'a H, config: &'a InputConfig<'a>) -> Self {
        Self {
            commits,
            history,
            config,
        }
    }

    /// Run the source plan and aggregate the first commit list obtained.
    ///
    /// Unreachable sources are logged and skipped; only configuration and
    /// runtime faults surface as errors.
    pub async fn resolve(&self) -> Result<Resolution> {
        let plan = SourcePlan::for_config(self.config);
        if plan.is_empty() {
            tracing::info!("Not in PR context and no manual commit range provided.");
            return Ok(Resolution::Skipped(SkipReason::NoContext));
        }

        for &strategy in plan.strategies() {
            tracing::info!("Resolving authors via {}", strategy.as_str());
            match self.run(strategy).await? {
                SourceOutcome::Records(records) => {
                    tracing::info!("Fetched {} commit(s)", records.len());
                    let authors = AuthorAggregator::from_records(&records).finish();
                    let range = match strategy {
                        Strategy::CommitRange => self.range_echo(),
                        _ => None,
                    };
                    return Ok(Resolution::Resolved { authors, range });
                }
                SourceOutcome::Unavailable(reason) => {
                    tracing::warn!("{} unavailable: {}", strategy.as_str(), reason);
                }
            }
        }

        tracing::warn!("Unable to fetch commits - skipping TARGET_AUTHORS setup");
        Ok(Resolution::Skipped(SkipReason::SourceUnavailable))
    }

    /// Resolve and export through `sink`
    pub async fn resolve_and_export<S: EnvSink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<Resolution> {
        let resolution = self.resolve().await?;
        export_resolution(&resolution, sink)?;
        Ok(resolution)
    }

    async fn run(&self, strategy: Strategy) -> Result<SourceOutcome> {
        let fetched = match strategy {
            Strategy::CommitRange => self.commit_range().await,
            Strategy::PullRequest => self.pull_request().await,
            Strategy::Assignees => self.assignees().await,
            Strategy::RepositoryCommits => self.repository_commits().await,
        };

        match fetched {
            Ok(outcome) => Ok(outcome),
            Err(e) if e.is_unavailable() => Ok(SourceOutcome::Unavailable(e.to_string())),
            Err(e) => Err(e),
        }
    }

    async fn commit_range(&self) -> Result<SourceOutcome> {
        let Some((start, end)) = self.config.commit_range() else {
            return Ok(SourceOutcome::Unavailable("no commit range".to_string()));
        };
        tracing::info!(
            "Using provided commit range: start_commit = {}, end_commit = {} ({})",
            start,
            end,
            self.config.range_bounds.as_str()
        );
        let lines = self
            .history
            .author_lines(start, end, self.config.range_bounds)
            .await?;
        Ok(SourceOutcome::Records(parse_author_lines(lines)))
    }

    async fn pull_request(&self) -> Result<SourceOutcome> {
        let Some(pr) = &self.config.pull_request else {
            return Ok(SourceOutcome::Unavailable("no pull request context".to_string()));
        };
        tracing::info!("Fetching commits from PR #{} ...", pr.number);
        let records = self.commits.pull_request_commits(pr).await?;
        Ok(SourceOutcome::Records(records))
    }

    async fn repository_commits(&self) -> Result<SourceOutcome> {
        let Some((owner, repo)) = self.config.owner_repo() else {
            return Ok(SourceOutcome::Unavailable("repository unknown".to_string()));
        };
        let records = self
            .commits
            .repository_commits(owner, repo, self.config.max_repository_pages)
            .await?;
        Ok(SourceOutcome::Records(records))
    }

    /// One record per assignee, picked from the repository commit list
    async fn assignees(&self) -> Result<SourceOutcome> {
        let logins = self.config.assignees.as_deref().unwrap_or_default();
        let commits = match self.repository_commits().await? {
            SourceOutcome::Records(commits) => commits,
            unavailable => return Ok(unavailable),
        };

        let records = logins
            .iter()
            .map(|login| {
                let author = resolve_assignee(login, &commits);
                CommitRecord {
                    author: Some(author),
                    login: Some(login.to_string()),
                }
            })
            .collect();
        Ok(SourceOutcome::Records(records))
    }

    fn range_echo(&self) -> Option<RangeEcho> {
        let (start, end) = self.config.commit_range()?;
        Some(RangeEcho {
            start_commit: start.to_string(),
            end_commit: end.to_string(),
            repo_path: self
                .config
                .repo_path
                .as_deref()
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        })
    }
}
