//! Ordered commit source selection

use crate::types::{ApiFailurePolicy, CommitRecord, InputConfig};

/// One way of obtaining commits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Local history between the explicit boundary commits
    CommitRange,
    /// Commit list of the pull request under build
    PullRequest,
    /// Repository commits scanned for each assignee login
    Assignees,
    /// Recent repository commits
    RepositoryCommits,
}

impl Strategy {
    /// Get string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CommitRange => "commit_range",
            Self::PullRequest => "pull_request",
            Self::Assignees => "assignees",
            Self::RepositoryCommits => "repository_commits",
        }
    }
}

/// Result of running one strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceOutcome {
    /// Commits were obtained
    Records(Vec<CommitRecord>),
    /// The source could not be reached; the next strategy is tried
    Unavailable(String),
}

/// Strategies to try, in order, until one yields records
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourcePlan {
    strategies: Vec<Strategy>,
}

impl SourcePlan {
    /// Build the plan for a configuration.
    ///
    /// An explicit range excludes every API strategy. An empty plan means
    /// there is nothing to resolve for this run.
    pub fn for_config(config: &InputConfig<'_>) -> Self {
        let mut strategies = Vec::with_capacity(2);

        if config.commit_range().is_some() {
            strategies.push(Strategy::CommitRange);
        } else if config.pull_request.is_some() {
            strategies.push(Strategy::PullRequest);
            if config.api_failure == ApiFailurePolicy::RepositoryFallback {
                strategies.push(Strategy::RepositoryCommits);
            }
        } else if config.assignees.as_ref().is_some_and(|a| !a.is_empty()) {
            strategies.push(Strategy::Assignees);
        } else if config.repository_fallback {
            strategies.push(Strategy::RepositoryCommits);
        }

        Self { strategies }
    }

    /// Whether nothing is planned
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Planned strategies in order
    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }
}
