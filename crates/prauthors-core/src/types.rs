//! Core type definitions

use std::borrow::Cow;
use std::fmt;

/// One commit as seen by the resolver.
///
/// `author` is `None` when the source reported a commit without a git author
/// (the REST API returns `null` for some imported commits).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    /// Git author, if any
    pub author: Option<CommitAuthor>,
    /// Platform account login linked to the commit
    pub login: Option<String>,
}

/// Git author name/email pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    /// Author name
    pub name: String,
    /// Author email, compared exactly
    pub email: String,
}

impl CommitRecord {
    /// Build a record from a name/email pair without a login
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            author: Some(CommitAuthor {
                name: name.into(),
                email: email.into(),
            }),
            login: None,
        }
    }

    /// Attach a platform login
    pub fn with_login(mut self, login: impl Into<String>) -> Self {
        self.login = Some(login.into());
        self
    }

    /// A record whose author is unknown
    pub fn authorless(login: Option<String>) -> Self {
        Self {
            author: None,
            login,
        }
    }
}

/// Canonical `Name <email>` display string
impl fmt::Display for CommitAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Pull request being built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestContext {
    /// Repository owner
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Pull request number
    pub number: u64,
}

/// Which side of an explicit commit range is part of the history query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RangeBounds {
    /// Start commit included, end commit excluded
    #[default]
    StartInclusive,
    /// Start commit excluded, end commit included (`git log start..end`)
    EndInclusive,
}

impl RangeBounds {
    /// Parse from a config string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "start-inclusive" | "start_inclusive" | "since" => Some(Self::StartInclusive),
            "end-inclusive" | "end_inclusive" | "git" => Some(Self::EndInclusive),
            _ => None,
        }
    }

    /// Get string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::StartInclusive => "start-inclusive",
            Self::EndInclusive => "end-inclusive",
        }
    }
}

/// What to do when the pull request commit list cannot be fetched
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApiFailurePolicy {
    /// Stop and export nothing
    #[default]
    Terminate,
    /// List repository commits instead
    RepositoryFallback,
}

impl ApiFailurePolicy {
    /// Parse from a config string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "terminate" | "skip" => Some(Self::Terminate),
            "repository-fallback" | "repository_fallback" | "fallback" => {
                Some(Self::RepositoryFallback)
            }
            _ => None,
        }
    }
}

/// Resolver configuration, borrowing from CLI args where possible
#[derive(Debug, Clone)]
pub struct InputConfig<'a> {
    /// Explicit range start (`start_commit`)
    pub start_commit: Option<Cow<'a, str>>,
    /// Explicit range end (`end_commit`)
    pub end_commit: Option<Cow<'a, str>>,
    /// Working copy for history queries
    pub repo_path: Option<Cow<'a, str>>,
    /// Range inclusion policy
    pub range_bounds: RangeBounds,

    /// Pull request under build
    pub pull_request: Option<PullRequestContext>,
    /// Repository owner/name, when known outside a PR
    pub repository: Option<(String, String)>,

    /// Assignee logins to resolve when not building a PR
    pub assignees: Option<Vec<Cow<'a, str>>>,

    /// Behavior when the PR commit list cannot be fetched
    pub api_failure: ApiFailurePolicy,
    /// List repository commits when there is no PR context
    pub repository_fallback: bool,
    /// Page limit for repository commit listings
    pub max_repository_pages: u32,
}

impl<'a> InputConfig<'a> {
    /// Both boundary commits, when both are present and non-empty
    pub fn commit_range(&self) -> Option<(&str, &str)> {
        match (self.start_commit.as_deref(), self.end_commit.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some((start, end))
            }
            _ => None,
        }
    }

    /// Owner/repo for repository-wide queries, preferring the PR context
    pub fn owner_repo(&self) -> Option<(&str, &str)> {
        if let Some(pr) = &self.pull_request {
            return Some((pr.owner.as_str(), pr.repo.as_str()));
        }
        self.repository
            .as_ref()
            .map(|(owner, repo)| (owner.as_str(), repo.as_str()))
    }
}

impl<'a> Default for InputConfig<'a> {
    fn default() -> Self {
        Self {
            start_commit: None,
            end_commit: None,
            repo_path: None,
            range_bounds: RangeBounds::default(),
            pull_request: None,
            repository: None,
            assignees: None,
            api_failure: ApiFailurePolicy::default(),
            repository_fallback: false,
            max_repository_pages: 1,
        }
    }
}

/// Aggregated author information for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedAuthors {
    /// `Name <email>` strings in order of first sight
    pub authors: Vec<String>,
    /// Highest per-email commit count, 0 when nothing was counted
    pub max_commit_count: u32,
}

/// Explicit range echoed back to the environment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeEcho {
    /// Start boundary as given
    pub start_commit: String,
    /// End boundary as given
    pub end_commit: String,
    /// Working copy path, when one was given
    pub repo_path: Option<String>,
}

/// Why a run produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Not a pull request build and no override
    NoContext,
    /// Every planned source was unavailable
    SourceUnavailable,
}

impl SkipReason {
    /// Get string representation
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoContext => "no_context",
            Self::SourceUnavailable => "source_unavailable",
        }
    }
}

/// Outcome of a resolver run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Authors resolved and ready to export
    Resolved {
        /// Aggregated authors
        authors: ResolvedAuthors,
        /// Explicit range, when the override was used
        range: Option<RangeEcho>,
    },
    /// Nothing to export
    Skipped(SkipReason),
}

impl Resolution {
    /// Whether anything will be exported
    pub fn is_resolved(&self) -> bool {
        matches!(self, Resolution::Resolved { .. })
    }
}
