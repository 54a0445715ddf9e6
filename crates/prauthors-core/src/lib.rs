//! # prauthors core
//!
//! Resolves which commit authors are relevant to a pull-request build and
//! how many commits the most active of them contributed.
//!
//! Commits come from the first available source of an ordered plan:
//! - **Explicit range**: local git history between two boundary commits
//! - **Pull request**: the PR's commit list from the GitHub REST API
//! - **Assignees**: repository commits scanned for each assignee login
//! - **Repository**: recent repository commits, when configured
//!
//! Authors are deduplicated by email, preferring real addresses over
//! `users.noreply.github.com` placeholders, and exported as
//! `TARGET_AUTHORS` / `TARGET_COMMIT_COUNT`.
//!
//! ## Example
//!
//! ```no_run
//! use prauthors_core::{resolve_authors, InputConfig, MemorySink};
//! use std::borrow::Cow;
//!
//! # async fn example() -> prauthors_core::Result<()> {
//! let config = InputConfig {
//!     start_commit: Some(Cow::Borrowed("HEAD~5")),
//!     end_commit: Some(Cow::Borrowed("HEAD")),
//!     ..Default::default()
//! };
//!
//! let mut sink = MemorySink::new();
//! resolve_authors(&config, &mut sink).await?;
//! println!("{:?}", sink.get("TARGET_AUTHORS"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod context;
pub mod coordination;
pub mod error;
pub mod git;
pub mod http;
pub mod identity;
pub mod output;
pub mod traits;
pub mod types;

pub use coordination::AuthorResolver;
pub use error::{Error, ErrorKind, Result};
pub use identity::AuthorAggregator;
pub use output::{EnvSink, GithubEnvFile, MemorySink, StdoutSink};
pub use types::{
    ApiFailurePolicy, CommitAuthor, CommitRecord, InputConfig, PullRequestContext, RangeBounds,
    Resolution, ResolvedAuthors, SkipReason,
};

/// Resolve authors with the production providers and export them.
///
/// Uses the GitHub REST API configured from `GITHUB_API_URL`/`GITHUB_TOKEN`
/// and the git repository at `config.repo_path` (or the current directory).
pub async fn resolve_authors<S: EnvSink + ?Sized>(
    config: &InputConfig<'_>,
    sink: &mut S,
) -> Result<Resolution> {
    let api = http::GitHubApiClient::from_env();
    let history = git::GitHistory::new(
        config
            .repo_path
            .as_deref()
            .filter(|p| !p.is_empty())
            .unwrap_or("."),
    );

    AuthorResolver::new(&api, &history, config)
        .resolve_and_export(sink)
        .await
}
