//! Commit source seams
//!
//! The resolver is generic over these traits so tests can substitute
//! in-memory providers for the GitHub API and the local git history.

use std::future::Future;

use crate::error::Result;
use crate::types::{CommitRecord, PullRequestContext, RangeBounds};

/// Remote commit listing (the GitHub REST API in production)
pub trait CommitProvider {
    /// Full commit list of a pull request, oldest first, across all pages
    fn pull_request_commits<'a>(
        &'a self,
        pr: &'a PullRequestContext,
    ) -> impl Future<Output = Result<Vec<CommitRecord>>> + Send + 'a;

    /// Recent commits of the repository's default branch, newest first,
    /// limited to `max_pages` pages
    fn repository_commits<'a>(
        &'a self,
        owner: &'a str,
        repo: &'a str,
        max_pages: u32,
    ) -> impl Future<Output = Result<Vec<CommitRecord>>> + Send + 'a;
}

/// Version-control history between two boundary commits
pub trait HistoryProvider {
    /// One `Name <email>` line per commit in the range
    fn author_lines<'a>(
        &'a self,
        start: &'a str,
        end: &'a str,
        bounds: RangeBounds,
    ) -> impl Future<Output = Result<Vec<String>>> + Send + 'a;
}
