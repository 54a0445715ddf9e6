//! Integration tests for history queries against real repositories
//!
//! Repositories are created with the `git` binary in temporary directories.

use prauthors_core::git::GitHistory;
use prauthors_core::output::{TARGET_AUTHORS, TARGET_COMMIT_COUNT, TARGET_REPO_PATH};
use prauthors_core::traits::{CommitProvider, HistoryProvider};
use prauthors_core::types::SkipReason;
use prauthors_core::{
    AuthorResolver, CommitRecord, InputConfig, MemorySink, PullRequestContext, RangeBounds,
    Resolution, Result,
};
use std::borrow::Cow;
use std::future::Future;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Commit provider that must never be reached
struct NoApi;

fn unreachable_api(what: &str) -> std::future::Ready<Result<Vec<CommitRecord>>> {
    panic!("{} API must not be called for an explicit range", what)
}

impl CommitProvider for NoApi {
    fn pull_request_commits<'a>(
        &'a self,
        _pr: &'a PullRequestContext,
    ) -> impl Future<Output = Result<Vec<CommitRecord>>> + Send + 'a {
        unreachable_api("pull request")
    }

    fn repository_commits<'a>(
        &'a self,
        _owner: &'a str,
        _repo: &'a str,
        _max_pages: u32,
    ) -> impl Future<Output = Result<Vec<CommitRecord>>> + Send + 'a {
        unreachable_api("repository")
    }
}

fn git(repo_path: &Path, args: &[&str]) -> String {
    let output = std::process::Command::new("git")
        .args(args)
        .current_dir(repo_path)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}

fn create_test_repo() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let repo_path = dir.path().to_path_buf();

    git(&repo_path, &["init"]);
    git(&repo_path, &["config", "user.name", "Test User"]);
    git(&repo_path, &["config", "user.email", "test@example.com"]);

    (dir, repo_path)
}

fn commit_as(repo_path: &Path, author: &str, message: &str) -> String {
    git(
        repo_path,
        &["commit", "--allow-empty", "-m", message, "--author", author],
    );
    git(repo_path, &["rev-parse", "HEAD"])
}

/// root(Test) -> c1(Alice) -> c2(Bob) -> c3(Alice) -> c4(Carol)
fn linear_history() -> (TempDir, PathBuf, Vec<String>) {
    let (dir, path) = create_test_repo();
    let shas = vec![
        commit_as(&path, "Test User <test@example.com>", "root"),
        commit_as(&path, "Alice <a@x.com>", "one"),
        commit_as(&path, "Bob <b@y.com>", "two"),
        commit_as(&path, "Alice <a@x.com>", "three"),
        commit_as(&path, "Carol <c@z.com>", "four"),
    ];
    (dir, path, shas)
}

#[tokio::test]
async fn test_start_inclusive_range() {
    let (_dir, path, shas) = linear_history();
    let history = GitHistory::new(&path);

    let lines = history
        .author_lines(&shas[1], &shas[4], RangeBounds::StartInclusive)
        .await
        .unwrap();

    assert_eq!(lines, vec!["Alice <a@x.com>", "Bob <b@y.com>", "Alice <a@x.com>"]);
}

#[tokio::test]
async fn test_end_inclusive_range() {
    let (_dir, path, shas) = linear_history();
    let history = GitHistory::new(&path);

    let lines = history
        .author_lines(&shas[1], &shas[4], RangeBounds::EndInclusive)
        .await
        .unwrap();

    assert_eq!(lines, vec!["Bob <b@y.com>", "Alice <a@x.com>", "Carol <c@z.com>"]);
}

#[tokio::test]
async fn test_root_commit_as_start() {
    let (_dir, path, shas) = linear_history();
    let history = GitHistory::new(&path);

    let lines = history
        .author_lines(&shas[0], &shas[2], RangeBounds::StartInclusive)
        .await
        .unwrap();

    assert_eq!(lines, vec!["Test User <test@example.com>", "Alice <a@x.com>"]);
}

#[tokio::test]
async fn test_symbolic_refs_resolve() {
    let (_dir, path, _shas) = linear_history();
    let history = GitHistory::new(path.join("."));

    let lines = history
        .author_lines("HEAD~2", "HEAD", RangeBounds::EndInclusive)
        .await
        .unwrap();

    assert_eq!(lines, vec!["Alice <a@x.com>", "Carol <c@z.com>"]);
}

#[tokio::test]
async fn test_mailmap_is_applied() {
    let (_dir, path, shas) = linear_history();
    std::fs::write(path.join(".mailmap"), "Alice Liddell <a@x.com>\n").unwrap();
    git(&path, &["add", ".mailmap"]);
    git(&path, &["commit", "-m", "mailmap"]);
    let history = GitHistory::new(&path);

    let lines = history
        .author_lines(&shas[0], &shas[2], RangeBounds::EndInclusive)
        .await
        .unwrap();

    assert_eq!(lines, vec!["Alice Liddell <a@x.com>", "Bob <b@y.com>"]);
}

#[tokio::test]
async fn test_unknown_commit_is_unavailable() {
    let (_dir, path, shas) = linear_history();
    let history = GitHistory::new(&path);

    let err = history
        .author_lines("deadbeefdeadbeef", &shas[4], RangeBounds::StartInclusive)
        .await
        .unwrap_err();

    assert!(err.is_unavailable());
    assert!(err.message().contains("deadbeefdeadbeef"));
}

#[tokio::test]
async fn test_resolver_over_real_history() {
    let (_dir, path, shas) = linear_history();
    let history = GitHistory::new(&path);
    let path_str = path.to_string_lossy().to_string();
    let config = InputConfig {
        start_commit: Some(Cow::Borrowed(shas[1].as_str())),
        end_commit: Some(Cow::Borrowed(shas[4].as_str())),
        repo_path: Some(Cow::Borrowed(path_str.as_str())),
        ..Default::default()
    };
    let mut sink = MemorySink::new();

    AuthorResolver::new(&NoApi, &history, &config)
        .resolve_and_export(&mut sink)
        .await
        .unwrap();

    assert_eq!(
        sink.get(TARGET_AUTHORS),
        Some(r#"["Alice <a@x.com>","Bob <b@y.com>"]"#)
    );
    assert_eq!(sink.get(TARGET_COMMIT_COUNT), Some("2"));
    assert_eq!(sink.get(TARGET_REPO_PATH), Some(path_str.as_str()));
}

#[tokio::test]
async fn test_resolver_missing_repository() {
    let dir = TempDir::new().unwrap();
    let history = GitHistory::new(dir.path());
    let config = InputConfig {
        start_commit: Some(Cow::Borrowed("A")),
        end_commit: Some(Cow::Borrowed("B")),
        ..Default::default()
    };
    let mut sink = MemorySink::new();

    let resolution = AuthorResolver::new(&NoApi, &history, &config)
        .resolve_and_export(&mut sink)
        .await
        .unwrap();

    assert_eq!(resolution, Resolution::Skipped(SkipReason::SourceUnavailable));
    assert!(sink.is_empty());
}
