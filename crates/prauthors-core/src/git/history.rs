//! Git history queries between boundary commits

use std::future::Future;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::traits::HistoryProvider;
use crate::types::RangeBounds;

/// Local git history rooted at a working copy path
///
/// git2::Repository is not Send/Sync due to internal raw pointers.
/// We work around this by storing the path and using spawn_blocking
/// for all git operations.
#[derive(Debug, Clone)]
pub struct GitHistory {
    path: PathBuf,
}

impl GitHistory {
    /// History for the repository containing `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Search path the repository is discovered from
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Discover the repository and verify it opens
    pub fn discover(&self) -> Result<git2::Repository> {
        let git_path =
            git2::Repository::discover_path(&self.path, &[] as &[&std::ffi::OsStr]).map_err(
                |e| {
                    Error::Git(format!(
                        "No git repository at {}: {}",
                        self.path.display(),
                        e.message()
                    ))
                },
            )?;
        Ok(git2::Repository::open(git_path)?)
    }

    /// Collect `Name <email>` lines for the range, oldest commit first.
    ///
    /// `StartInclusive` walks `end^@ --not start^@`: the start commit is part
    /// of the range, the end commit is not. `EndInclusive` is plain
    /// `start..end`. Mailmap entries are honored like `git log --format=%aN`.
    pub fn author_lines_blocking(
        &self,
        start: &str,
        end: &str,
        bounds: RangeBounds,
    ) -> Result<Vec<String>> {
        let repo = self.discover()?;
        let start_commit = resolve_commit(&repo, start)?;
        let end_commit = resolve_commit(&repo, end)?;

        let mut walk = repo.revwalk()?;
        walk.set_sorting(git2::Sort::TOPOLOGICAL | git2::Sort::REVERSE)?;

        match bounds {
            RangeBounds::StartInclusive => {
                for parent in end_commit.parent_ids() {
                    walk.push(parent)?;
                }
                for parent in start_commit.parent_ids() {
                    walk.hide(parent)?;
                }
            }
            RangeBounds::EndInclusive => {
                walk.push(end_commit.id())?;
                walk.hide(start_commit.id())?;
            }
        }

        let mailmap = repo.mailmap().ok();
        let mut lines = Vec::new();

        for oid in walk {
            let commit = repo.find_commit(oid?)?;
            let line = match &mailmap {
                Some(mailmap) => signature_line(&commit.author_with_mailmap(mailmap)?),
                None => signature_line(&commit.author()),
            };
            lines.push(line);
        }

        Ok(lines)
    }
}

fn resolve_commit<'r>(repo: &'r git2::Repository, spec: &str) -> Result<git2::Commit<'r>> {
    repo.revparse_single(spec)
        .and_then(|obj| obj.peel_to_commit())
        .map_err(|e| Error::Git(format!("Cannot resolve commit '{}': {}", spec, e.message())))
}

fn signature_line(sig: &git2::Signature<'_>) -> String {
    format!(
        "{} <{}>",
        String::from_utf8_lossy(sig.name_bytes()),
        String::from_utf8_lossy(sig.email_bytes())
    )
}

impl HistoryProvider for GitHistory {
    fn author_lines<'a>(
        &'a self,
        start: &'a str,
        end: &'a str,
        bounds: RangeBounds,
    ) -> impl Future<Output = Result<Vec<String>>> + Send + 'a {
        let history = self.clone();
        let start = start.to_string();
        let end = end.to_string();

        async move {
            tokio::task::spawn_blocking(move || {
                history.author_lines_blocking(&start, &end, bounds)
            })
            .await
            .map_err(|e| Error::Runtime(format!("Task join error: {}", e)))?
        }
    }
}
