//! Output formatting and environment export

pub mod json_format;
pub mod writer;

pub use writer::{EnvSink, GithubEnvFile, MemorySink, StdoutSink};

use crate::error::Result;
use crate::types::Resolution;

/// JSON array of `Name <email>` strings
pub const TARGET_AUTHORS: &str = "TARGET_AUTHORS";
/// Highest per-email commit count
pub const TARGET_COMMIT_COUNT: &str = "TARGET_COMMIT_COUNT";
/// Echo of the explicit start commit
pub const TARGET_START_COMMIT: &str = "TARGET_START_COMMIT";
/// Echo of the explicit end commit
pub const TARGET_END_COMMIT: &str = "TARGET_END_COMMIT";
/// Echo of the explicit working copy path
pub const TARGET_REPO_PATH: &str = "TARGET_REPO_PATH";

/// Export a resolution through `sink`.
///
/// Skipped resolutions export nothing. Returns the number of variables
/// written.
pub fn export_resolution<S: EnvSink + ?Sized>(
    resolution: &Resolution,
    sink: &mut S,
) -> Result<usize> {
    let Resolution::Resolved { authors, range } = resolution else {
        return Ok(0);
    };

    let mut written = 0;
    if let Some(range) = range {
        sink.export(TARGET_START_COMMIT, &range.start_commit)?;
        sink.export(TARGET_END_COMMIT, &range.end_commit)?;
        written += 2;
        if let Some(path) = &range.repo_path {
            sink.export(TARGET_REPO_PATH, path)?;
            written += 1;
        }
    }

    let authors_json = json_format::format_json_array(&authors.authors);
    tracing::info!("Setting {} = {}", TARGET_AUTHORS, authors_json);
    tracing::info!("Setting {} = {}", TARGET_COMMIT_COUNT, authors.max_commit_count);

    sink.export(TARGET_AUTHORS, &authors_json)?;
    sink.export(TARGET_COMMIT_COUNT, &authors.max_commit_count.to_string())?;
    Ok(written + 2)
}
