#[cfg(target_env = "musl")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use clap::Parser;
use prauthors_core::context::{RunContext, RunEnvironment};
use prauthors_core::git::GitHistory;
use prauthors_core::http::GitHubApiClient;
use prauthors_core::output::json_format::parse_login_list;
use prauthors_core::output::{export_resolution, EnvSink, GithubEnvFile, StdoutSink};
use prauthors_core::{
    ApiFailurePolicy, AuthorResolver, InputConfig, MemorySink, RangeBounds, Resolution,
};
use std::borrow::Cow;
use std::io::Write;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "prauthors",
    version,
    about = "Resolve pull-request commit authors for downstream workflow steps"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Resolve authors and export TARGET_AUTHORS / TARGET_COMMIT_COUNT
    Resolve(ResolveArgs),
}

#[derive(clap::Args)]
struct ResolveArgs {
    /// First commit of an explicit range (requires --end-commit)
    #[arg(long, env = "start_commit")]
    start_commit: Option<String>,

    /// Last commit of an explicit range (requires --start-commit)
    #[arg(long, env = "end_commit")]
    end_commit: Option<String>,

    /// Working copy for history queries (default: current directory)
    #[arg(long, env = "repo_path")]
    repo_path: Option<String>,

    /// Range inclusion: start-inclusive or end-inclusive
    #[arg(long, env = "PRAUTHORS_RANGE_BOUNDS", default_value = "start-inclusive")]
    range_bounds: String,

    /// Assignee logins, as a JSON array or comma-separated
    #[arg(long, env = "assignees")]
    assignees: Option<String>,

    /// On PR fetch failure: terminate or repository-fallback
    #[arg(long, env = "PRAUTHORS_API_FAILURE", default_value = "terminate")]
    api_failure: String,

    /// List repository commits when there is no pull request context
    #[arg(long, env = "PRAUTHORS_REPOSITORY_FALLBACK")]
    repository_fallback: bool,

    /// Page limit for repository commit listings (100 commits per page)
    #[arg(long, env = "PRAUTHORS_MAX_REPOSITORY_PAGES", default_value_t = 1)]
    max_repository_pages: u32,

    /// GitHub token for API access
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// GitHub API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = "https://api.github.com")]
    api_url: String,

    /// Repository in owner/repo form
    #[arg(long, env = "GITHUB_REPOSITORY")]
    repository: Option<String>,

    /// Path to the webhook event payload
    #[arg(long, env = "GITHUB_EVENT_PATH")]
    event_path: Option<String>,

    /// Git ref of the run (refs/pull/<n>/merge for pull requests)
    #[arg(long, env = "GITHUB_REF")]
    github_ref: Option<String>,

    /// Output format: gha, json, text (default: auto-detect)
    #[arg(long, env = "PRAUTHORS_OUTPUT_FORMAT")]
    output_format: Option<String>,
}

/// Output format for the CLI
enum OutputFormat {
    /// GitHub Actions: append to $GITHUB_ENV + summary to stdout
    Gha,
    /// Full JSON to stdout
    Json,
    /// Human-readable text to stdout
    Text,
}

impl OutputFormat {
    fn detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("gha") => OutputFormat::Gha,
            Some("json") => OutputFormat::Json,
            Some("text") => OutputFormat::Text,
            _ => {
                if std::env::var("GITHUB_ACTIONS").is_ok() {
                    OutputFormat::Gha
                } else {
                    OutputFormat::Text
                }
            }
        }
    }
}

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_env("PRAUTHORS_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Resolve(args) => run_resolve(args),
    }
}

/// Filter empty string from Option (env vars may produce "" for empty values)
fn clean_opt(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn run_resolve(args: ResolveArgs) -> ExitCode {
    let output_format = OutputFormat::detect(clean_opt(&args.output_format));

    // Clean env var inputs (GHA sets empty strings for unset optional inputs)
    let start_commit = clean_opt(&args.start_commit);
    let end_commit = clean_opt(&args.end_commit);
    let repo_path = clean_opt(&args.repo_path);
    let token = clean_opt(&args.token).map(str::to_string);
    let assignees = clean_opt(&args.assignees).and_then(parse_login_list);

    if start_commit.is_some() != end_commit.is_some() {
        tracing::warn!("Both start_commit and end_commit are required; ignoring the range override");
    }

    let range_bounds = RangeBounds::parse(&args.range_bounds).unwrap_or_else(|| {
        tracing::warn!("Unknown range bounds {:?}, using start-inclusive", args.range_bounds);
        RangeBounds::default()
    });
    let api_failure = ApiFailurePolicy::parse(&args.api_failure).unwrap_or_else(|| {
        tracing::warn!("Unknown API failure policy {:?}, using terminate", args.api_failure);
        ApiFailurePolicy::default()
    });

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build();
    let rt = match rt {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error: failed to create runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        let env = RunEnvironment {
            repository: clean_opt(&args.repository),
            event_path: clean_opt(&args.event_path),
            github_ref: clean_opt(&args.github_ref),
        };
        let context = RunContext::resolve(&env).await.unwrap_or_else(|e| {
            tracing::warn!("Ignoring run context: {}", e);
            RunContext::default()
        });

        let config = InputConfig {
            start_commit: start_commit.map(Cow::Borrowed),
            end_commit: end_commit.map(Cow::Borrowed),
            repo_path: repo_path.map(Cow::Borrowed),
            range_bounds,
            pull_request: context.pull_request,
            repository: context.repository,
            assignees: assignees.map(|v| v.into_iter().map(Cow::Owned).collect()),
            api_failure,
            repository_fallback: args.repository_fallback,
            max_repository_pages: args.max_repository_pages,
        };

        let api = GitHubApiClient::new(args.api_url.clone(), token);
        let history = GitHistory::new(repo_path.unwrap_or("."));

        AuthorResolver::new(&api, &history, &config).resolve().await
    });

    let resolution = match result {
        Ok(resolution) => resolution,
        Err(e) => {
            // Never fail the pipeline: absence of output means nothing to propagate
            tracing::error!("Author resolution failed: {}", e);
            return ExitCode::SUCCESS;
        }
    };

    match output_format {
        OutputFormat::Gha => write_gha_output(&resolution),
        OutputFormat::Json => write_json_output(&resolution),
        OutputFormat::Text => write_text_output(&resolution),
    }

    ExitCode::SUCCESS
}

/// Export through `sink`, logging instead of failing
fn export_to<S: EnvSink>(resolution: &Resolution, sink: &mut S) {
    if let Err(e) = export_resolution(resolution, sink) {
        tracing::error!("Failed to export variables: {}", e);
    }
}

/// Append variables to $GITHUB_ENV
fn write_gha_output(resolution: &Resolution) {
    match GithubEnvFile::from_env() {
        Some(mut sink) => export_to(resolution, &mut sink),
        None => {
            tracing::warn!("GITHUB_ENV not set, falling back to stdout");
            export_to(resolution, &mut StdoutSink::new());
        }
    }
}

/// Write full JSON output to stdout
fn write_json_output(resolution: &Resolution) {
    let mut sink = MemorySink::new();
    export_to(resolution, &mut sink);

    let variables: serde_json::Map<String, serde_json::Value> = sink
        .writes()
        .iter()
        .map(|(name, value)| (name.clone(), serde_json::Value::String(value.clone())))
        .collect();

    let output = match resolution {
        Resolution::Resolved { authors, .. } => serde_json::json!({
            "resolved": true,
            "authors": authors.authors,
            "commit_count": authors.max_commit_count,
            "variables": variables,
        }),
        Resolution::Skipped(reason) => serde_json::json!({
            "resolved": false,
            "reason": reason.as_str(),
            "variables": variables,
        }),
    };

    let stdout = std::io::stdout();
    let mut lock = stdout.lock();
    let _ = serde_json::to_writer(&mut lock, &output);
    let _ = writeln!(lock);
}

/// Write human-readable text to stdout
fn write_text_output(resolution: &Resolution) {
    let stdout = std::io::stdout();
    let mut w = stdout.lock();

    let _ = writeln!(w, "PR Author Resolution");
    let _ = writeln!(w, "====================");

    match resolution {
        Resolution::Resolved { authors, range } => {
            if let Some(range) = range {
                let _ = writeln!(w, "Range: {} .. {}", range.start_commit, range.end_commit);
                if let Some(path) = &range.repo_path {
                    let _ = writeln!(w, "Repository: {path}");
                }
            }
            let _ = writeln!(w, "Authors ({}):", authors.authors.len());
            for author in &authors.authors {
                let _ = writeln!(w, "  {author}");
            }
            let _ = writeln!(w, "Highest commit count: {}", authors.max_commit_count);
        }
        Resolution::Skipped(reason) => {
            let _ = writeln!(w, "Nothing to export ({})", reason.as_str());
        }
    }
}
