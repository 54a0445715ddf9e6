//! Environment export sinks

use crate::error::Result;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Receives exported environment variables. Last write per name wins.
pub trait EnvSink {
    /// Export one variable
    fn export(&mut self, name: &str, value: &str) -> Result<()>;
}

impl<S: EnvSink + ?Sized> EnvSink for &mut S {
    fn export(&mut self, name: &str, value: &str) -> Result<()> {
        (**self).export(name, value)
    }
}

/// Appends variables to the file named by `$GITHUB_ENV`
#[derive(Debug, Clone)]
pub struct GithubEnvFile {
    path: PathBuf,
}

impl GithubEnvFile {
    /// Heredoc delimiter base
    const DELIMITER: &'static str = "PRAUTHORS_EOF";

    /// Sink writing to an explicit file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Sink for `$GITHUB_ENV`, if set and non-empty
    pub fn from_env() -> Option<Self> {
        std::env::var_os("GITHUB_ENV")
            .filter(|v| !v.is_empty())
            .map(Self::new)
    }

    /// Path of the env file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delimiter that does not occur in `value`
    fn delimiter_for(value: &str) -> String {
        let mut delim = Self::DELIMITER.to_string();
        let mut n = 0u32;
        while value.lines().any(|l| l == delim) {
            n += 1;
            delim = format!("{}_{}", Self::DELIMITER, n);
        }
        delim
    }
}

impl EnvSink for GithubEnvFile {
    fn export(&mut self, name: &str, value: &str) -> Result<()> {
        let mut f = std::fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;

        let delim = Self::delimiter_for(value);
        writeln!(f, "{name}<<{delim}")?;
        writeln!(f, "{value}")?;
        writeln!(f, "{delim}")?;
        Ok(())
    }
}

/// Records writes in memory
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    writes: Vec<(String, String)>,
}

impl MemorySink {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value exported under `name`
    pub fn get(&self, name: &str) -> Option<&str> {
        self.writes
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Every write in order
    pub fn writes(&self) -> &[(String, String)] {
        &self.writes
    }

    /// Whether nothing was exported
    pub fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }
}

impl EnvSink for MemorySink {
    fn export(&mut self, name: &str, value: &str) -> Result<()> {
        self.writes.push((name.to_string(), value.to_string()));
        Ok(())
    }
}

/// Prints `NAME=value` lines to a writer (stdout by default)
pub struct StdoutSink<W: Write = std::io::Stdout> {
    out: W,
}

impl StdoutSink {
    /// Sink printing to stdout
    pub fn new() -> Self {
        Self {
            out: std::io::stdout(),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl<W: Write> StdoutSink<W> {
    /// Sink printing to an arbitrary writer
    pub fn with_writer(out: W) -> Self {
        Self { out }
    }

    /// Recover the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> EnvSink for StdoutSink<W> {
    fn export(&mut self, name: &str, value: &str) -> Result<()> {
        writeln!(self.out, "{name}={value}")?;
        Ok(())
    }
}
