//! Error types for prauthors-core

/// Result type alias for prauthors operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for prauthors operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Git history query error (bad range, missing repository)
    #[error("Git error: {0}")]
    Git(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Runtime error (Tokio, task join, etc.)
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// HTTP/API transport error
    #[error("HTTP error: {0}")]
    Http(String),

    /// The token lacks permission for the requested resource (401/403)
    #[error("Access denied: {0}")]
    AccessDenied(String),

    /// The requested resource does not exist (404)
    #[error("Not found: {0}")]
    NotFound(String),

    /// GitHub event payload parsing error
    #[error("Event parse error: {0}")]
    EventParse(String),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(String),

    /// Other errors
    #[error("Error: {0}")]
    Other(String),
}

impl From<git2::Error> for Error {
    fn from(err: git2::Error) -> Self {
        Error::Git(err.message().to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        // without_url() keeps query strings out of the message
        Error::Http(err.without_url().to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json(err.to_string())
    }
}

/// Fieldless error category for cheap pattern matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ErrorKind {
    /// Git history query error
    Git,
    /// Configuration error
    Config,
    /// I/O operation error
    Io,
    /// Runtime error
    Runtime,
    /// HTTP/API transport error
    Http,
    /// Permission error
    AccessDenied,
    /// Missing resource
    NotFound,
    /// GitHub event parsing error
    EventParse,
    /// JSON error
    Json,
    /// Other errors
    Other,
}

impl Error {
    /// Get the error kind.
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Error::Git(_) => ErrorKind::Git,
            Error::Config(_) => ErrorKind::Config,
            Error::Io(_) => ErrorKind::Io,
            Error::Runtime(_) => ErrorKind::Runtime,
            Error::Http(_) => ErrorKind::Http,
            Error::AccessDenied(_) => ErrorKind::AccessDenied,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::EventParse(_) => ErrorKind::EventParse,
            Error::Json(_) => ErrorKind::Json,
            Error::Other(_) => ErrorKind::Other,
        }
    }

    /// Borrow the error message.
    #[inline]
    pub fn message(&self) -> &str {
        match self {
            Error::Git(msg)
            | Error::Config(msg)
            | Error::Runtime(msg)
            | Error::Http(msg)
            | Error::AccessDenied(msg)
            | Error::NotFound(msg)
            | Error::EventParse(msg)
            | Error::Json(msg)
            | Error::Other(msg) => msg,
            Error::Io(_) => "I/O error",
        }
    }

    /// Whether this error means the commit source could not be reached.
    ///
    /// Such errors end a run with nothing exported instead of failing the
    /// pipeline. Only configuration mistakes and runtime faults fall outside.
    pub const fn is_unavailable(&self) -> bool {
        matches!(
            self.kind(),
            ErrorKind::Git
                | ErrorKind::Http
                | ErrorKind::AccessDenied
                | ErrorKind::NotFound
                | ErrorKind::EventParse
                | ErrorKind::Json
                | ErrorKind::Io
        )
    }
}
