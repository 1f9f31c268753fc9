use thiserror::Error;

/// Unified error type for gh-release-ops operations
#[derive(Error, Debug)]
pub enum GhOpsError {
    #[error("Invalid version format: {0}")]
    InvalidVersionFormat(String),

    #[error("No releases found for {owner}/{repo}")]
    NoReleasesFound { owner: String, repo: String },

    #[error("GitHub rejected the credential (HTTP {status})")]
    Unauthorized { status: u16 },

    #[error("Release creation failed (HTTP {status}): {body}")]
    ReleaseCreationFailed { status: u16, body: String },

    #[error("Update conflict for '{path}': the supplied blob sha is stale")]
    UpdateConflict { path: String },

    #[error("Missing parameter: {0}")]
    MissingParameter(String),

    #[error("GitHub API error (HTTP {status}): {body}")]
    Api { status: u16, body: String },

    #[error("Malformed response: {0}")]
    Malformed(String),

    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in gh-release-ops
pub type Result<T> = std::result::Result<T, GhOpsError>;

impl GhOpsError {
    /// Create an invalid-version error with context
    pub fn invalid_version(msg: impl Into<String>) -> Self {
        GhOpsError::InvalidVersionFormat(msg.into())
    }

    /// Create a no-releases error for a repository
    pub fn no_releases(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        GhOpsError::NoReleasesFound {
            owner: owner.into(),
            repo: repo.into(),
        }
    }

    /// Create a missing-parameter error
    pub fn missing(name: impl Into<String>) -> Self {
        GhOpsError::MissingParameter(name.into())
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        GhOpsError::Config(msg.into())
    }

    /// Create a malformed-response error with context
    pub fn malformed(msg: impl Into<String>) -> Self {
        GhOpsError::Malformed(msg.into())
    }
}
