use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Payload for creating a GitHub release
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReleaseRequest {
    pub tag_name: String,
    pub name: String,
    pub body: String,
    pub draft: bool,
    pub prerelease: bool,
}

impl ReleaseRequest {
    /// Build the standard release payload for a tag
    pub fn for_tag(tag: &str, draft: bool) -> Self {
        ReleaseRequest {
            tag_name: tag.to_string(),
            name: format!("Release {}", tag),
            body: format!("Release version {}", tag),
            draft,
            prerelease: false,
        }
    }
}

/// A published release as listed by the releases endpoint
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseInfo {
    pub id: u64,
    pub tag_name: String,
    pub created_at: DateTime<Utc>,
}

/// File content and blob hash as returned by the contents endpoint
///
/// The sha is required when writing the file back (optimistic concurrency).
#[derive(Debug, Clone, PartialEq)]
pub struct FileContent {
    pub content: String,
    pub sha: String,
}

/// Pull request metadata relevant to version bumping
#[derive(Debug, Clone, PartialEq)]
pub struct PullRequestInfo {
    pub number: u64,
    pub title: String,
    pub labels: Vec<String>,
}
