//! GitHub API abstraction layer
//!
//! This module provides a trait-based abstraction over the GitHub REST
//! endpoints the pipeline needs, allowing for multiple implementations
//! including the real HTTP client and a mock implementation for testing.
//!
//! # Overview
//!
//! The primary abstraction is the [GitHubApi] trait. The concrete
//! implementations include:
//!
//! - [client::RestClient]: the real implementation over blocking HTTP
//! - [mock::MockGitHub]: a mock implementation for testing
//!
//! Operation handlers should depend on the [GitHubApi] trait rather than
//! concrete implementations to enable easy testing.

pub mod client;
pub mod mock;

pub use client::RestClient;
pub use mock::MockGitHub;

use crate::domain::{FileContent, PullRequestInfo, ReleaseRequest, Version};
use crate::error::Result;

/// Common GitHub operation trait for abstraction
///
/// All calls are authenticated with the bearer credential injected at
/// construction time; none of them retry. Implementations map HTTP failures
/// to the [crate::error::GhOpsError] taxonomy: 401/403 become `Unauthorized`,
/// a stale blob hash on a contents update becomes `UpdateConflict`, and other
/// non-2xx responses surface their status and body.
pub trait GitHubApi: Send + Sync {
    /// Get the most recently created release of a repository as a version
    ///
    /// Lists releases and picks the newest by creation timestamp (the
    /// endpoint's ordering is not trusted). Fails with `NoReleasesFound`
    /// when the repository has no releases; handlers treat that case as the
    /// seed version, not as fatal.
    fn get_latest_release(&self, owner: &str, repo: &str) -> Result<Version>;

    /// Create a release and return its id
    ///
    /// Fails with `ReleaseCreationFailed` carrying the upstream status and
    /// body on any non-2xx response.
    fn create_release(&self, owner: &str, repo: &str, request: &ReleaseRequest) -> Result<u64>;

    /// Upload an asset to an existing release
    fn upload_release_asset(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<()>;

    /// Fetch a file's content and blob hash at a ref
    ///
    /// The returned sha must be supplied back to [GitHubApi::update_file];
    /// GitHub rejects updates whose hash is stale.
    fn get_file(&self, owner: &str, repo: &str, path: &str, git_ref: &str) -> Result<FileContent>;

    /// Commit a new version of a file to a branch, returning the commit sha
    ///
    /// Fails with `UpdateConflict` if the supplied hash no longer matches
    /// the file's current blob.
    fn update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        sha: Option<&str>,
        branch: &str,
        message: &str,
    ) -> Result<String>;

    /// Create a branch ref from `from_ref` if it does not exist; no-op otherwise
    fn ensure_branch(&self, owner: &str, repo: &str, branch: &str, from_ref: &str) -> Result<()>;

    /// Open a pull request for `head`, or update the existing open one's title/body
    ///
    /// Returns the PR number either way.
    fn create_or_update_pull_request(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<u64>;

    /// The repository's default branch name
    fn default_branch(&self, owner: &str, repo: &str) -> Result<String>;

    /// Resolve a tag name to the commit it points at
    ///
    /// Annotated tags are dereferenced to their target commit.
    fn resolve_tag_commit(&self, owner: &str, repo: &str, tag: &str) -> Result<String>;

    /// Fetch pull request metadata including label names
    fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequestInfo>;

    /// Find the pull request a commit was merged from, if any
    ///
    /// Tries the commit's associated-pulls listing first, then falls back to
    /// scanning the commit message for common merge patterns.
    fn find_pr_for_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<Option<u64>>;

    /// Add labels to an issue or pull request
    fn add_labels(&self, owner: &str, repo: &str, issue: u64, labels: &[String]) -> Result<()>;
}
