use crate::domain::{FileContent, PullRequestInfo, ReleaseRequest, Version};
use crate::error::{GhOpsError, Result};
use crate::github::GitHubApi;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// A file commit recorded by the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUpdate {
    pub path: String,
    pub content: String,
    pub branch: String,
    pub message: String,
}

/// A pull request opened or updated through the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPullRequest {
    pub number: u64,
    pub head: String,
    pub base: String,
    pub title: String,
    pub body: String,
}

/// Mock GitHub API for testing without network access
///
/// Canned data goes in through the `with_*` builders; mutations performed by
/// handlers are recorded and exposed through the `recorded_*` accessors.
#[derive(Default)]
pub struct MockGitHub {
    latest_release: Option<String>,
    default_branch: Option<String>,
    tag_commits: HashMap<String, String>,
    pull_requests: HashMap<u64, PullRequestInfo>,
    pr_for_commit: HashMap<String, u64>,
    files: Mutex<HashMap<(String, String), FileContent>>,
    branches: Mutex<HashSet<String>>,
    open_pr_heads: Mutex<HashMap<String, u64>>,
    next_pr_number: Mutex<u64>,
    next_commit: Mutex<u64>,

    created_releases: Mutex<Vec<ReleaseRequest>>,
    uploaded_assets: Mutex<Vec<String>>,
    updated_files: Mutex<Vec<RecordedUpdate>>,
    created_branches: Mutex<Vec<String>>,
    pull_request_events: Mutex<Vec<RecordedPullRequest>>,
    added_labels: Mutex<Vec<(u64, Vec<String>)>>,
}

impl MockGitHub {
    /// Create a new empty mock
    pub fn new() -> Self {
        MockGitHub {
            default_branch: Some("main".to_string()),
            ..MockGitHub::default()
        }
    }

    /// Set the latest release tag
    pub fn with_latest_release(mut self, tag: impl Into<String>) -> Self {
        self.latest_release = Some(tag.into());
        self
    }

    /// Set the repository's default branch
    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        self.default_branch = Some(branch.into());
        self
    }

    /// Map a tag to the commit it points at
    pub fn with_tag_commit(mut self, tag: impl Into<String>, sha: impl Into<String>) -> Self {
        self.tag_commits.insert(tag.into(), sha.into());
        self
    }

    /// Add a file at a ref
    pub fn with_file(
        self,
        git_ref: impl Into<String>,
        path: impl Into<String>,
        content: impl Into<String>,
        sha: impl Into<String>,
    ) -> Self {
        let git_ref = git_ref.into();
        self.branches.lock().unwrap().insert(git_ref.clone());
        self.files.lock().unwrap().insert(
            (git_ref, path.into()),
            FileContent {
                content: content.into(),
                sha: sha.into(),
            },
        );
        self
    }

    /// Add a pull request with labels
    pub fn with_pull_request(mut self, pr: PullRequestInfo) -> Self {
        self.pull_requests.insert(pr.number, pr);
        self
    }

    /// Map a commit sha to the PR it was merged from
    pub fn with_pr_for_commit(mut self, sha: impl Into<String>, number: u64) -> Self {
        self.pr_for_commit.insert(sha.into(), number);
        self
    }

    /// Pretend an open PR already exists for a head branch
    pub fn with_open_pr(self, head: impl Into<String>, number: u64) -> Self {
        self.open_pr_heads.lock().unwrap().insert(head.into(), number);
        self
    }

    pub fn recorded_releases(&self) -> Vec<ReleaseRequest> {
        self.created_releases.lock().unwrap().clone()
    }

    pub fn recorded_assets(&self) -> Vec<String> {
        self.uploaded_assets.lock().unwrap().clone()
    }

    pub fn recorded_updates(&self) -> Vec<RecordedUpdate> {
        self.updated_files.lock().unwrap().clone()
    }

    pub fn recorded_branches(&self) -> Vec<String> {
        self.created_branches.lock().unwrap().clone()
    }

    pub fn recorded_pull_requests(&self) -> Vec<RecordedPullRequest> {
        self.pull_request_events.lock().unwrap().clone()
    }

    pub fn recorded_labels(&self) -> Vec<(u64, Vec<String>)> {
        self.added_labels.lock().unwrap().clone()
    }
}

impl GitHubApi for MockGitHub {
    fn get_latest_release(&self, owner: &str, repo: &str) -> Result<Version> {
        match &self.latest_release {
            Some(tag) => Version::parse(tag),
            None => Err(GhOpsError::no_releases(owner, repo)),
        }
    }

    fn create_release(&self, _owner: &str, _repo: &str, request: &ReleaseRequest) -> Result<u64> {
        let mut releases = self.created_releases.lock().unwrap();
        releases.push(request.clone());
        Ok(releases.len() as u64)
    }

    fn upload_release_asset(
        &self,
        _owner: &str,
        _repo: &str,
        _release_id: u64,
        name: &str,
        _content_type: &str,
        _data: Vec<u8>,
    ) -> Result<()> {
        self.uploaded_assets.lock().unwrap().push(name.to_string());
        Ok(())
    }

    fn get_file(&self, _owner: &str, _repo: &str, path: &str, git_ref: &str) -> Result<FileContent> {
        self.files
            .lock()
            .unwrap()
            .get(&(git_ref.to_string(), path.to_string()))
            .cloned()
            .ok_or_else(|| GhOpsError::Api {
                status: 404,
                body: format!("no file '{}' at '{}'", path, git_ref),
            })
    }

    fn update_file(
        &self,
        _owner: &str,
        _repo: &str,
        path: &str,
        content: &str,
        _sha: Option<&str>,
        branch: &str,
        message: &str,
    ) -> Result<String> {
        let mut next = self.next_commit.lock().unwrap();
        *next += 1;
        let commit = format!("commit-{}", *next);

        self.files.lock().unwrap().insert(
            (branch.to_string(), path.to_string()),
            FileContent {
                content: content.to_string(),
                sha: format!("blob-{}", *next),
            },
        );
        self.updated_files.lock().unwrap().push(RecordedUpdate {
            path: path.to_string(),
            content: content.to_string(),
            branch: branch.to_string(),
            message: message.to_string(),
        });
        Ok(commit)
    }

    fn ensure_branch(&self, _owner: &str, _repo: &str, branch: &str, from_ref: &str) -> Result<()> {
        let mut branches = self.branches.lock().unwrap();
        if branches.contains(branch) {
            return Ok(());
        }
        branches.insert(branch.to_string());
        drop(branches);

        // Branching copies the source ref's tree
        let mut files = self.files.lock().unwrap();
        let copied: Vec<_> = files
            .iter()
            .filter(|((git_ref, _), _)| git_ref == from_ref)
            .map(|((_, path), content)| (path.clone(), content.clone()))
            .collect();
        for (path, content) in copied {
            files.insert((branch.to_string(), path), content);
        }
        drop(files);

        self.created_branches.lock().unwrap().push(branch.to_string());
        Ok(())
    }

    fn create_or_update_pull_request(
        &self,
        _owner: &str,
        _repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<u64> {
        let mut open = self.open_pr_heads.lock().unwrap();
        let number = match open.get(head) {
            Some(number) => *number,
            None => {
                let mut next = self.next_pr_number.lock().unwrap();
                *next += 1;
                open.insert(head.to_string(), *next);
                *next
            }
        };

        self.pull_request_events
            .lock()
            .unwrap()
            .push(RecordedPullRequest {
                number,
                head: head.to_string(),
                base: base.to_string(),
                title: title.to_string(),
                body: body.to_string(),
            });
        Ok(number)
    }

    fn default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        self.default_branch.clone().ok_or_else(|| GhOpsError::Api {
            status: 404,
            body: format!("unknown repository {}/{}", owner, repo),
        })
    }

    fn resolve_tag_commit(&self, _owner: &str, _repo: &str, tag: &str) -> Result<String> {
        self.tag_commits
            .get(tag)
            .cloned()
            .ok_or_else(|| GhOpsError::Api {
                status: 404,
                body: format!("no such tag '{}'", tag),
            })
    }

    fn get_pull_request(&self, _owner: &str, _repo: &str, number: u64) -> Result<PullRequestInfo> {
        self.pull_requests
            .get(&number)
            .cloned()
            .ok_or_else(|| GhOpsError::Api {
                status: 404,
                body: format!("no such pull request #{}", number),
            })
    }

    fn find_pr_for_commit(&self, _owner: &str, _repo: &str, sha: &str) -> Result<Option<u64>> {
        Ok(self.pr_for_commit.get(sha).copied())
    }

    fn add_labels(&self, _owner: &str, _repo: &str, issue: u64, labels: &[String]) -> Result<()> {
        self.added_labels
            .lock()
            .unwrap()
            .push((issue, labels.to_vec()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_latest_release() {
        let mock = MockGitHub::new().with_latest_release("v1.2.3");
        let version = mock.get_latest_release("acme", "widget").unwrap();
        assert_eq!(version, Version::new(1, 2, 3));
    }

    #[test]
    fn test_mock_no_releases() {
        let mock = MockGitHub::new();
        let err = mock.get_latest_release("acme", "widget").unwrap_err();
        assert!(matches!(err, GhOpsError::NoReleasesFound { .. }));
    }

    #[test]
    fn test_mock_records_releases() {
        let mock = MockGitHub::new();
        let request = ReleaseRequest::for_tag("v1.0.0", false);
        let id = mock.create_release("acme", "widget", &request).unwrap();
        assert_eq!(id, 1);
        assert_eq!(mock.recorded_releases(), vec![request]);
    }

    #[test]
    fn test_mock_branch_copies_files() {
        let mock = MockGitHub::new().with_file("main", "deps/widget", "abc", "sha-1");
        mock.ensure_branch("acme", "parent", "update-widget-v1.1.0", "main")
            .unwrap();

        let copied = mock
            .get_file("acme", "parent", "deps/widget", "update-widget-v1.1.0")
            .unwrap();
        assert_eq!(copied.content, "abc");
    }

    #[test]
    fn test_mock_ensure_branch_is_idempotent() {
        let mock = MockGitHub::new().with_file("main", "deps/widget", "abc", "sha-1");
        mock.ensure_branch("acme", "parent", "feature", "main").unwrap();
        mock.ensure_branch("acme", "parent", "feature", "main").unwrap();
        assert_eq!(mock.recorded_branches().len(), 1);
    }

    #[test]
    fn test_mock_reuses_open_pr() {
        let mock = MockGitHub::new().with_open_pr("update-widget-v1.1.0", 17);
        let number = mock
            .create_or_update_pull_request(
                "acme",
                "parent",
                "update-widget-v1.1.0",
                "main",
                "title",
                "body",
            )
            .unwrap();
        assert_eq!(number, 17);
    }
}
