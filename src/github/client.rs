use crate::config::Config;
use crate::domain::{FileContent, PullRequestInfo, ReleaseInfo, ReleaseRequest, Version};
use crate::error::{GhOpsError, Result};
use crate::github::GitHubApi;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::blocking::{Client, Response};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::json;

/// Real GitHub client over blocking HTTP
///
/// Holds the bearer credential for the lifetime of the process; the
/// credential is injected once at construction and never read from the
/// environment inside call sites.
pub struct RestClient {
    http: Client,
    token: String,
    api_base: String,
    uploads_base: String,
}

#[derive(Debug, Deserialize)]
struct CreatedRelease {
    id: u64,
}

#[derive(Debug, Deserialize)]
struct ContentsResponse {
    sha: String,
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    encoding: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct UpdateFileResponse {
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct GitObject {
    sha: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Debug, Deserialize)]
struct GitRef {
    object: GitObject,
}

#[derive(Debug, Deserialize)]
struct PrNumber {
    number: u64,
}

#[derive(Debug, Deserialize)]
struct LabelRef {
    name: String,
}

#[derive(Debug, Deserialize)]
struct PrResponse {
    number: u64,
    title: String,
    #[serde(default)]
    labels: Vec<LabelRef>,
}

#[derive(Debug, Deserialize)]
struct CommitMessage {
    message: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    commit: CommitMessage,
}

#[derive(Debug, Deserialize)]
struct RepoResponse {
    default_branch: String,
}

impl RestClient {
    /// Create a new client with the given bearer credential
    pub fn new(token: String, config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "X-GitHub-Api-Version",
            HeaderValue::from_static("2022-11-28"),
        );
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&config.github.user_agent)
                .map_err(|e| GhOpsError::config(format!("invalid user agent: {}", e)))?,
        );

        let http = Client::builder().default_headers(headers).build()?;

        Ok(RestClient {
            http,
            token,
            api_base: config.github.api_base.clone(),
            uploads_base: config.github.uploads_base.clone(),
        })
    }

    fn auth(&self) -> String {
        format!("Bearer {}", self.token)
    }

    /// Map a non-2xx response to the error taxonomy
    fn error_for(&self, status: StatusCode, body: String) -> GhOpsError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GhOpsError::Unauthorized {
                status: status.as_u16(),
            },
            _ => GhOpsError::Api {
                status: status.as_u16(),
                body,
            },
        }
    }

    /// Fail unless the response is 2xx, otherwise hand back the response
    fn check(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(self.error_for(status, response.text().unwrap_or_default()))
        }
    }

    fn git_ref(&self, owner: &str, repo: &str, name: &str) -> Result<GitRef> {
        let url = format!("{}/repos/{}/{}/git/ref/{}", self.api_base, owner, repo, name);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .send()?;
        Ok(self.check(response)?.json()?)
    }
}

impl GitHubApi for RestClient {
    fn get_latest_release(&self, owner: &str, repo: &str) -> Result<Version> {
        let url = format!("{}/repos/{}/{}/releases", self.api_base, owner, repo);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .send()?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(GhOpsError::no_releases(owner, repo));
        }
        if !status.is_success() {
            return Err(self.error_for(status, response.text().unwrap_or_default()));
        }

        let releases: Vec<ReleaseInfo> = response.json()?;
        let newest =
            newest_release(releases).ok_or_else(|| GhOpsError::no_releases(owner, repo))?;
        Version::parse(&newest.tag_name)
    }

    fn create_release(&self, owner: &str, repo: &str, request: &ReleaseRequest) -> Result<u64> {
        let url = format!("{}/repos/{}/{}/releases", self.api_base, owner, repo);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.auth())
            .json(request)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GhOpsError::Unauthorized {
                    status: status.as_u16(),
                },
                _ => GhOpsError::ReleaseCreationFailed {
                    status: status.as_u16(),
                    body,
                },
            });
        }

        let created: CreatedRelease = response.json()?;
        Ok(created.id)
    }

    fn upload_release_asset(
        &self,
        owner: &str,
        repo: &str,
        release_id: u64,
        name: &str,
        content_type: &str,
        data: Vec<u8>,
    ) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/releases/{}/assets",
            self.uploads_base, owner, repo, release_id
        );
        let content_type = HeaderValue::from_str(content_type)
            .map_err(|e| GhOpsError::config(format!("invalid asset content type: {}", e)))?;
        let response = self
            .http
            .post(&url)
            .query(&[("name", name)])
            .header(AUTHORIZATION, self.auth())
            .header(CONTENT_TYPE, content_type)
            .body(data)
            .send()?;

        self.check(response)?;
        Ok(())
    }

    fn get_file(&self, owner: &str, repo: &str, path: &str, git_ref: &str) -> Result<FileContent> {
        let url = format!("{}/repos/{}/{}/contents/{}", self.api_base, owner, repo, path);
        let response = self
            .http
            .get(&url)
            .query(&[("ref", git_ref)])
            .header(AUTHORIZATION, self.auth())
            .send()?;

        let raw: ContentsResponse = self.check(response)?.json()?;
        let content = match (raw.content, raw.encoding.as_deref()) {
            (Some(data), Some("base64")) => {
                // GitHub wraps base64 payloads in newlines
                let compact: String = data.chars().filter(|c| !c.is_whitespace()).collect();
                let bytes = BASE64
                    .decode(compact)
                    .map_err(|e| GhOpsError::malformed(format!("bad base64 in '{}': {}", path, e)))?;
                String::from_utf8_lossy(&bytes).into_owned()
            }
            (Some(data), _) => data,
            (None, _) => String::new(),
        };

        Ok(FileContent {
            content,
            sha: raw.sha,
        })
    }

    fn update_file(
        &self,
        owner: &str,
        repo: &str,
        path: &str,
        content: &str,
        sha: Option<&str>,
        branch: &str,
        message: &str,
    ) -> Result<String> {
        let url = format!("{}/repos/{}/{}/contents/{}", self.api_base, owner, repo, path);
        let mut payload = json!({
            "message": message,
            "content": BASE64.encode(content),
            "branch": branch,
        });
        if let Some(sha) = sha {
            payload["sha"] = json!(sha);
        }

        let response = self
            .http
            .put(&url)
            .header(AUTHORIZATION, self.auth())
            .json(&payload)
            .send()?;

        let status = response.status();
        if status == StatusCode::CONFLICT {
            return Err(GhOpsError::UpdateConflict {
                path: path.to_string(),
            });
        }
        if !status.is_success() {
            return Err(self.error_for(status, response.text().unwrap_or_default()));
        }

        let updated: UpdateFileResponse = response.json()?;
        Ok(updated.commit.sha)
    }

    fn ensure_branch(&self, owner: &str, repo: &str, branch: &str, from_ref: &str) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/git/ref/heads/{}",
            self.api_base, owner, repo, branch
        );
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .send()?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status != StatusCode::NOT_FOUND {
            return Err(self.error_for(status, response.text().unwrap_or_default()));
        }

        let base = self.git_ref(owner, repo, &format!("heads/{}", from_ref))?;
        let url = format!("{}/repos/{}/{}/git/refs", self.api_base, owner, repo);
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.auth())
            .json(&json!({
                "ref": format!("refs/heads/{}", branch),
                "sha": base.object.sha,
            }))
            .send()?;

        self.check(response)?;
        Ok(())
    }

    fn create_or_update_pull_request(
        &self,
        owner: &str,
        repo: &str,
        head: &str,
        base: &str,
        title: &str,
        body: &str,
    ) -> Result<u64> {
        let url = format!("{}/repos/{}/{}/pulls", self.api_base, owner, repo);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("head", format!("{}:{}", owner, head)),
                ("state", "open".to_string()),
            ])
            .header(AUTHORIZATION, self.auth())
            .send()?;

        let open: Vec<PrNumber> = self.check(response)?.json()?;
        if let Some(existing) = open.first() {
            let url = format!(
                "{}/repos/{}/{}/pulls/{}",
                self.api_base, owner, repo, existing.number
            );
            let response = self
                .http
                .patch(&url)
                .header(AUTHORIZATION, self.auth())
                .json(&json!({ "title": title, "body": body }))
                .send()?;
            self.check(response)?;
            return Ok(existing.number);
        }

        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.auth())
            .json(&json!({
                "title": title,
                "head": head,
                "base": base,
                "body": body,
            }))
            .send()?;

        let created: PrNumber = self.check(response)?.json()?;
        Ok(created.number)
    }

    fn default_branch(&self, owner: &str, repo: &str) -> Result<String> {
        let url = format!("{}/repos/{}/{}", self.api_base, owner, repo);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .send()?;

        let details: RepoResponse = self.check(response)?.json()?;
        Ok(details.default_branch)
    }

    fn resolve_tag_commit(&self, owner: &str, repo: &str, tag: &str) -> Result<String> {
        let reference = self.git_ref(owner, repo, &format!("tags/{}", tag))?;
        if reference.object.kind != "tag" {
            return Ok(reference.object.sha);
        }

        // Annotated tag: dereference the tag object to its target commit
        let url = format!(
            "{}/repos/{}/{}/git/tags/{}",
            self.api_base, owner, repo, reference.object.sha
        );
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .send()?;
        let tag_object: GitRef = self.check(response)?.json()?;
        Ok(tag_object.object.sha)
    }

    fn get_pull_request(&self, owner: &str, repo: &str, number: u64) -> Result<PullRequestInfo> {
        let url = format!("{}/repos/{}/{}/pulls/{}", self.api_base, owner, repo, number);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .send()?;

        let pr: PrResponse = self.check(response)?.json()?;
        Ok(PullRequestInfo {
            number: pr.number,
            title: pr.title,
            labels: pr.labels.into_iter().map(|l| l.name).collect(),
        })
    }

    fn find_pr_for_commit(&self, owner: &str, repo: &str, sha: &str) -> Result<Option<u64>> {
        let url = format!(
            "{}/repos/{}/{}/commits/{}/pulls",
            self.api_base, owner, repo, sha
        );
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .send()?;

        let pulls: Vec<PrNumber> = self.check(response)?.json()?;
        if let Some(first) = pulls.first() {
            return Ok(Some(first.number));
        }

        // Fall back to scanning the commit message for merge patterns
        let url = format!("{}/repos/{}/{}/commits/{}", self.api_base, owner, repo, sha);
        let response = self
            .http
            .get(&url)
            .header(AUTHORIZATION, self.auth())
            .send()?;
        let commit: CommitResponse = self.check(response)?.json()?;

        Ok(extract_pr_from_message(&commit.commit.message))
    }

    fn add_labels(&self, owner: &str, repo: &str, issue: u64, labels: &[String]) -> Result<()> {
        let url = format!(
            "{}/repos/{}/{}/issues/{}/labels",
            self.api_base, owner, repo, issue
        );
        let response = self
            .http
            .post(&url)
            .header(AUTHORIZATION, self.auth())
            .json(&json!({ "labels": labels }))
            .send()?;

        self.check(response)?;
        Ok(())
    }
}

/// Pick the most recently created release, sorting explicitly instead of
/// trusting the endpoint's ordering.
pub(crate) fn newest_release(mut releases: Vec<ReleaseInfo>) -> Option<ReleaseInfo> {
    releases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    releases.into_iter().next()
}

/// Extract a PR number from a merge commit message.
pub(crate) fn extract_pr_from_message(message: &str) -> Option<u64> {
    let patterns = [
        r"Merge pull request #(\d+)",
        r"Pull request #(\d+)",
        r"#(\d+) from",
        r"PR-(\d+)",
    ];

    for pattern in patterns {
        if let Ok(re) = regex::Regex::new(pattern) {
            if let Some(captures) = re.captures(message) {
                if let Some(number) = captures.get(1) {
                    if let Ok(number) = number.as_str().parse::<u64>() {
                        return Some(number);
                    }
                }
            }
        }
    }

    None
}
