//! GitHub REST implementation of [`RepositorySource`].

use crate::config::GithubConfig;
use crate::error::ApiError;
use crate::source::RepositorySource;
use crate::types::{BlobRecord, EntryMode, FlatEntry, RepoRef};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

/// Client for the git trees, git blobs and contents endpoints.
pub struct GithubSource {
    client: reqwest::Client,
    api_base: String,
    branch: String,
    token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitTreeResponse {
    tree: Vec<GitTreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct GitTreeEntry {
    path: String,
    mode: String,
    sha: String,
    #[serde(default)]
    url: Option<String>,
}

impl GithubSource {
    /// Build a source from configuration and an already-resolved token.
    pub fn new(config: &GithubConfig, token: Option<String>) -> Result<Self, ApiError> {
        config.validate().map_err(ApiError::ConfigError)?;
        let client = reqwest::Client::builder()
            .user_agent(concat!("folio/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            branch: config.branch.clone(),
            token,
        })
    }

    fn repo_url(&self, repo: &RepoRef, suffix: &str) -> String {
        format!(
            "{}/repos/{}/{}/{}",
            self.api_base,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name),
            suffix
        )
    }

    async fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        debug!(url, "GitHub request");
        let mut request = self
            .client
            .get(url)
            .header(ACCEPT, "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.header(AUTHORIZATION, format!("token {}", token));
        }

        let response = request.send().await?;
        let status = response.status();
        let body: Value = response.json().await?;

        if let Some(message) = body.get("message").and_then(Value::as_str) {
            return Err(ApiError::UpstreamError {
                status: status.as_u16(),
                message: message.to_string(),
            });
        }
        if !status.is_success() {
            return Err(ApiError::UpstreamError {
                status: status.as_u16(),
                message: status.canonical_reason().unwrap_or("error").to_string(),
            });
        }
        Ok(body)
    }
}

fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

fn entries_from_tree(response: GitTreeResponse) -> Vec<FlatEntry> {
    response
        .tree
        .into_iter()
        .map(|entry| FlatEntry {
            path: entry.path,
            mode: EntryMode::from_git_mode(&entry.mode),
            sha: entry.sha,
            url: entry.url,
        })
        .collect()
}

fn blob_from_body(body: Value) -> Result<BlobRecord, ApiError> {
    if body.is_array() {
        return Err(ApiError::InvalidRequest(
            "Path is a directory, not a file".to_string(),
        ));
    }
    Ok(serde_json::from_value(body)?)
}

#[async_trait]
impl RepositorySource for GithubSource {
    async fn fetch_tree(&self, repo: &RepoRef) -> Result<Vec<FlatEntry>, ApiError> {
        let url = self.repo_url(
            repo,
            &format!("git/trees/{}?recursive=1", urlencoding::encode(&self.branch)),
        );
        let response: GitTreeResponse = serde_json::from_value(self.get_json(&url).await?)?;
        if response.truncated {
            warn!(repo = %repo, "Repository tree listing was truncated upstream");
        }
        Ok(entries_from_tree(response))
    }

    async fn fetch_blob(&self, repo: &RepoRef, sha: &str) -> Result<BlobRecord, ApiError> {
        let url = self.repo_url(repo, &format!("git/blobs/{}", urlencoding::encode(sha)));
        blob_from_body(self.get_json(&url).await?)
    }

    async fn fetch_contents(&self, repo: &RepoRef, path: &str) -> Result<BlobRecord, ApiError> {
        let url = self.repo_url(repo, &format!("contents/{}", encode_path(path)));
        blob_from_body(self.get_json(&url).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> GithubSource {
        let config = GithubConfig {
            api_base: "https://api.github.com/".to_string(),
            ..GithubConfig::default()
        };
        GithubSource::new(&config, None).unwrap()
    }

    #[test]
    fn builds_repo_urls_without_double_slash() {
        let url = source().repo_url(&RepoRef::new("octo", "notes"), "git/blobs/abc");
        assert_eq!(url, "https://api.github.com/repos/octo/notes/git/blobs/abc");
    }

    #[test]
    fn encodes_each_path_segment() {
        assert_eq!(encode_path("my notes/a b.md"), "my%20notes/a%20b.md");
    }

    #[test]
    fn maps_tree_entries_to_flat_entries() {
        let body = serde_json::json!({
            "sha": "root",
            "tree": [
                {"path": "docs", "mode": "040000", "type": "tree", "sha": "d1", "url": "u1"},
                {"path": "docs/a.md", "mode": "100644", "type": "blob", "sha": "b1", "size": 3, "url": "u2"}
            ],
            "truncated": false
        });
        let response: GitTreeResponse = serde_json::from_value(body).unwrap();
        let entries = entries_from_tree(response);
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].mode, EntryMode::Dir);
        assert_eq!(entries[1].mode, EntryMode::File);
        assert_eq!(entries[1].url.as_deref(), Some("u2"));
    }

    #[test]
    fn directory_listing_is_not_a_blob() {
        let body = serde_json::json!([{"name": "a.md"}]);
        assert!(matches!(
            blob_from_body(body),
            Err(ApiError::InvalidRequest(_))
        ));
    }

    #[test]
    fn contents_body_keeps_path() {
        let body = serde_json::json!({"path": "docs/a.md", "content": "aGk=\n", "encoding": "base64"});
        let blob = blob_from_body(body).unwrap();
        assert_eq!(blob.path.as_deref(), Some("docs/a.md"));
        assert_eq!(blob.content, "aGk=\n");
    }
}
