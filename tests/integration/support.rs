//! In-memory repository source and fixture helpers.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use folio::drawing::lz::compress_to_base64;
use folio::error::ApiError;
use folio::source::RepositorySource;
use folio::types::{BlobRecord, FlatEntry, RepoRef};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Repository held in memory: files by path, addressable by path or sha.
#[derive(Default)]
pub struct InMemorySource {
    entries: Vec<FlatEntry>,
    by_sha: HashMap<String, String>,
    by_path: HashMap<String, String>,
    fail_tree: bool,
    pub blob_calls: AtomicUsize,
    pub contents_calls: AtomicUsize,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file; content is stored base64 encoded and wrapped like upstream.
    pub fn with_file(mut self, path: &str, sha: &str, content: &[u8]) -> Self {
        let encoded = wrap(&STANDARD.encode(content));
        self.entries.push(FlatEntry::file(path, sha));
        self.by_sha.insert(sha.to_string(), encoded.clone());
        self.by_path.insert(path.to_string(), encoded);
        self
    }

    pub fn with_dir(mut self, path: &str, sha: &str) -> Self {
        self.entries.push(FlatEntry::dir(path, sha));
        self
    }

    pub fn failing_tree(mut self) -> Self {
        self.fail_tree = true;
        self
    }

    pub fn blob_calls(&self) -> usize {
        self.blob_calls.load(Ordering::SeqCst)
    }
}

fn wrap(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(60)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

#[async_trait]
impl RepositorySource for InMemorySource {
    async fn fetch_tree(&self, _repo: &RepoRef) -> Result<Vec<FlatEntry>, ApiError> {
        if self.fail_tree {
            return Err(ApiError::UpstreamError {
                status: 403,
                message: "API rate limit exceeded".to_string(),
            });
        }
        Ok(self.entries.clone())
    }

    async fn fetch_blob(&self, _repo: &RepoRef, sha: &str) -> Result<BlobRecord, ApiError> {
        self.blob_calls.fetch_add(1, Ordering::SeqCst);
        self.by_sha
            .get(sha)
            .map(|content| BlobRecord {
                content: content.clone(),
                path: None,
            })
            .ok_or_else(|| ApiError::UpstreamError {
                status: 404,
                message: "Not Found".to_string(),
            })
    }

    async fn fetch_contents(&self, _repo: &RepoRef, path: &str) -> Result<BlobRecord, ApiError> {
        self.contents_calls.fetch_add(1, Ordering::SeqCst);
        self.by_path
            .get(path)
            .map(|content| BlobRecord {
                content: content.clone(),
                path: Some(path.to_string()),
            })
            .ok_or_else(|| ApiError::UpstreamError {
                status: 404,
                message: "Not Found".to_string(),
            })
    }
}

pub fn repo() -> RepoRef {
    RepoRef::new("octo", "notes")
}

/// Drawing markdown with the given scene and embedded-file lines.
pub fn drawing_markdown(scene: &serde_json::Value, files: &[&str]) -> String {
    let payload = wrap(&compress_to_base64(&scene.to_string()));
    format!(
        "---\n\nexcalidraw-plugin: parsed\n\n---\n==Switch to EXCALIDRAW VIEW==\n\n\
## Embedded Files\n{}\n\n%%\n# Drawing\n```compressed-json\n{}\n```\n%%",
        files.join("\n"),
        payload
    )
}
