//! Repository viewer
//!
//! Drives a single view: fetch and build the tree, fetch the requested file,
//! classify it, then hand it to the markdown or drawing pipeline. Failures
//! never escape [`RepositoryViewer::render`]; they turn into a placeholder
//! page carrying the error text.

use crate::config::ViewerConfig;
use crate::drawing::{DrawingDocument, DrawingProcessor};
use crate::error::ApiError;
use crate::markdown::MarkdownLinkResolver;
use crate::path_codec;
use crate::source::RepositorySource;
use crate::tree::{find_by_sha, TreeBuilder, TreeNode};
use crate::types::{BlobRecord, RepoRef};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::Serialize;
use tracing::{debug, error, info};

pub const PLACEHOLDER_NAME: &str = "Open a file";

const PLACEHOLDER_INTRO: &str =
    "Open a file to get started. \nIf you opened a file and still see an error, please report it.\n\n";

/// What to show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewRequest {
    pub repo: RepoRef,
    pub path: Option<String>,
    pub sha: Option<String>,
    /// Embedded (iframe) rendering without surrounding navigation
    pub raw: bool,
}

impl ViewRequest {
    pub fn new(repo: RepoRef) -> Self {
        Self {
            repo,
            path: None,
            sha: None,
            raw: false,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_sha(mut self, sha: impl Into<String>) -> Self {
        self.sha = Some(sha.into());
        self
    }

    pub fn raw(mut self, raw: bool) -> Self {
        self.raw = raw;
        self
    }

    /// Build a request from a legacy `?file=` value.
    pub fn from_file_query(repo: RepoRef, encoded: &str) -> Result<Self, ApiError> {
        let path = path_codec::decode_segment(encoded)?;
        let request = Self::new(repo);
        Ok(if path.is_empty() {
            request
        } else {
            request.with_path(path)
        })
    }
}

/// Response body of a non-markdown file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "lowercase")]
pub enum Body {
    Binary(Vec<u8>),
    Text(String),
}

/// Result of a view, one variant per kind of page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ViewOutcome {
    Markdown {
        name: String,
        path: String,
        html: String,
    },
    Drawing {
        name: String,
        path: String,
        document: DrawingDocument,
    },
    Content {
        name: String,
        path: String,
        content_type: &'static str,
        body: Body,
    },
    Placeholder {
        name: String,
        body: String,
    },
}

impl ViewOutcome {
    pub fn name(&self) -> &str {
        match self {
            ViewOutcome::Markdown { name, .. }
            | ViewOutcome::Drawing { name, .. }
            | ViewOutcome::Content { name, .. }
            | ViewOutcome::Placeholder { name, .. } => name,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, ViewOutcome::Placeholder { .. })
    }

    fn kind(&self) -> &'static str {
        match self {
            ViewOutcome::Markdown { .. } => "markdown",
            ViewOutcome::Drawing { .. } => "drawing",
            ViewOutcome::Content { .. } => "content",
            ViewOutcome::Placeholder { .. } => "placeholder",
        }
    }
}

/// A rendered view plus the navigation tree it was rendered against.
#[derive(Debug, Clone, Serialize)]
pub struct ViewPage {
    pub tree: Vec<TreeNode>,
    pub outcome: ViewOutcome,
    pub raw: bool,
}

/// Content type by file extension.
pub fn content_type_for(path: &str) -> &'static str {
    let extension = path.rsplit_once('.').map(|(_, ext)| ext).unwrap_or_default();
    match extension {
        "html" => "text/html",
        "css" => "text/css",
        "js" => "application/javascript",
        "json" => "application/json",
        "txt" => "text/plain",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// Images and PDFs are served as bytes; everything else as text.
pub fn is_binary_content(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type == "application/pdf"
}

/// Orchestrates one repository's views over a [`RepositorySource`].
pub struct RepositoryViewer<S> {
    source: S,
    processor: DrawingProcessor,
    config: ViewerConfig,
}

impl<S: RepositorySource> RepositoryViewer<S> {
    pub fn new(source: S, config: ViewerConfig) -> Self {
        Self {
            source,
            processor: DrawingProcessor::new(config.reconcile),
            config,
        }
    }

    pub fn with_processor(mut self, processor: DrawingProcessor) -> Self {
        self.processor = processor;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Fetch the flat listing, drop hidden entries and build the tree.
    pub async fn tree(&self, repo: &RepoRef) -> Result<Vec<TreeNode>, ApiError> {
        let entries = self.source.fetch_tree(repo).await?;
        let visible = entries.iter().filter(|entry| !entry.is_hidden());
        let tree = TreeBuilder::build(visible);
        debug!(repo = %repo, entries = entries.len(), "Built repository tree");
        Ok(tree)
    }

    /// Render a view. Never fails: errors become a placeholder page.
    pub async fn render(&self, request: &ViewRequest) -> ViewPage {
        let mut tree = Vec::new();
        let outcome = match self.try_render(request, &mut tree).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!(
                    repo = %request.repo,
                    path = ?request.path,
                    sha = ?request.sha,
                    error = %e,
                    "View failed, rendering placeholder"
                );
                self.placeholder(&tree, &request.repo, &e.to_string())
            }
        };
        info!(repo = %request.repo, kind = outcome.kind(), name = outcome.name(), "Rendered view");
        ViewPage {
            tree,
            outcome,
            raw: request.raw,
        }
    }

    async fn try_render(
        &self,
        request: &ViewRequest,
        tree: &mut Vec<TreeNode>,
    ) -> Result<ViewOutcome, ApiError> {
        *tree = self.tree(&request.repo).await?;
        let tree: &[TreeNode] = tree.as_slice();

        if request.sha.is_none() && request.path.is_none() {
            return Ok(self.placeholder(tree, &request.repo, ""));
        }
        if let Some(path) = &request.path {
            if path.split('/').any(|segment| segment == "..") {
                return Err(ApiError::InvalidRequest(format!("Invalid path: {}", path)));
            }
        }

        let blob = self.fetch(request).await?;
        let path = request
            .path
            .clone()
            .or_else(|| blob.path.clone())
            .or_else(|| {
                request
                    .sha
                    .as_deref()
                    .and_then(|sha| find_by_sha(tree, sha))
                    .map(|file| file.path.clone())
            })
            .ok_or_else(|| ApiError::NotFound("Unable to determine the file path".to_string()))?;

        let bytes = decode_content(&blob.content)?;
        let file_name = path.rsplit('/').next().unwrap_or(path.as_str());

        if path.ends_with(".md") {
            let name = file_name.strip_suffix(".md").unwrap_or(file_name).to_string();
            let text = String::from_utf8_lossy(&bytes);
            if text.contains(&self.config.drawing_marker) {
                let document = self
                    .processor
                    .process(&text, tree, &self.source, &request.repo)
                    .await?;
                return Ok(ViewOutcome::Drawing {
                    name,
                    path,
                    document,
                });
            }
            let html = MarkdownLinkResolver::new(tree, &request.repo, &self.config).resolve(&text);
            return Ok(ViewOutcome::Markdown { name, path, html });
        }

        let content_type = content_type_for(&path);
        let body = if is_binary_content(content_type) {
            Body::Binary(bytes)
        } else {
            Body::Text(String::from_utf8_lossy(&bytes).into_owned())
        };
        Ok(ViewOutcome::Content {
            name: file_name.to_string(),
            path,
            content_type,
            body,
        })
    }

    async fn fetch(&self, request: &ViewRequest) -> Result<BlobRecord, ApiError> {
        match (&request.sha, &request.path) {
            (Some(sha), _) => self.source.fetch_blob(&request.repo, sha).await,
            (None, Some(path)) => self.source.fetch_contents(&request.repo, path).await,
            (None, None) => Err(ApiError::InvalidRequest("No file requested".to_string())),
        }
    }

    fn placeholder(&self, tree: &[TreeNode], repo: &RepoRef, detail: &str) -> ViewOutcome {
        let text = format!("{}{}", PLACEHOLDER_INTRO, detail);
        ViewOutcome::Placeholder {
            name: PLACEHOLDER_NAME.to_string(),
            body: MarkdownLinkResolver::new(tree, repo, &self.config).resolve(&text),
        }
    }
}

/// Decode base64 content that may be line-wrapped.
fn decode_content(content: &str) -> Result<Vec<u8>, ApiError> {
    let cleaned: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| ApiError::DecodeError(format!("Invalid base64 file content: {}", e)))
}
