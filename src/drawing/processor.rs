//! Drawing document processing: decode, resolve embedded files, reconcile ids.

use crate::drawing::directive::{self, DirectiveTarget, EmbeddedFileDirective};
use crate::drawing::formula::{FormulaRenderer, RendererFactory, SvgTextRenderer, SVG_MIME};
use crate::drawing::lz::{Decompressor, LzString};
use crate::drawing::{asset_id, asset_mime_type, Asset, AssetSize, DrawingDocument, ReconcileMode};
use crate::error::ApiError;
use crate::source::RepositorySource;
use crate::tree::{find_by_name, FileNode, TreeNode};
use crate::types::RepoRef;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::future::join_all;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns drawing markdown into a self-contained [`DrawingDocument`].
#[derive(Clone)]
pub struct DrawingProcessor {
    decompressor: Arc<dyn Decompressor>,
    renderer_factory: RendererFactory,
    reconcile: ReconcileMode,
}

/// A directive that produced (or will produce) an asset.
enum Planned<'t> {
    Blob {
        id: String,
        name: String,
        file: &'t FileNode,
    },
    Ready(Asset),
}

impl Default for DrawingProcessor {
    fn default() -> Self {
        Self::new(ReconcileMode::default())
    }
}

impl DrawingProcessor {
    pub fn new(reconcile: ReconcileMode) -> Self {
        Self {
            decompressor: Arc::new(LzString),
            renderer_factory: SvgTextRenderer::factory(),
            reconcile,
        }
    }

    pub fn with_decompressor(mut self, decompressor: Arc<dyn Decompressor>) -> Self {
        self.decompressor = decompressor;
        self
    }

    pub fn with_renderer_factory(mut self, factory: RendererFactory) -> Self {
        self.renderer_factory = factory;
        self
    }

    /// Decode the scene without touching embedded files.
    pub fn decode(&self, text: &str) -> Result<DrawingDocument, ApiError> {
        let payload = directive::extract_payload(text)?;
        self.decode_payload(payload)
    }

    fn decode_payload(&self, payload: &str) -> Result<DrawingDocument, ApiError> {
        let cleaned: String = payload.chars().filter(|c| *c != '\n' && *c != '\r').collect();
        let json = self
            .decompressor
            .decompress(&cleaned)
            .ok_or_else(|| ApiError::DecodeError("Failed to decompress drawing payload".to_string()))?;
        serde_json::from_str(&json)
            .map_err(|e| ApiError::DecodeError(format!("Invalid drawing JSON: {}", e)))
    }

    /// Decode the drawing and inline every embedded file it declares.
    ///
    /// Unresolvable references are dropped; upstream and decode failures abort
    /// the whole document.
    pub async fn process(
        &self,
        text: &str,
        tree: &[TreeNode],
        source: &dyn RepositorySource,
        repo: &RepoRef,
    ) -> Result<DrawingDocument, ApiError> {
        let payload = directive::extract_payload(text)?;
        let directives = directive::parse_directives(text);
        let mut document = self.decode_payload(payload)?;

        if directive::has_tags(&directives) {
            debug!("Drawing carries tags; skipping embedded files");
            return Ok(document);
        }

        let assets = self.resolve_assets(&directives, tree, source, repo).await?;
        self.reconcile(&mut document, assets)?;
        Ok(document)
    }

    async fn resolve_assets(
        &self,
        directives: &[EmbeddedFileDirective],
        tree: &[TreeNode],
        source: &dyn RepositorySource,
        repo: &RepoRef,
    ) -> Result<BTreeMap<String, Asset>, ApiError> {
        let mut renderer: Option<Box<dyn FormulaRenderer>> = None;
        let mut planned = Vec::with_capacity(directives.len());

        for (index, directive) in directives.iter().enumerate() {
            let id = asset_id(index);
            match directive.target() {
                DirectiveTarget::CrossReference(name) => match find_by_name(tree, &name) {
                    Some(file) => planned.push(Planned::Blob { id, name, file }),
                    None => debug!(key = %directive.key, name = %name, "Embedded file not found"),
                },
                DirectiveTarget::Formula(formula) => {
                    let renderer = renderer.get_or_insert_with(|| (self.renderer_factory)());
                    match renderer.render(&formula) {
                        Ok(data_url) => planned.push(Planned::Ready(Asset::new(id, data_url, SVG_MIME))),
                        Err(e) => warn!(key = %directive.key, error = %e, "Formula rendering failed"),
                    }
                }
                DirectiveTarget::Unsupported => {
                    debug!(key = %directive.key, raw = %directive.raw, "Unsupported embedded file")
                }
            }
        }

        // Fetches run concurrently; join_all yields results in declaration order.
        let results = join_all(planned.into_iter().map(|plan| async move {
            match plan {
                Planned::Ready(asset) => Ok(asset),
                Planned::Blob { id, name, file } => {
                    let blob = source.fetch_blob(repo, &file.sha).await?;
                    blob_asset(id, &name, &blob.content)
                }
            }
        }))
        .await;

        let mut assets = BTreeMap::new();
        for result in results {
            let asset = result?;
            assets.insert(asset.id.clone(), asset);
        }
        Ok(assets)
    }

    fn reconcile(
        &self,
        document: &mut DrawingDocument,
        mut assets: BTreeMap<String, Asset>,
    ) -> Result<(), ApiError> {
        let mut elements: Vec<&mut serde_json::Map<String, Value>> = document
            .elements_mut()
            .into_iter()
            .filter_map(Value::as_object_mut)
            .filter(|element| element.get("fileId").map(is_truthy).unwrap_or(false))
            .collect();

        let referenced = elements.len();
        if self.reconcile == ReconcileMode::Strict {
            let paired = (0..referenced).all(|k| assets.contains_key(&asset_id(k)));
            if !paired || referenced != assets.len() {
                return Err(ApiError::ReconcileError {
                    declared: assets.len(),
                    referenced,
                });
            }
        }

        for (position, element) in elements.iter_mut().enumerate() {
            let id = asset_id(position);
            element.insert("fileId".to_string(), Value::String(id.clone()));
            match assets.get_mut(&id) {
                Some(asset) => {
                    asset.size = Some(AssetSize {
                        width: element.get("width").and_then(Value::as_f64).unwrap_or_default(),
                        height: element.get("height").and_then(Value::as_f64).unwrap_or_default(),
                    });
                }
                None => warn!(file_id = %id, "Drawing element references a file with no asset"),
            }
        }

        document.set_assets(&assets)?;
        Ok(())
    }
}

/// Build a data-URL asset from base64 blob content.
fn blob_asset(id: String, name: &str, content: &str) -> Result<Asset, ApiError> {
    let cleaned: String = content.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| ApiError::DecodeError(format!("Invalid base64 content for {}: {}", name, e)))?;
    let mime_type = asset_mime_type(name);
    let data_url = format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes));
    Ok(Asset::new(id, data_url, mime_type))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
