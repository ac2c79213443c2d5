//! Drawing documents
//!
//! A drawing is a markdown file carrying an LZ-string compressed scene plus an
//! "Embedded Files" section that maps keys to images in the repository or to
//! formulas. Processing decodes the scene, turns each directive into an inline
//! data-URL asset and rewrites the scene's `fileId` references to match.

pub mod directive;
pub mod formula;
pub mod lz;
pub mod processor;

pub use directive::{EmbeddedFileDirective, DirectiveTarget};
pub use formula::{FormulaRenderer, RendererFactory, SvgTextRenderer};
pub use lz::{Decompressor, LzString};
pub use processor::DrawingProcessor;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// How embedded assets are paired with scene elements.
///
/// Directives are numbered in declaration order and elements in scene order;
/// nothing links the two lists except that order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileMode {
    /// Pair by position, skipping elements without a matching asset.
    #[default]
    BestEffort,
    /// Fail when elements and assets cannot be paired one to one.
    Strict,
}

/// Rendered dimensions copied from the element that uses an asset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssetSize {
    pub width: f64,
    pub height: f64,
}

/// Inline file attached to a drawing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "dataURL", default)]
    pub data_url: String,
    #[serde(rename = "mimeType", default)]
    pub mime_type: String,
    /// Creation time, epoch milliseconds
    #[serde(default)]
    pub created: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<AssetSize>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Asset {
    pub fn new(id: impl Into<String>, data_url: String, mime_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            data_url,
            mime_type: mime_type.into(),
            created: chrono::Utc::now().timestamp_millis(),
            size: None,
            extra: Map::new(),
        }
    }
}

/// Decoded drawing scene.
///
/// Kept as the raw JSON object so an untouched scene serializes back exactly
/// as it was decoded. Only `elements` and `files` are ever interpreted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DrawingDocument {
    pub scene: Map<String, Value>,
}

impl DrawingDocument {
    pub fn elements(&self) -> Option<&Value> {
        self.scene.get("elements")
    }

    /// Elements in scene order, whether stored as an array or an object.
    pub fn elements_mut(&mut self) -> Vec<&mut Value> {
        match self.scene.get_mut("elements") {
            Some(Value::Array(items)) => items.iter_mut().collect(),
            Some(Value::Object(map)) => map.values_mut().collect(),
            _ => Vec::new(),
        }
    }

    /// The `files` value exactly as decoded.
    pub fn files(&self) -> Option<&Value> {
        self.scene.get("files")
    }

    /// Typed view of `files`; entries that are not asset objects are skipped.
    pub fn assets(&self) -> BTreeMap<String, Asset> {
        match self.files() {
            Some(Value::Object(files)) => files
                .iter()
                .filter_map(|(key, value)| {
                    Asset::deserialize(value).ok().map(|asset| (key.clone(), asset))
                })
                .collect(),
            _ => BTreeMap::new(),
        }
    }

    /// Replace `files` with the given assets.
    pub fn set_assets(&mut self, assets: &BTreeMap<String, Asset>) -> Result<(), serde_json::Error> {
        let files = serde_json::to_value(assets)?;
        self.scene.insert("files".to_string(), files);
        Ok(())
    }
}

/// Asset id for the n-th directive or the n-th referencing element.
pub fn asset_id(index: usize) -> String {
    format!("file-{}", index)
}

/// MIME type for an embedded file, by extension.
pub fn asset_mime_type(filename: &str) -> &'static str {
    let extension = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}
