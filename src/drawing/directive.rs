//! Locating the compressed scene and the embedded-file directives inside a
//! drawing document's markdown.

use crate::error::ApiError;
use tracing::debug;

const PAYLOAD_FENCE: &str = "```compressed-json";
const FENCE: &str = "```";
const FILES_HEADER: &str = "## Embedded Files";
const FILES_END: &str = "%%";
const KEY_SEPARATOR: &str = ": ";

/// Key whose presence makes a document skip asset resolution.
pub const TAGS_KEY: &str = "tags";

/// One `key: value` line of the embedded files section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedFileDirective {
    pub key: String,
    pub raw: String,
}

/// What a directive points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectiveTarget {
    /// `[[name]]` or `[[name#fragment]]`, carrying `name`
    CrossReference(String),
    /// `$$formula$$`, carrying `formula`
    Formula(String),
    Unsupported,
}

impl EmbeddedFileDirective {
    pub fn target(&self) -> DirectiveTarget {
        let raw = self.raw.trim();
        if let Some(inner) = raw.strip_prefix("[[").and_then(|r| r.strip_suffix("]]")) {
            let name = inner.split('#').next().unwrap_or_default();
            return DirectiveTarget::CrossReference(name.to_string());
        }
        if raw.len() >= 4 {
            if let Some(inner) = raw.strip_prefix("$$").and_then(|r| r.strip_suffix("$$")) {
                return DirectiveTarget::Formula(inner.to_string());
            }
        }
        DirectiveTarget::Unsupported
    }
}

/// Text between the payload fence and the next closing fence.
pub fn extract_payload(text: &str) -> Result<&str, ApiError> {
    let start = text.find(PAYLOAD_FENCE).ok_or_else(|| {
        ApiError::DecodeError("compressed-json block not found".to_string())
    })?;
    let body_start = start + PAYLOAD_FENCE.len();
    let end = text[body_start..]
        .find(FENCE)
        .map(|offset| body_start + offset)
        .ok_or_else(|| ApiError::DecodeError("compressed-json block is not closed".to_string()))?;
    Ok(&text[body_start..end])
}

/// Parse the embedded files section into directives, in declaration order.
///
/// A document without the section has no directives. A repeated key keeps
/// its first position and takes the later value.
pub fn parse_directives(text: &str) -> Vec<EmbeddedFileDirective> {
    let Some(start) = text.find(FILES_HEADER) else {
        return Vec::new();
    };
    let body_start = start + FILES_HEADER.len();
    let section = match text[body_start..].find(FILES_END) {
        Some(offset) => &text[body_start..body_start + offset],
        None => &text[body_start..],
    };

    let mut directives: Vec<EmbeddedFileDirective> = Vec::new();
    for line in section.lines().filter(|l| !l.trim().is_empty()) {
        let Some((key, raw)) = line.split_once(KEY_SEPARATOR) else {
            debug!(line, "Skipping embedded file line without key separator");
            continue;
        };
        let key = key.trim();
        match directives.iter_mut().find(|d| d.key == key) {
            Some(existing) => existing.raw = raw.to_string(),
            None => directives.push(EmbeddedFileDirective {
                key: key.to_string(),
                raw: raw.to_string(),
            }),
        }
    }
    directives
}

/// True when the directive list carries a non-empty `tags` entry.
pub fn has_tags(directives: &[EmbeddedFileDirective]) -> bool {
    directives
        .iter()
        .any(|d| d.key == TAGS_KEY && !d.raw.trim().is_empty())
}
