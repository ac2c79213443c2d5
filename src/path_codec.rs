//! Query-parameter codec for repository paths.
//!
//! The viewer's legacy `?file=` links carry a path in a single query value.
//! The first `.` is swapped for a NUL sentinel before percent-encoding so the
//! value never looks like it carries an extension; decoding reverses both
//! steps.

use crate::error::ApiError;

const SENTINEL: char = '\u{0}';

/// Encode a path for use as a query parameter value.
pub fn encode_segment(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let substituted = path.replacen('.', &SENTINEL.to_string(), 1);
    urlencoding::encode(&substituted).into_owned()
}

/// Decode a value produced by [`encode_segment`].
pub fn decode_segment(encoded: &str) -> Result<String, ApiError> {
    if encoded.is_empty() {
        return Ok(String::new());
    }
    let decoded = urlencoding::decode(encoded)
        .map_err(|e| ApiError::InvalidRequest(format!("Invalid encoded path: {}", e)))?;
    Ok(decoded.replacen(SENTINEL, ".", 1))
}

/// Legacy viewer link for a path: `/view?file=...`.
pub fn view_link(path: &str) -> String {
    format!("/view?file={}", encode_segment(path))
}
