//! LZ-string codec, base64 flavour.
//!
//! Drawing documents store their scene as LZ-string compressed JSON. The
//! codec itself comes from `lz_str`; it works on UTF-16 code units.

/// Turns the base64 payload of a drawing into its JSON text.
pub trait Decompressor: Send + Sync {
    /// `None` when the payload is not a valid stream.
    fn decompress(&self, input: &str) -> Option<String>;
}

/// Default decompressor: LZ-string `decompressFromBase64`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LzString;

impl Decompressor for LzString {
    fn decompress(&self, input: &str) -> Option<String> {
        decompress_from_base64(input)
    }
}

/// Decompress an LZ-string base64 payload.
pub fn decompress_from_base64(input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }
    let units = lz_str::decompress_from_base64(input)?;
    String::from_utf16(&units).ok()
}

/// Compress text into an LZ-string base64 payload.
pub fn compress_to_base64(input: &str) -> String {
    lz_str::compress_to_base64(input)
}
