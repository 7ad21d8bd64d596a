//! Binary content policy.
//!
//! Decides, once per response, whether the body must travel base64
//! encoded. Shared by all four encoders.

/// Response header that forces binary encoding regardless of content
/// type. Set upstream (e.g. by a static-asset layer that already knows
/// the payload is binary); always stripped before the response leaves
/// the bridge.
pub const BASE64_SENTINEL_HEADER: &str = "x-gantry-base64";

/// Whether a response body needs base64 encoding for the wire.
///
/// The explicit override wins unconditionally. Otherwise textual MIME
/// types ship as plain text and everything else (images, fonts,
/// octet-stream, compressed formats) is binary. No content type is
/// treated as textual so plain responses are not inflated.
pub fn needs_base64(content_type: Option<&str>, explicit_override: bool) -> bool {
    if explicit_override {
        return true;
    }
    match content_type {
        None => false,
        Some(content_type) => !is_textual(content_type),
    }
}

fn is_textual(content_type: &str) -> bool {
    // Parameters (`; charset=utf-8`) do not affect classification.
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    mime.starts_with("text/")
        || matches!(
            mime.as_str(),
            "application/json"
                | "application/javascript"
                | "application/xml"
                | "application/xhtml+xml"
        )
        || mime.ends_with("+json")
        || mime.ends_with("+xml")
}
