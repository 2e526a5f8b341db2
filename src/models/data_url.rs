//! Helpers for `data:<mime>;base64,<payload>` URIs.

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Encodes raw bytes as a base64 `data:` URI with the given MIME type.
pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Returns the base64 payload of a string, stripping a leading
/// `data:<mime>;base64,` marker if present.
pub fn payload(value: &str) -> &str {
    match value.strip_prefix("data:") {
        Some(rest) => rest.split_once(',').map_or(value, |(_, data)| data),
        None => value,
    }
}

/// Returns the MIME type declared by a `data:` URI, if any.
pub fn mime_type(value: &str) -> Option<&str> {
    let (header, _) = value.strip_prefix("data:")?.split_once(',')?;
    let mime = header.split(';').next()?;
    (!mime.is_empty()).then_some(mime)
}

/// Decodes a base64 payload, with or without a `data:` marker.
pub fn decode(value: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(payload(value).trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_builds_prefixed_uri() {
        assert_eq!(encode("image/png", b"abc"), "data:image/png;base64,YWJj");
    }

    #[test]
    fn payload_strips_marker_only_when_present() {
        assert_eq!(payload("data:image/png;base64,YWJj"), "YWJj");
        assert_eq!(payload("YWJj"), "YWJj");
        assert_eq!(payload("data:no-comma"), "data:no-comma");
    }

    #[test]
    fn mime_type_reads_header() {
        assert_eq!(mime_type("data:image/webp;base64,AAAA"), Some("image/webp"));
        assert_eq!(mime_type("AAAA"), None);
        assert_eq!(mime_type("data:;base64,AAAA"), None);
    }

    #[test]
    fn decode_accepts_both_forms() {
        assert_eq!(decode("data:image/png;base64,YWJj").unwrap(), b"abc");
        assert_eq!(decode("YWJj").unwrap(), b"abc");
        assert!(decode("data:image/png;base64,@@@").is_err());
    }
}
