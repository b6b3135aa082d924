// SPDX-FileCopyrightText: 2026 DarkGPT Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Image attachments carried as `data:` URIs.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use darkgpt_core::DarkgptError;

/// Media types accepted for image attachments.
pub const SUPPORTED_MEDIA_TYPES: [&str; 4] = ["image/png", "image/jpeg", "image/gif", "image/webp"];

/// A validated image attachment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    pub media_type: String,
    /// Base64 payload without the `data:` prefix.
    pub data: String,
    pub decoded_len: usize,
}

/// Parses and validates a `data:<mime>;base64,<payload>` URI.
pub fn parse_data_uri(uri: &str, max_bytes: usize) -> Result<ImageAttachment, DarkgptError> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| invalid("image must be a data: URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| invalid("image data URI has no payload"))?;
    let media_type = header
        .strip_suffix(";base64")
        .ok_or_else(|| invalid("image data URI must be base64-encoded"))?
        .to_ascii_lowercase();

    if !SUPPORTED_MEDIA_TYPES.contains(&media_type.as_str()) {
        return Err(invalid(format!(
            "unsupported image type '{media_type}' (expected one of: {})",
            SUPPORTED_MEDIA_TYPES.join(", ")
        )));
    }

    let payload = payload.trim();
    // Reject oversized payloads before allocating for the decode.
    if estimated_decoded_len(payload) > max_bytes {
        return Err(too_large(max_bytes));
    }

    let decoded = STANDARD
        .decode(payload)
        .map_err(|e| invalid(format!("image payload is not valid base64: {e}")))?;
    if decoded.is_empty() {
        return Err(invalid("image payload is empty"));
    }
    if decoded.len() > max_bytes {
        return Err(too_large(max_bytes));
    }

    Ok(ImageAttachment {
        media_type,
        data: payload.to_string(),
        decoded_len: decoded.len(),
    })
}

/// Encodes raw image bytes as a data URI.
pub fn encode_data_uri(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Guesses the media type of an image file from its extension.
pub fn media_type_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        _ => None,
    }
}

fn estimated_decoded_len(payload: &str) -> usize {
    let padding = payload.bytes().rev().take_while(|b| *b == b'=').count();
    (payload.len() / 4 * 3).saturating_sub(padding)
}

fn invalid(message: impl Into<String>) -> DarkgptError {
    DarkgptError::Validation(message.into())
}

fn too_large(max_bytes: usize) -> DarkgptError {
    DarkgptError::Validation(format!("image exceeds the {max_bytes} byte limit"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 4 * 1024 * 1024;

    #[test]
    fn parses_png() {
        let uri = encode_data_uri("image/png", b"\x89PNG fake");
        let image = parse_data_uri(&uri, LIMIT).unwrap();
        assert_eq!(image.media_type, "image/png");
        assert_eq!(image.decoded_len, 9);
    }

    #[test]
    fn exactly_at_limit_is_accepted() {
        let uri = encode_data_uri("image/jpeg", &vec![7u8; 1024]);
        assert!(parse_data_uri(&uri, 1024).is_ok());
    }

    #[test]
    fn over_four_mib_is_rejected() {
        let uri = encode_data_uri("image/png", &vec![0u8; LIMIT + 1]);
        let err = parse_data_uri(&uri, LIMIT).unwrap_err();
        assert!(matches!(err, DarkgptError::Validation(_)));
        assert!(err.to_string().contains("limit"));
    }

    #[test]
    fn rejects_unsupported_type() {
        let uri = encode_data_uri("image/svg+xml", b"<svg/>");
        assert!(parse_data_uri(&uri, LIMIT).is_err());
    }

    #[test]
    fn rejects_malformed_uris() {
        for uri in [
            "https://example.com/cat.png",
            "data:image/png;base64",
            "data:image/png,AAAA",
            "data:image/png;base64,@@@@",
            "data:image/png;base64,",
        ] {
            assert!(
                matches!(parse_data_uri(uri, LIMIT), Err(DarkgptError::Validation(_))),
                "{uri} should be rejected"
            );
        }
    }

    #[test]
    fn media_type_from_extension() {
        assert_eq!(media_type_for_path(Path::new("a/b.JPG")), Some("image/jpeg"));
        assert_eq!(media_type_for_path(Path::new("c.webp")), Some("image/webp"));
        assert_eq!(media_type_for_path(Path::new("notes.txt")), None);
        assert_eq!(media_type_for_path(Path::new("noext")), None);
    }
}
