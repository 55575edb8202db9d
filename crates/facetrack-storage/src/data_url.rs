//! Screenshot data URL decoding.

use base64::{engine::general_purpose::STANDARD, Engine};

use crate::error::{StorageError, StorageResult};

/// Marker that separates the media type from the payload.
const BASE64_MARKER: &str = ";base64,";

/// Decode a `data:image/png;base64,<payload>` URL into raw bytes.
///
/// Only the text after the last marker is decoded; a string with no marker is
/// treated as a bare payload. Whitespace inside the payload is ignored.
pub fn decode_data_url(data_url: &str) -> StorageResult<Vec<u8>> {
    let payload = data_url.rsplit(BASE64_MARKER).next().unwrap_or(data_url);

    let cleaned: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    if cleaned.is_empty() {
        return Err(StorageError::invalid_screenshot("empty payload"));
    }

    STANDARD
        .decode(cleaned.as_bytes())
        .map_err(|e| StorageError::invalid_screenshot(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_png_data_url() {
        let bytes = decode_data_url("data:image/png;base64,iVBORw0KGgo=").unwrap();
        assert_eq!(bytes, vec![0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a]);
    }

    #[test]
    fn test_decode_bare_payload() {
        assert_eq!(decode_data_url("aGVsbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_ignores_line_breaks() {
        assert_eq!(decode_data_url("data:image/png;base64,aGVs\nbG8=").unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_data_url("data:image/png;base64,!!!not-base64!!!"),
            Err(StorageError::InvalidScreenshot(_))
        ));
        assert!(matches!(
            decode_data_url("data:image/png;base64,"),
            Err(StorageError::InvalidScreenshot(_))
        ));
    }
}
