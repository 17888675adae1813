//! Transport decoding of body data

use base64::Engine;
use base64::engine::general_purpose::{URL_SAFE, URL_SAFE_NO_PAD};
use std::string::FromUtf8Error;

/// Error decoding a transport-encoded body
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid base64 body data: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
    #[error("body is not valid UTF-8: {0}")]
    InvalidUtf8(#[from] FromUtf8Error),
}

/// Decode URL-safe base64 body data into UTF-8 text.
///
/// Input must be either fully padded or carry no padding at all; a
/// partial padding run such as `QQ=` is rejected. Absent (or empty) body
/// data is not an error and yields `Ok(None)`.
pub fn decode_body(data: Option<&str>) -> Result<Option<String>, DecodeError> {
    let Some(data) = data.filter(|d| !d.is_empty()) else {
        return Ok(None);
    };

    let bytes = if data.contains('=') {
        URL_SAFE.decode(data)?
    } else {
        URL_SAFE_NO_PAD.decode(data)?
    };
    let text = String::from_utf8(bytes)?;
    Ok(Some(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_padded_and_unpadded() {
        // "Hello, World!" in base64url
        assert_eq!(
            decode_body(Some("SGVsbG8sIFdvcmxkIQ")),
            Ok(Some("Hello, World!".to_string()))
        );
        assert_eq!(
            decode_body(Some("SGVsbG8sIFdvcmxkIQ==")),
            Ok(Some("Hello, World!".to_string()))
        );
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        // bytes 0xfb 0xff encode to "-_8" in the URL-safe alphabet
        let err = decode_body(Some("-_8")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));

        // "~~~" is "fn5+" in the standard alphabet
        assert_eq!(decode_body(Some("fn5-")), Ok(Some("~~~".to_string())));
    }

    #[test]
    fn test_absent_body() {
        assert_eq!(decode_body(None), Ok(None));
        assert_eq!(decode_body(Some("")), Ok(None));
    }

    #[test]
    fn test_invalid_alphabet() {
        let err = decode_body(Some("SGVs+G8/")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidBase64(_)));
    }

    #[test]
    fn test_invalid_padding() {
        assert_eq!(decode_body(Some("QQ==")), Ok(Some("A".to_string())));
        assert_eq!(decode_body(Some("QQ")), Ok(Some("A".to_string())));

        for data in ["QQ=", "QQ===", "QUI==", "Q=Q="] {
            let err = decode_body(Some(data)).unwrap_err();
            assert!(
                matches!(err, DecodeError::InvalidBase64(_)),
                "accepted {:?}",
                data
            );
        }
    }

    #[test]
    fn test_invalid_utf8() {
        // 0xff 0xfe
        let err = decode_body(Some("__4")).unwrap_err();
        assert!(matches!(err, DecodeError::InvalidUtf8(_)));
    }
}
