use axum::http::header::HeaderMap;

use crate::error::RelayError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Compares the `X-API-Key` header with the configured secret. A relay without
/// a configured secret rejects every request.
pub fn check_api_key(expected: Option<&str>, headers: &HeaderMap) -> Result<(), RelayError> {
    let expected = expected.ok_or(RelayError::Unauthorized)?;
    let provided = headers.get(API_KEY_HEADER).ok_or(RelayError::Unauthorized)?;

    if provided.as_bytes() != expected.as_bytes() {
        return Err(RelayError::Unauthorized);
    }

    Ok(())
}

pub fn api_key_provided(headers: &HeaderMap) -> bool {
    headers.contains_key(API_KEY_HEADER)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    fn headers_with_key(key: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(API_KEY_HEADER, HeaderValue::from_str(key).unwrap());
        headers
    }

    #[test]
    fn accepts_matching_key() {
        assert!(check_api_key(Some("s3cret"), &headers_with_key("s3cret")).is_ok());
    }

    #[test]
    fn header_name_is_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert("X-API-Key", HeaderValue::from_static("s3cret"));
        assert!(check_api_key(Some("s3cret"), &headers).is_ok());
    }

    #[test]
    fn rejects_wrong_key() {
        let err = check_api_key(Some("s3cret"), &headers_with_key("guess")).unwrap_err();
        assert!(matches!(err, RelayError::Unauthorized));
    }

    #[test]
    fn comparison_is_exact() {
        assert!(check_api_key(Some("s3cret "), &headers_with_key("s3cret")).is_err());
        assert!(check_api_key(Some("s3cret"), &headers_with_key("S3CRET")).is_err());
    }

    #[test]
    fn rejects_missing_header() {
        assert!(check_api_key(Some("s3cret"), &HeaderMap::new()).is_err());
        assert!(!api_key_provided(&HeaderMap::new()));
    }

    #[test]
    fn rejects_everything_without_configured_key() {
        assert!(check_api_key(None, &headers_with_key("")).is_err());
        assert!(check_api_key(None, &headers_with_key("s3cret")).is_err());
    }
}
