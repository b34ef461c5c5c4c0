//! Conditional-request headers: reading `If-None-Match` / `If-Match` and
//! writing `ETag`, `Last-Modified` and `Cache-Control`.

use axum::http::header::{CACHE_CONTROL, ETAG, IF_MATCH, IF_NONE_MATCH, LAST_MODIFIED};
use axum::http::{HeaderMap, HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use catalog_core::version::VersionToken;

use crate::error::AppError;

/// A present header that is not visible ASCII reads as `""`, which matches no
/// entity tag.
fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).map(|v| v.to_str().unwrap_or_default())
}

pub fn if_none_match(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, IF_NONE_MATCH)
}

pub fn if_match(headers: &HeaderMap) -> Option<&str> {
    header_str(headers, IF_MATCH)
}

fn value(text: &str) -> Result<HeaderValue, AppError> {
    HeaderValue::from_str(text)
        .map_err(|e| AppError::InternalError(format!("invalid header value {text:?}: {e}")))
}

/// Validator headers for a representation: `ETag`, `Last-Modified` and,
/// when given, `Cache-Control`.
pub fn version_headers(
    version: &VersionToken,
    last_modified: &str,
    cache_control: Option<&str>,
) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(ETAG, value(version.as_str())?);
    headers.insert(LAST_MODIFIED, value(last_modified)?);
    if let Some(cache_control) = cache_control {
        headers.insert(CACHE_CONTROL, value(cache_control)?);
    }
    Ok(headers)
}

pub fn cache_control(directive: &str) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(CACHE_CONTROL, value(directive)?);
    Ok(headers)
}

/// 304 with an empty body, the current `ETag` and `cache_control`.
pub fn not_modified(version: &VersionToken, cache_control: &str) -> Result<Response, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(ETAG, value(version.as_str())?);
    headers.insert(CACHE_CONTROL, value(cache_control)?);
    Ok((StatusCode::NOT_MODIFIED, headers).into_response())
}
