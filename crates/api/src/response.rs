//! Shared response envelope types for API handlers.
//!
//! Single resources go out as `{ "message", "data", "metadata" }`; lists as
//! `{ "data", "page", "page_size", "total", "total_pages" }`.

use catalog_core::listing::{PageMeta, Paginated};
use catalog_core::version::VersionToken;
use serde::Serialize;

/// Version information echoed in the body alongside the `ETag` and
/// `Last-Modified` headers.
#[derive(Debug, Serialize)]
pub struct VersionMetadata {
    pub version: String,
    pub last_modified: String,
}

impl VersionMetadata {
    pub fn new(version: &VersionToken, last_modified: &str) -> Self {
        Self {
            version: version.to_string(),
            last_modified: last_modified.to_string(),
        }
    }
}

/// Standard single-resource response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse::new("Character updated", character, metadata)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub message: String,
    pub data: T,
    pub metadata: VersionMetadata,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(message: impl Into<String>, data: T, metadata: VersionMetadata) -> Self {
        Self {
            message: message.into(),
            data,
            metadata,
        }
    }
}

/// One page of a collection with its pagination figures inlined.
#[derive(Debug, Serialize)]
pub struct ListResponse<T: Serialize> {
    pub data: Vec<T>,
    #[serde(flatten)]
    pub meta: PageMeta,
}

impl<T: Serialize> From<Paginated<T>> for ListResponse<T> {
    fn from(page: Paginated<T>) -> Self {
        Self {
            data: page.items,
            meta: page.meta,
        }
    }
}
