//! Version tokens (entity tags) derived from a resource's mutation time.
//!
//! A token is the quoted decimal Unix-seconds value of `updated_at`, falling
//! back to `created_at` for rows that were never mutated. Tokens are
//! second-granular: two instants inside the same second map to the same tag.

use std::fmt;

use chrono::{SubsecRound, TimeDelta};

use crate::error::CoreError;
use crate::types::Timestamp;

/// RFC 1123 format used for `Last-Modified`.
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Opaque entity tag, including the surrounding double quotes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionToken(String);

impl VersionToken {
    /// Token for a known mutation instant.
    pub fn from_timestamp(ts: Timestamp) -> Self {
        Self(format!("\"{}\"", ts.timestamp()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pick the instant a resource's version is derived from.
///
/// Timestamps at or before the Unix epoch count as unset.
fn effective_timestamp(
    updated_at: Option<Timestamp>,
    created_at: Option<Timestamp>,
) -> Result<Timestamp, CoreError> {
    let is_set = |ts: &Timestamp| ts.timestamp() > 0;
    updated_at
        .filter(is_set)
        .or_else(|| created_at.filter(is_set))
        .ok_or_else(|| {
            CoreError::InvalidState("resource has neither updated_at nor created_at".into())
        })
}

/// Derive the version token for a resource.
pub fn version_token(
    updated_at: Option<Timestamp>,
    created_at: Option<Timestamp>,
) -> Result<VersionToken, CoreError> {
    effective_timestamp(updated_at, created_at).map(VersionToken::from_timestamp)
}

/// Render the resource's mutation time as an RFC 1123 HTTP date.
pub fn display_timestamp(
    updated_at: Option<Timestamp>,
    created_at: Option<Timestamp>,
) -> Result<String, CoreError> {
    effective_timestamp(updated_at, created_at)
        .map(|ts| ts.format(HTTP_DATE_FORMAT).to_string())
}

/// Mutation time to record for a write that replaces `previous`.
///
/// Never earlier than the second after `previous`, so every successful write
/// moves the token forward even when two writes land in the same wall-clock
/// second.
pub fn next_updated_at(previous: Timestamp, now: Timestamp) -> Timestamp {
    let floor = previous.trunc_subsecs(0) + TimeDelta::seconds(1);
    now.max(floor)
}

/// Anything that carries the timestamps a version token is derived from.
pub trait Versioned {
    fn created_at(&self) -> Option<Timestamp>;
    fn updated_at(&self) -> Option<Timestamp>;

    fn version(&self) -> Result<VersionToken, CoreError> {
        version_token(self.updated_at(), self.created_at())
    }

    fn last_modified(&self) -> Result<String, CoreError> {
        display_timestamp(self.updated_at(), self.created_at())
    }
}
