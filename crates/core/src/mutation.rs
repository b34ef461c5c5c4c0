//! Optimistic-locking update pipeline.
//!
//! Read, check `If-Match`, merge, validate, then write through a conditional
//! store primitive keyed on the `updated_at` value that was read. A write that
//! affects no row is a conflict discovered late and is reported exactly like a
//! failed precondition.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::catalog::ResourceKind;
use crate::conditional::{evaluate_precondition, WriteDisposition};
use crate::error::CoreError;
use crate::types::{self, DbId, Timestamp};
use crate::validation::Validator;
use crate::version::{next_updated_at, VersionToken, Versioned};

/// A catalog row the pipeline can merge into and stamp.
pub trait Resource:
    Versioned + Serialize + DeserializeOwned + Clone + Send + Sync + 'static
{
    const KIND: ResourceKind;

    fn id(&self) -> DbId;

    fn set_updated_at(&mut self, at: Timestamp);
}

/// The two storage primitives the pipeline needs.
#[async_trait]
pub trait ConditionalStore<R: Resource>: Send + Sync {
    /// Point read of a live (not soft-deleted) row.
    async fn load(&self, id: DbId) -> Result<Option<R>, CoreError>;

    /// Replace the row with `next` only if it is still live and its
    /// `updated_at` equals `expected_updated_at`. `None` means no row matched.
    async fn compare_and_swap(
        &self,
        id: DbId,
        expected_updated_at: Timestamp,
        next: &R,
    ) -> Result<Option<R>, CoreError>;
}

/// Result of a successful update.
#[derive(Debug, Clone)]
pub struct Updated<R> {
    pub resource: R,
    pub version: VersionToken,
}

/// Apply `changes` to resource `id` if `if_match` still describes it.
///
/// Only fields named in `validator`'s rule table are merged; identity and
/// timestamps cannot be patched. Never retries: a [`CoreError::VersionConflict`]
/// goes back to the caller, who has to re-read and decide again.
pub async fn apply_update<R, S>(
    store: &S,
    validator: &Validator,
    id: DbId,
    if_match: Option<&str>,
    changes: &Map<String, Value>,
) -> Result<Updated<R>, CoreError>
where
    R: Resource,
    S: ConditionalStore<R> + ?Sized,
{
    let entity = R::KIND.entity_name();

    let current = store
        .load(id)
        .await?
        .ok_or(CoreError::NotFound { entity, id })?;
    let current_version = current.version()?;

    if evaluate_precondition(if_match, &current_version) == WriteDisposition::AbortConflict {
        return Err(CoreError::VersionConflict { entity, id });
    }

    let mut next: R = merge(&current, validator, changes)?;

    let expected = current.updated_at().ok_or_else(|| {
        CoreError::InvalidState(format!("{entity} {id} has no updated_at to compare against"))
    })?;
    next.set_updated_at(next_updated_at(expected, types::now()));

    let resource = store
        .compare_and_swap(id, expected, &next)
        .await?
        .ok_or(CoreError::VersionConflict { entity, id })?;
    let version = resource.version()?;

    Ok(Updated { resource, version })
}

/// Overlay the recognised keys of `changes` onto `current` and validate the
/// result as a whole.
fn merge<R: Resource>(
    current: &R,
    validator: &Validator,
    changes: &Map<String, Value>,
) -> Result<R, CoreError> {
    let mut merged = match serde_json::to_value(current) {
        Ok(Value::Object(map)) => map,
        Ok(_) => {
            return Err(CoreError::Internal(format!(
                "{} does not serialize to an object",
                R::KIND.entity_name()
            )))
        }
        Err(e) => return Err(CoreError::Internal(e.to_string())),
    };

    for field in validator.fields() {
        if let Some(value) = changes.get(field) {
            merged.insert(field.to_string(), value.clone());
        }
    }

    validator.validate_map(&merged)?;

    serde_json::from_value(Value::Object(merged))
        .map_err(|e| CoreError::invalid("body", e.to_string()))
}
