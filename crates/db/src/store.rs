//! The storage seam between HTTP handlers and persistence.
//!
//! [`ResourceStore`] extends the core's [`ConditionalStore`] (point read and
//! compare-and-swap) with the remaining collection operations. [`PgStore`]
//! implements it over the repositories; [`crate::memory::MemoryStore`] keeps
//! rows in process.

use std::cmp::Ordering;

use async_trait::async_trait;
use catalog_core::error::CoreError;
use catalog_core::listing::{PageMeta, Paginated, QuerySpec};
use catalog_core::mutation::{ConditionalStore, Resource};
use catalog_core::types::{DbId, Timestamp};
use catalog_core::validation::FieldRule;
use serde::de::DeserializeOwned;

use crate::models::accessory::{Accessory, CreateAccessory};
use crate::models::character::{Character, CreateCharacter};
use crate::repositories::{AccessoryRepo, CharacterRepo};
use crate::DbPool;

/// A column value borrowed from a row, for in-process filtering and sorting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldRef<'a> {
    Null,
    Text(&'a str),
    Int(i64),
    Time(Timestamp),
}

impl FieldRef<'_> {
    /// Ascending order with NULLs last, matching PostgreSQL's default.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldRef::Null, FieldRef::Null) => Ordering::Equal,
            (FieldRef::Null, _) => Ordering::Greater,
            (_, FieldRef::Null) => Ordering::Less,
            (FieldRef::Text(a), FieldRef::Text(b)) => a.cmp(b),
            (FieldRef::Int(a), FieldRef::Int(b)) => a.cmp(b),
            (FieldRef::Time(a), FieldRef::Time(b)) => a.cmp(b),
            // Columns never mix types; keep the order total anyway.
            (a, b) => a.rank().cmp(&b.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            FieldRef::Null => 3,
            FieldRef::Text(_) => 0,
            FieldRef::Int(_) => 1,
            FieldRef::Time(_) => 2,
        }
    }
}

/// A resource exposed as a catalog collection.
pub trait CatalogResource: Resource {
    type Create: DeserializeOwned + Send + Sync + 'static;

    /// Rule table for create payloads and merged updates.
    const RULES: &'static [FieldRule];

    fn from_create(id: DbId, input: &Self::Create, at: Timestamp) -> Self;

    /// Unique (case-insensitive, among live rows) display name.
    fn name(&self) -> &str;

    fn deleted_at(&self) -> Option<Timestamp>;

    fn set_deleted_at(&mut self, at: Timestamp);

    /// Value of a sortable or filterable column.
    fn field(&self, column: &str) -> FieldRef<'_>;
}

/// Everything the HTTP layer needs from persistence for one collection.
#[async_trait]
pub trait ResourceStore<R: CatalogResource>: ConditionalStore<R> {
    async fn insert(&self, input: &R::Create) -> Result<R, CoreError>;

    /// One page of live rows matching `spec`, plus the total match count.
    async fn list(&self, spec: &QuerySpec) -> Result<Paginated<R>, CoreError>;

    /// Mark a live row deleted. `false` if it was absent or already deleted.
    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError>;

    /// Confirm the backing store is reachable.
    async fn ping(&self) -> Result<(), CoreError>;
}

/// Map a sqlx error onto the domain taxonomy.
///
/// - PostgreSQL unique violations (`23505`) on `uq_` constraints map to
///   [`CoreError::Conflict`].
/// - Everything else maps to [`CoreError::Internal`]; the detail is logged
///   here and by the HTTP layer, never sent to clients.
pub fn classify_sqlx_error(err: sqlx::Error) -> CoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return CoreError::Conflict(format!(
                    "Duplicate value violates unique constraint: {constraint}"
                ));
            }
        }
    }
    tracing::error!(error = %err, "Database error");
    CoreError::Internal(err.to_string())
}

/// PostgreSQL-backed store for every catalog collection.
#[derive(Clone)]
pub struct PgStore {
    pool: DbPool,
}

impl PgStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConditionalStore<Character> for PgStore {
    async fn load(&self, id: DbId) -> Result<Option<Character>, CoreError> {
        CharacterRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn compare_and_swap(
        &self,
        id: DbId,
        expected_updated_at: Timestamp,
        next: &Character,
    ) -> Result<Option<Character>, CoreError> {
        CharacterRepo::update_if_unmodified(&self.pool, id, expected_updated_at, next)
            .await
            .map_err(classify_sqlx_error)
    }
}

#[async_trait]
impl ResourceStore<Character> for PgStore {
    async fn insert(&self, input: &CreateCharacter) -> Result<Character, CoreError> {
        CharacterRepo::create(&self.pool, input, catalog_core::types::now())
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list(&self, spec: &QuerySpec) -> Result<Paginated<Character>, CoreError> {
        let items = CharacterRepo::list(&self.pool, spec)
            .await
            .map_err(classify_sqlx_error)?;
        let total = CharacterRepo::count(&self.pool, spec)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(Paginated {
            items,
            meta: PageMeta::for_spec(spec, total),
        })
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError> {
        CharacterRepo::soft_delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }
}

#[async_trait]
impl ConditionalStore<Accessory> for PgStore {
    async fn load(&self, id: DbId) -> Result<Option<Accessory>, CoreError> {
        AccessoryRepo::find_by_id(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn compare_and_swap(
        &self,
        id: DbId,
        expected_updated_at: Timestamp,
        next: &Accessory,
    ) -> Result<Option<Accessory>, CoreError> {
        AccessoryRepo::update_if_unmodified(&self.pool, id, expected_updated_at, next)
            .await
            .map_err(classify_sqlx_error)
    }
}

#[async_trait]
impl ResourceStore<Accessory> for PgStore {
    async fn insert(&self, input: &CreateAccessory) -> Result<Accessory, CoreError> {
        AccessoryRepo::create(&self.pool, input, catalog_core::types::now())
            .await
            .map_err(classify_sqlx_error)
    }

    async fn list(&self, spec: &QuerySpec) -> Result<Paginated<Accessory>, CoreError> {
        let items = AccessoryRepo::list(&self.pool, spec)
            .await
            .map_err(classify_sqlx_error)?;
        let total = AccessoryRepo::count(&self.pool, spec)
            .await
            .map_err(classify_sqlx_error)?;
        Ok(Paginated {
            items,
            meta: PageMeta::for_spec(spec, total),
        })
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError> {
        AccessoryRepo::soft_delete(&self.pool, id)
            .await
            .map_err(classify_sqlx_error)
    }

    async fn ping(&self) -> Result<(), CoreError> {
        crate::health_check(&self.pool)
            .await
            .map_err(classify_sqlx_error)
    }
}
