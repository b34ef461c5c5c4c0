//! Process-local [`ResourceStore`] used for development runs without
//! PostgreSQL and by the test suites.
//!
//! Semantics follow the SQL repositories: live-row filtering, a
//! case-insensitive unique name among live rows, `id ASC` default ordering,
//! and compare-and-swap on `updated_at` under a single write lock.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use async_trait::async_trait;
use catalog_core::error::CoreError;
use catalog_core::listing::{
    Filter, FilterValue, PageMeta, Paginated, Predicate, QuerySpec, SortDirection,
};
use catalog_core::mutation::ConditionalStore;
use catalog_core::types::{self, DbId, Timestamp};
use tokio::sync::RwLock;

use crate::store::{CatalogResource, FieldRef, ResourceStore};

struct Table<R> {
    rows: BTreeMap<DbId, R>,
    next_id: DbId,
}

/// In-memory table for one collection.
pub struct MemoryStore<R> {
    table: RwLock<Table<R>>,
    _kind: PhantomData<fn() -> R>,
}

impl<R: CatalogResource> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                next_id: 1,
            }),
            _kind: PhantomData,
        }
    }
}

impl<R: CatalogResource> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

fn is_live<R: CatalogResource>(row: &R) -> bool {
    row.deleted_at().is_none()
}

/// Mirror of the partial unique index on `lower(name)`.
fn ensure_unique_name<R: CatalogResource>(
    rows: &BTreeMap<DbId, R>,
    name: &str,
    except: Option<DbId>,
) -> Result<(), CoreError> {
    let taken = rows.values().any(|row| {
        is_live(row) && Some(row.id()) != except && row.name().to_lowercase() == name.to_lowercase()
    });
    if taken {
        Err(CoreError::Conflict(format!(
            "{} named '{name}' already exists",
            R::KIND.entity_name()
        )))
    } else {
        Ok(())
    }
}

fn matches<R: CatalogResource>(row: &R, filter: &Filter) -> bool {
    match (filter.predicate, &filter.value, row.field(filter.field)) {
        (Predicate::Contains, FilterValue::Text(needle), FieldRef::Text(hay)) => {
            hay.to_lowercase().contains(&needle.to_lowercase())
        }
        (Predicate::Exact | Predicate::Member, FilterValue::Text(want), FieldRef::Text(have)) => {
            have == want
        }
        (_, FilterValue::Int(want), FieldRef::Int(have)) => have == *want,
        _ => false,
    }
}

#[async_trait]
impl<R: CatalogResource> ConditionalStore<R> for MemoryStore<R> {
    async fn load(&self, id: DbId) -> Result<Option<R>, CoreError> {
        let table = self.table.read().await;
        Ok(table.rows.get(&id).filter(|row| is_live(*row)).cloned())
    }

    async fn compare_and_swap(
        &self,
        id: DbId,
        expected_updated_at: Timestamp,
        next: &R,
    ) -> Result<Option<R>, CoreError> {
        let mut table = self.table.write().await;

        let unchanged = table
            .rows
            .get(&id)
            .is_some_and(|row| is_live(row) && row.updated_at() == Some(expected_updated_at));
        if !unchanged {
            return Ok(None);
        }

        ensure_unique_name(&table.rows, next.name(), Some(id))?;
        table.rows.insert(id, next.clone());
        Ok(Some(next.clone()))
    }
}

#[async_trait]
impl<R: CatalogResource> ResourceStore<R> for MemoryStore<R> {
    async fn insert(&self, input: &R::Create) -> Result<R, CoreError> {
        let mut table = self.table.write().await;
        let id = table.next_id;
        let row = R::from_create(id, input, types::now());

        ensure_unique_name(&table.rows, row.name(), None)?;
        table.next_id += 1;
        table.rows.insert(id, row.clone());
        Ok(row)
    }

    async fn list(&self, spec: &QuerySpec) -> Result<Paginated<R>, CoreError> {
        let table = self.table.read().await;

        let mut matching: Vec<&R> = table
            .rows
            .values()
            .filter(|row| is_live(*row))
            .filter(|row| spec.filters().iter().all(|f| matches(*row, f)))
            .collect();

        if let Some(sort) = spec.sort() {
            // Rows come out of the BTreeMap in id order and the sort is stable,
            // so ties stay id ASC like the SQL tie-breaker.
            matching.sort_by(|a, b| {
                let ord = a.field(sort.field).compare(&b.field(sort.field));
                match sort.direction {
                    SortDirection::Asc => ord,
                    SortDirection::Desc => ord.reverse(),
                }
            });
        }

        let total = matching.len() as i64;
        let offset = usize::try_from(spec.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(spec.limit()).unwrap_or(0);
        let items = matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();

        Ok(Paginated {
            items,
            meta: PageMeta::for_spec(spec, total),
        })
    }

    async fn soft_delete(&self, id: DbId) -> Result<bool, CoreError> {
        let mut table = self.table.write().await;
        match table.rows.get_mut(&id) {
            Some(row) if is_live(row) => {
                row.set_deleted_at(types::now());
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn ping(&self) -> Result<(), CoreError> {
        Ok(())
    }
}
