use std::sync::Arc;

use catalog_db::memory::MemoryStore;
use catalog_db::models::accessory::Accessory;
use catalog_db::models::character::Character;
use catalog_db::store::{CatalogResource, PgStore, ResourceStore};
use catalog_db::DbPool;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub characters: Arc<dyn ResourceStore<Character>>,
    pub accessories: Arc<dyn ResourceStore<Accessory>>,
}

impl AppState {
    /// State backed by PostgreSQL.
    pub fn postgres(pool: DbPool, config: ServerConfig) -> Self {
        let store = Arc::new(PgStore::new(pool));
        Self {
            config: Arc::new(config),
            characters: store.clone(),
            accessories: store,
        }
    }

    /// State backed by fresh, empty in-memory tables.
    pub fn in_memory(config: ServerConfig) -> Self {
        Self {
            config: Arc::new(config),
            characters: Arc::new(MemoryStore::<Character>::new()),
            accessories: Arc::new(MemoryStore::<Accessory>::new()),
        }
    }
}

/// A resource that has a collection in [`AppState`].
///
/// Lets the generic handlers in [`crate::handlers::resource`] find their store.
pub trait Collection: CatalogResource {
    fn store(state: &AppState) -> &dyn ResourceStore<Self>;
}

impl Collection for Character {
    fn store(state: &AppState) -> &dyn ResourceStore<Self> {
        state.characters.as_ref()
    }
}

impl Collection for Accessory {
    fn store(state: &AppState) -> &dyn ResourceStore<Self> {
        state.accessories.as_ref()
    }
}
