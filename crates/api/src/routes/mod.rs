pub mod accessory;
pub mod character;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /characters                 list, create
/// /characters/{id}            get, update, delete
///
/// /accessories                list, create
/// /accessories/{id}           get, update, delete
/// ```
///
/// Writes require a Bearer token; reads are public.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/characters", character::router())
        .nest("/accessories", accessory::router())
}
