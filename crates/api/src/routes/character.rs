//! Route definitions for the `/characters` resource.

use axum::routing::get;
use axum::Router;
use catalog_db::models::character::Character;

use crate::handlers::resource;
use crate::state::AppState;

/// Routes mounted at `/characters`.
///
/// ```text
/// GET    /        -> list      (?name=&job=&influence=&rarity=&order_by=&order_direction=&page=&page_size=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id (If-None-Match)
/// PUT    /{id}    -> update    (If-Match)
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(resource::list::<Character>).post(resource::create::<Character>),
        )
        .route(
            "/{id}",
            get(resource::get_by_id::<Character>)
                .put(resource::update::<Character>)
                .delete(resource::delete::<Character>),
        )
}
