//! Route definitions for the `/accessories` resource.

use axum::routing::get;
use axum::Router;
use catalog_db::models::accessory::Accessory;

use crate::handlers::resource;
use crate::state::AppState;

/// Routes mounted at `/accessories`.
///
/// ```text
/// GET    /        -> list      (?name=&owner=&effect=&order_by=&order_direction=&page=&page_size=)
/// POST   /        -> create
/// GET    /{id}    -> get_by_id (If-None-Match)
/// PUT    /{id}    -> update    (If-Match)
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(resource::list::<Accessory>).post(resource::create::<Accessory>),
        )
        .route(
            "/{id}",
            get(resource::get_by_id::<Accessory>)
                .put(resource::update::<Accessory>)
                .delete(resource::delete::<Accessory>),
        )
}
