//! Public catalog routes.

use axum::routing::get;
use axum::Router;

use crate::handlers::catalog;
use crate::state::AppState;

/// ```text
/// GET /cars        -> list_cars
/// GET /cars/{id}   -> get_car
/// GET /spec-keys   -> list_spec_keys
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(catalog::list_cars))
        .route("/cars/{id}", get(catalog::get_car))
        .route("/spec-keys", get(catalog::list_spec_keys))
}
