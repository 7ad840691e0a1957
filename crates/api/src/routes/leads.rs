//! Public lead-capture routes.

use axum::routing::post;
use axum::Router;

use crate::handlers::leads;
use crate::state::AppState;

/// ```text
/// POST /contact  -> create_contact
/// POST /orders   -> create_order
/// POST /support  -> create_support_ticket
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/contact", post(leads::create_contact))
        .route("/orders", post(leads::create_order))
        .route("/support", post(leads::create_support_ticket))
}
