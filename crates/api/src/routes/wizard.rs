//! Car configuration wizard routes, mounted at `/admin/wizard-sessions`.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::wizard;
use crate::state::AppState;

/// ```text
/// POST   /                    -> open_session
/// GET    /draft               -> get_draft
/// DELETE /draft               -> discard_draft
/// GET    /{id}                -> get_session
/// DELETE /{id}                -> close_session
/// GET    /{id}/form           -> get_form
/// PUT    /{id}/basic-info     -> complete_basic_info
/// PUT    /{id}/customization  -> complete_customization
/// POST   /{id}/images         -> complete_images (multipart)
/// GET    /{id}/preview        -> get_preview
/// POST   /{id}/preview        -> finish_preview (submit or discard)
/// GET    /{id}/staged/{name}  -> get_staged_image
/// POST   /{id}/submit         -> submit_session
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(wizard::open_session))
        .route(
            "/draft",
            get(wizard::get_draft).delete(wizard::discard_draft),
        )
        .route(
            "/{id}",
            get(wizard::get_session).delete(wizard::close_session),
        )
        .route("/{id}/form", get(wizard::get_form))
        .route("/{id}/basic-info", put(wizard::complete_basic_info))
        .route("/{id}/customization", put(wizard::complete_customization))
        .route("/{id}/images", post(wizard::complete_images))
        .route(
            "/{id}/preview",
            get(wizard::get_preview).post(wizard::finish_preview),
        )
        .route("/{id}/staged/{name}", get(wizard::get_staged_image))
        .route("/{id}/submit", post(wizard::submit_session))
}
