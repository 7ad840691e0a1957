pub mod admin;
pub mod auth;
pub mod catalog;
pub mod health;
pub mod leads;
pub mod wizard;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/login                                      login (public)
/// /auth/refresh                                    refresh (public)
/// /auth/session                                    current user (requires auth)
/// /auth/logout                                     logout (requires auth)
///
/// /cars                                            catalog cards (public)
/// /cars/{id}                                       spec sheet (public)
/// /spec-keys                                       specification catalogue (public)
///
/// /contact                                         contact wizard submission (POST)
/// /orders                                          order form submission (POST)
/// /support                                         support ticket (POST)
///
/// /admin/cars                                      list (admin only)
/// /admin/cars/{id}                                 get, delete
/// /admin/cars/{car_id}/colors                      create
/// /admin/cars/{car_id}/colors/{id}                 update, delete
/// /admin/cars/{car_id}/trims                       create
/// /admin/cars/{car_id}/trims/{id}                  update, delete
/// /admin/cars/{car_id}/interiors                   create
/// /admin/cars/{car_id}/interiors/{id}              update, delete
///
/// /admin/contact-submissions                       list
/// /admin/orders                                    list
/// /admin/support-tickets                           list (?status=)
/// /admin/support-tickets/{id}/status               update status (PUT)
///
/// /admin/wizard-sessions                           open (POST)
/// /admin/wizard-sessions/draft                     saved create draft (GET, DELETE)
/// /admin/wizard-sessions/{id}                      get, close (DELETE)
/// /admin/wizard-sessions/{id}/form                 seeded form for the current stage
/// /admin/wizard-sessions/{id}/basic-info           complete stage 1 (PUT)
/// /admin/wizard-sessions/{id}/customization        complete stage 2 (PUT)
/// /admin/wizard-sessions/{id}/images               complete stage 3 (POST, multipart)
/// /admin/wizard-sessions/{id}/preview              rendered preview (GET), submit or discard (POST)
/// /admin/wizard-sessions/{id}/staged/{name}        staged upload shown by the preview (GET)
/// /admin/wizard-sessions/{id}/submit               publish the draft (POST)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .merge(catalog::router())
        .merge(leads::router())
        .nest("/admin", admin::router())
        .nest("/admin/wizard-sessions", wizard::router())
}
