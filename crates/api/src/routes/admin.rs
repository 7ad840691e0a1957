//! Back-office routes mounted at `/admin`. Every handler requires the admin role.

use axum::routing::{get, post, put};
use axum::Router;

use crate::handlers::{admin_cars, admin_leads};
use crate::state::AppState;

/// ```text
/// GET    /cars                                  -> list_cars
/// GET    /cars/{id}                             -> get_car
/// DELETE /cars/{id}                             -> delete_car
/// POST   /cars/{car_id}/colors                  -> create_color
/// PUT    /cars/{car_id}/colors/{id}             -> update_color
/// DELETE /cars/{car_id}/colors/{id}             -> delete_color
/// POST   /cars/{car_id}/trims                   -> create_trim
/// PUT    /cars/{car_id}/trims/{id}              -> update_trim
/// DELETE /cars/{car_id}/trims/{id}              -> delete_trim
/// POST   /cars/{car_id}/interiors               -> create_interior
/// PUT    /cars/{car_id}/interiors/{id}          -> update_interior
/// DELETE /cars/{car_id}/interiors/{id}          -> delete_interior
///
/// GET    /contact-submissions                   -> list_contact_submissions
/// GET    /orders                                -> list_orders
/// GET    /support-tickets                       -> list_support_tickets
/// PUT    /support-tickets/{id}/status           -> update_ticket_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/cars", get(admin_cars::list_cars))
        .route(
            "/cars/{id}",
            get(admin_cars::get_car).delete(admin_cars::delete_car),
        )
        .route("/cars/{car_id}/colors", post(admin_cars::create_color))
        .route(
            "/cars/{car_id}/colors/{id}",
            put(admin_cars::update_color).delete(admin_cars::delete_color),
        )
        .route("/cars/{car_id}/trims", post(admin_cars::create_trim))
        .route(
            "/cars/{car_id}/trims/{id}",
            put(admin_cars::update_trim).delete(admin_cars::delete_trim),
        )
        .route("/cars/{car_id}/interiors", post(admin_cars::create_interior))
        .route(
            "/cars/{car_id}/interiors/{id}",
            put(admin_cars::update_interior).delete(admin_cars::delete_interior),
        )
        .route(
            "/contact-submissions",
            get(admin_leads::list_contact_submissions),
        )
        .route("/orders", get(admin_leads::list_orders))
        .route("/support-tickets", get(admin_leads::list_support_tickets))
        .route(
            "/support-tickets/{id}/status",
            put(admin_leads::update_ticket_status),
        )
}
