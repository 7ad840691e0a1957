//! Public lead capture: contact wizard, order form and support tickets.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use showroom_core::error::CoreError;
use showroom_core::leads::{ensure_option_belongs, ContactForm, OrderForm, SupportForm};
use showroom_db::models::contact_submission::{ContactSubmission, CreateContactSubmission};
use showroom_db::models::order::{CreateOrder, Order};
use showroom_db::models::support_ticket::{CreateSupportTicket, SupportTicket};
use showroom_db::repositories::{
    CarColorRepo, CarInteriorRepo, CarRepo, CarTrimRepo, ContactSubmissionRepo, OrderRepo,
    SupportTicketRepo,
};

use crate::error::{AppError, AppResult};
use crate::response::DataResponse;
use crate::state::AppState;

fn unknown_car() -> AppError {
    AppError::Core(CoreError::Validation(
        "The selected car does not exist".into(),
    ))
}

fn trimmed(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// POST /api/v1/contact
pub async fn create_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> AppResult<(StatusCode, Json<DataResponse<ContactSubmission>>)> {
    form.check()?;
    if let Some(car_id) = form.car_id {
        CarRepo::find_by_id(&state.pool, car_id)
            .await?
            .ok_or_else(unknown_car)?;
    }

    let submission =
        ContactSubmissionRepo::create(&state.pool, &CreateContactSubmission::from(&form)).await?;
    tracing::info!(submission_id = submission.id, "Contact submission received");
    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: submission }),
    ))
}

/// POST /api/v1/orders
///
/// Chosen trim, color and interior must belong to the ordered car. Their
/// names are captured on the order row.
pub async fn create_order(
    State(state): State<AppState>,
    Json(form): Json<OrderForm>,
) -> AppResult<(StatusCode, Json<DataResponse<Order>>)> {
    form.check()?;
    let car = CarRepo::find_by_id(&state.pool, form.car_id)
        .await?
        .ok_or_else(unknown_car)?;

    let trim_name = match form.trim_id {
        Some(id) => {
            let trim = CarTrimRepo::find_by_id(&state.pool, id).await?;
            ensure_option_belongs("trim", trim.as_ref().map(|t| t.car_id), car.id)?;
            trim.map(|t| t.name)
        }
        None => None,
    };
    let color_name = match form.color_id {
        Some(id) => {
            let color = CarColorRepo::find_by_id(&state.pool, id).await?;
            ensure_option_belongs("color", color.as_ref().map(|c| c.car_id), car.id)?;
            color.map(|c| c.name)
        }
        None => None,
    };
    let interior_name = match form.interior_id {
        Some(id) => {
            let interior = CarInteriorRepo::find_by_id(&state.pool, id).await?;
            ensure_option_belongs("interior", interior.as_ref().map(|i| i.car_id), car.id)?;
            interior.map(|i| i.name)
        }
        None => None,
    };

    let input = CreateOrder {
        customer_name: form.customer_name.trim().to_string(),
        email: form.email.trim().to_string(),
        phone: form.phone.trim().to_string(),
        car_id: car.id,
        trim_id: form.trim_id,
        color_id: form.color_id,
        interior_id: form.interior_id,
        car_name: car.name,
        trim_name,
        color_name,
        interior_name,
        notes: trimmed(&form.notes),
    };
    let order = OrderRepo::create(&state.pool, &input).await?;
    tracing::info!(order_id = order.id, car_id = input.car_id, "Order placed");
    Ok((StatusCode::CREATED, Json(DataResponse { data: order })))
}

/// POST /api/v1/support
pub async fn create_support_ticket(
    State(state): State<AppState>,
    Json(form): Json<SupportForm>,
) -> AppResult<(StatusCode, Json<DataResponse<SupportTicket>>)> {
    form.check()?;
    let ticket = SupportTicketRepo::create(&state.pool, &CreateSupportTicket::from(&form)).await?;
    tracing::info!(ticket_id = ticket.id, priority = %ticket.priority, "Support ticket opened");
    Ok((StatusCode::CREATED, Json(DataResponse { data: ticket })))
}
