//! Back-office views of captured leads.

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use showroom_core::error::CoreError;
use showroom_core::leads::TicketStatus;
use showroom_core::search::{clamp_limit, clamp_offset};
use showroom_core::types::DbId;
use showroom_db::models::contact_submission::ContactSubmission;
use showroom_db::models::order::Order;
use showroom_db::models::support_ticket::SupportTicket;
use showroom_db::repositories::{ContactSubmissionRepo, OrderRepo, SupportTicketRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::{PaginationParams, TicketListParams, DEFAULT_LIMIT, MAX_LIMIT};
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `PUT /admin/support-tickets/{id}/status`.
#[derive(Debug, Deserialize)]
pub struct UpdateTicketStatusRequest {
    pub status: String,
}

/// GET /api/v1/admin/contact-submissions
pub async fn list_contact_submissions(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<ContactSubmission>>>> {
    let (limit, offset) = params.resolve();
    let rows = ContactSubmissionRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/admin/orders
pub async fn list_orders(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<Order>>>> {
    let (limit, offset) = params.resolve();
    let rows = OrderRepo::list(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: rows }))
}

/// GET /api/v1/admin/support-tickets?status=
pub async fn list_support_tickets(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<TicketListParams>,
) -> AppResult<Json<DataResponse<Vec<SupportTicket>>>> {
    let status = params
        .status
        .as_deref()
        .map(TicketStatus::from_str_db)
        .transpose()?;
    let rows = SupportTicketRepo::list(
        &state.pool,
        status.map(TicketStatus::as_str),
        clamp_limit(params.limit, DEFAULT_LIMIT, MAX_LIMIT),
        clamp_offset(params.offset),
    )
    .await?;
    Ok(Json(DataResponse { data: rows }))
}

/// PUT /api/v1/admin/support-tickets/{id}/status
pub async fn update_ticket_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTicketStatusRequest>,
) -> AppResult<Json<DataResponse<SupportTicket>>> {
    let status = TicketStatus::from_str_db(input.status.trim())?;
    let ticket = SupportTicketRepo::update_status(&state.pool, id, status.as_str())
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "SupportTicket",
            id,
        }))?;
    tracing::info!(ticket_id = id, status = status.as_str(), user_id = admin.user_id, "Ticket status updated");
    Ok(Json(DataResponse { data: ticket }))
}
