//! Public catalog: cards, spec sheets and the specification catalogue.

use axum::extract::{Path, Query, State};
use axum::Json;
use showroom_core::error::CoreError;
use showroom_core::spec_keys::{catalogue, SpecKeyInfo};
use showroom_core::types::DbId;
use showroom_core::views::{render_card, render_spec_sheet, CarCard, SpecSheet};
use showroom_db::repositories::CarRepo;

use crate::error::{AppError, AppResult};
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/cars
pub async fn list_cars(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<CarCard>>>> {
    let (limit, offset) = params.resolve();
    let cards = CarRepo::list_details(&state.pool, limit, offset)
        .await?
        .iter()
        .map(|detail| render_card(&detail.to_view()))
        .collect();
    Ok(Json(DataResponse { data: cards }))
}

/// GET /api/v1/cars/{id}
pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<SpecSheet>>> {
    let detail = CarRepo::find_detail(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound { entity: "Car", id }))?;
    Ok(Json(DataResponse {
        data: render_spec_sheet(&detail.to_view()),
    }))
}

/// GET /api/v1/spec-keys
pub async fn list_spec_keys() -> Json<DataResponse<Vec<SpecKeyInfo>>> {
    Json(DataResponse { data: catalogue() })
}
