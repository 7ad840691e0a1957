//! Back-office car management: full car records and single option rows.
//!
//! Cars themselves are authored through the configuration wizard; these
//! handlers cover listing, deletion and one-off edits of trims, colors and
//! interiors.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use showroom_core::draft::Specification;
use showroom_core::error::CoreError;
use showroom_core::steps::{validate_color_code, validate_specification};
use showroom_core::storage::discard_staged;
use showroom_core::types::DbId;
use showroom_db::models::car::CarDetail;
use showroom_db::models::car_color::{CarColor, CreateCarColor, UpdateCarColor};
use showroom_db::models::car_interior::{CarInterior, CreateCarInterior, UpdateCarInterior};
use showroom_db::models::car_trim::{CarTrim, CreateCarTrim, UpdateCarTrim};
use showroom_db::repositories::{
    CarColorRepo, CarInteriorRepo, CarRepo, CarTrimRepo, WizardSessionRepo,
};
use showroom_db::DbPool;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn car_not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity: "Car", id })
}

async fn ensure_car_exists(pool: &DbPool, car_id: DbId) -> AppResult<()> {
    CarRepo::find_by_id(pool, car_id)
        .await?
        .ok_or_else(|| car_not_found(car_id))?;
    Ok(())
}

fn require_text(field: &str, value: &str) -> AppResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::Core(CoreError::Validation(format!(
            "{field} must not be empty"
        ))));
    }
    Ok(value.to_string())
}

/// Decode and check a specification object, returning its normalized JSON.
fn checked_specification(value: &serde_json::Value, owner: &str) -> AppResult<serde_json::Value> {
    let spec = Specification::from_json(value).map_err(|e| {
        AppError::Core(CoreError::Validation(format!(
            "{owner} has a malformed specification: {e}"
        )))
    })?;
    validate_specification(&spec, owner)?;
    Ok(spec.to_json())
}

// ---------------------------------------------------------------------------
// Cars
// ---------------------------------------------------------------------------

/// GET /api/v1/admin/cars
pub async fn list_cars(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<CarDetail>>>> {
    let (limit, offset) = params.resolve();
    let cars = CarRepo::list_details(&state.pool, limit, offset).await?;
    Ok(Json(DataResponse { data: cars }))
}

/// GET /api/v1/admin/cars/{id}
pub async fn get_car(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<CarDetail>>> {
    let car = CarRepo::find_detail(&state.pool, id)
        .await?
        .ok_or_else(|| car_not_found(id))?;
    Ok(Json(DataResponse { data: car }))
}

/// DELETE /api/v1/admin/cars/{id}
///
/// Removes the car, its option rows and any wizard sessions editing it.
/// Files staged by those sessions are discarded afterwards.
pub async fn delete_car(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let staged: Vec<String> = WizardSessionRepo::list_by_car(&state.pool, id)
        .await?
        .iter()
        .filter_map(|row| row.to_session())
        .flat_map(|session| {
            session
                .draft
                .staged_paths()
                .into_iter()
                .map(str::to_string)
                .collect::<Vec<_>>()
        })
        .collect();

    if !CarRepo::delete_with_children(&state.pool, id).await? {
        return Err(car_not_found(id));
    }
    discard_staged(staged.iter().map(String::as_str)).await;

    tracing::info!(car_id = id, user_id = admin.user_id, "Car deleted");
    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Colors
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/cars/{car_id}/colors
pub async fn create_color(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(car_id): Path<DbId>,
    Json(input): Json<CreateCarColor>,
) -> AppResult<(StatusCode, Json<DataResponse<CarColor>>)> {
    let name = require_text("Color name", &input.name)?;
    let code = require_text("Color code", &input.code)?;
    validate_color_code(&name, &code)?;
    ensure_car_exists(&state.pool, car_id).await?;

    let color = CarColorRepo::create(
        &state.pool,
        car_id,
        &CreateCarColor {
            name,
            code,
            image_url: input.image_url,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: color })))
}

/// PUT /api/v1/admin/cars/{car_id}/colors/{id}
pub async fn update_color(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((car_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCarColor>,
) -> AppResult<Json<DataResponse<CarColor>>> {
    let name = input
        .name
        .as_deref()
        .map(|n| require_text("Color name", n))
        .transpose()?;
    let code = input
        .code
        .as_deref()
        .map(|c| require_text("Color code", c))
        .transpose()?;
    if let Some(code) = &code {
        validate_color_code(name.as_deref().unwrap_or("color"), code)?;
    }

    let color = CarColorRepo::update(
        &state.pool,
        car_id,
        id,
        &UpdateCarColor {
            name,
            code,
            image_url: input.image_url,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::NotFound {
        entity: "CarColor",
        id,
    }))?;
    Ok(Json(DataResponse { data: color }))
}

/// DELETE /api/v1/admin/cars/{car_id}/colors/{id}
pub async fn delete_color(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((car_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if CarColorRepo::delete(&state.pool, car_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "CarColor",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Trims
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/cars/{car_id}/trims
pub async fn create_trim(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(car_id): Path<DbId>,
    Json(input): Json<CreateCarTrim>,
) -> AppResult<(StatusCode, Json<DataResponse<CarTrim>>)> {
    let name = require_text("Trim name", &input.name)?;
    let price = require_text("Trim price", &input.price)?;
    let specification = checked_specification(&input.specification, &format!("Trim '{name}'"))?;
    ensure_car_exists(&state.pool, car_id).await?;

    let trim = CarTrimRepo::create(
        &state.pool,
        car_id,
        &CreateCarTrim {
            name,
            price,
            specification,
        },
    )
    .await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: trim })))
}

/// PUT /api/v1/admin/cars/{car_id}/trims/{id}
pub async fn update_trim(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((car_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCarTrim>,
) -> AppResult<Json<DataResponse<CarTrim>>> {
    let update = UpdateCarTrim {
        name: input
            .name
            .as_deref()
            .map(|n| require_text("Trim name", n))
            .transpose()?,
        price: input
            .price
            .as_deref()
            .map(|p| require_text("Trim price", p))
            .transpose()?,
        specification: input
            .specification
            .as_ref()
            .map(|s| checked_specification(s, "Trim"))
            .transpose()?,
    };

    let trim = CarTrimRepo::update(&state.pool, car_id, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CarTrim",
            id,
        }))?;
    Ok(Json(DataResponse { data: trim }))
}

/// DELETE /api/v1/admin/cars/{car_id}/trims/{id}
pub async fn delete_trim(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((car_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if CarTrimRepo::delete(&state.pool, car_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "CarTrim",
            id,
        }))
    }
}

// ---------------------------------------------------------------------------
// Interiors
// ---------------------------------------------------------------------------

/// POST /api/v1/admin/cars/{car_id}/interiors
pub async fn create_interior(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path(car_id): Path<DbId>,
    Json(input): Json<CreateCarInterior>,
) -> AppResult<(StatusCode, Json<DataResponse<CarInterior>>)> {
    let name = require_text("Interior name", &input.name)?;
    ensure_car_exists(&state.pool, car_id).await?;

    let interior = CarInteriorRepo::create(&state.pool, car_id, &CreateCarInterior { name }).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: interior })))
}

/// PUT /api/v1/admin/cars/{car_id}/interiors/{id}
pub async fn update_interior(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((car_id, id)): Path<(DbId, DbId)>,
    Json(input): Json<UpdateCarInterior>,
) -> AppResult<Json<DataResponse<CarInterior>>> {
    let update = UpdateCarInterior {
        name: input
            .name
            .as_deref()
            .map(|n| require_text("Interior name", n))
            .transpose()?,
    };
    let interior = CarInteriorRepo::update(&state.pool, car_id, id, &update)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "CarInterior",
            id,
        }))?;
    Ok(Json(DataResponse { data: interior }))
}

/// DELETE /api/v1/admin/cars/{car_id}/interiors/{id}
pub async fn delete_interior(
    RequireAdmin(_admin): RequireAdmin,
    State(state): State<AppState>,
    Path((car_id, id)): Path<(DbId, DbId)>,
) -> AppResult<StatusCode> {
    if CarInteriorRepo::delete(&state.pool, car_id, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "CarInterior",
            id,
        }))
    }
}
