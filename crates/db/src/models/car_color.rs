//! Car color model and DTOs.

use serde::{Deserialize, Serialize};
use showroom_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `car_colors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CarColor {
    pub id: DbId,
    pub car_id: DbId,
    pub name: String,
    pub code: String,
    pub image_url: Option<String>,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a color under a car.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCarColor {
    pub name: String,
    pub code: String,
    pub image_url: Option<String>,
}

/// DTO for updating a color. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCarColor {
    pub name: Option<String>,
    pub code: Option<String>,
    pub image_url: Option<String>,
}
