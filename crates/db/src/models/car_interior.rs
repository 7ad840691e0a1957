//! Car interior model and DTOs.

use serde::{Deserialize, Serialize};
use showroom_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `car_interiors` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CarInterior {
    pub id: DbId,
    pub car_id: DbId,
    pub name: String,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCarInterior {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCarInterior {
    pub name: Option<String>,
}
