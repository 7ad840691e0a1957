//! Car trim model and DTOs.

use serde::{Deserialize, Serialize};
use showroom_core::draft::TrimDraft;
use showroom_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `car_trims` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CarTrim {
    pub id: DbId,
    pub car_id: DbId,
    pub name: String,
    pub price: String,
    pub specification: serde_json::Value,
    pub sort_order: i32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a trim under a car.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCarTrim {
    pub name: String,
    pub price: String,
    #[serde(default = "empty_object")]
    pub specification: serde_json::Value,
}

fn empty_object() -> serde_json::Value {
    serde_json::json!({})
}

impl From<&TrimDraft> for CreateCarTrim {
    fn from(draft: &TrimDraft) -> Self {
        Self {
            name: draft.name.clone(),
            price: draft.price.clone(),
            specification: draft.specification.to_json(),
        }
    }
}

/// DTO for updating a trim. All fields are optional.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCarTrim {
    pub name: Option<String>,
    pub price: Option<String>,
    pub specification: Option<serde_json::Value>,
}
