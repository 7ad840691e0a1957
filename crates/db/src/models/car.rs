//! Car entity model and DTOs.

use serde::{Deserialize, Serialize};
use showroom_core::draft::{CarDraft, ColorDraft, InteriorDraft, Specification, TrimDraft};
use showroom_core::types::{DbId, Timestamp};
use showroom_core::views::{CarView, ColorView, TrimView};
use sqlx::FromRow;

use super::car_color::CarColor;
use super::car_interior::CarInterior;
use super::car_trim::CarTrim;

/// A row from the `cars` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Car {
    pub id: DbId,
    pub name: String,
    pub base_price: String,
    pub specification: serde_json::Value,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Full set of writable car columns.
///
/// Used for both inserts and wizard updates, which replace every field
/// (including clearing `image_url`).
#[derive(Debug, Clone, Deserialize)]
pub struct SaveCar {
    pub name: String,
    pub base_price: String,
    pub specification: serde_json::Value,
    pub image_url: Option<String>,
}

impl SaveCar {
    pub fn from_draft(draft: &CarDraft, image_url: Option<String>) -> Self {
        Self {
            name: draft.name.clone(),
            base_price: draft.base_price.clone(),
            specification: draft.specification.to_json(),
            image_url,
        }
    }
}

/// Decode a JSONB specification column, tolerating legacy shapes.
pub(crate) fn decode_spec(value: &serde_json::Value, owner: &str) -> Specification {
    Specification::from_json(value).unwrap_or_else(|e| {
        tracing::warn!(owner, error = %e, "Stored specification is malformed; treating as empty");
        Specification::default()
    })
}

/// A car together with all of its option rows.
#[derive(Debug, Clone, Serialize)]
pub struct CarDetail {
    #[serde(flatten)]
    pub car: Car,
    pub trims: Vec<CarTrim>,
    pub colors: Vec<CarColor>,
    pub interiors: Vec<CarInterior>,
}

impl CarDetail {
    /// Seed a wizard draft that round-trips every persisted field.
    pub fn to_draft(&self) -> CarDraft {
        CarDraft {
            id: Some(self.car.id),
            name: self.car.name.clone(),
            base_price: self.car.base_price.clone(),
            specification: decode_spec(&self.car.specification, "car"),
            trims: self
                .trims
                .iter()
                .map(|t| TrimDraft {
                    name: t.name.clone(),
                    price: t.price.clone(),
                    specification: decode_spec(&t.specification, "trim"),
                })
                .collect(),
            colors: self
                .colors
                .iter()
                .map(|c| ColorDraft {
                    name: c.name.clone(),
                    code: c.code.clone(),
                    image_url: c.image_url.clone(),
                    pending_image: None,
                })
                .collect(),
            interiors: self
                .interiors
                .iter()
                .map(|i| InteriorDraft {
                    name: i.name.clone(),
                })
                .collect(),
            image_url: self.car.image_url.clone(),
            pending_image: None,
        }
    }

    pub fn to_view(&self) -> CarView {
        CarView {
            id: Some(self.car.id),
            name: self.car.name.clone(),
            base_price: self.car.base_price.clone(),
            image_url: self.car.image_url.clone(),
            specification: decode_spec(&self.car.specification, "car"),
            trims: self
                .trims
                .iter()
                .map(|t| TrimView {
                    name: t.name.clone(),
                    price: t.price.clone(),
                    specification: decode_spec(&t.specification, "trim"),
                })
                .collect(),
            colors: self
                .colors
                .iter()
                .map(|c| ColorView {
                    name: c.name.clone(),
                    code: c.code.clone(),
                    image_url: c.image_url.clone(),
                })
                .collect(),
            interiors: self.interiors.iter().map(|i| i.name.clone()).collect(),
        }
    }
}
