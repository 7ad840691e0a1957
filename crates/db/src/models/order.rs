//! Vehicle orders placed through the order form.

use serde::Serialize;
use showroom_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `orders` table.
///
/// Option names are captured when the order is placed, so later catalog
/// edits don't change what the customer asked for.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Order {
    pub id: DbId,
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub car_id: Option<DbId>,
    pub trim_id: Option<DbId>,
    pub color_id: Option<DbId>,
    pub interior_id: Option<DbId>,
    pub car_name: String,
    pub trim_name: Option<String>,
    pub color_name: Option<String>,
    pub interior_name: Option<String>,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct CreateOrder {
    pub customer_name: String,
    pub email: String,
    pub phone: String,
    pub car_id: DbId,
    pub trim_id: Option<DbId>,
    pub color_id: Option<DbId>,
    pub interior_id: Option<DbId>,
    pub car_name: String,
    pub trim_name: Option<String>,
    pub color_name: Option<String>,
    pub interior_name: Option<String>,
    pub notes: Option<String>,
}
