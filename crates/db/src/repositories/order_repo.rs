//! Repository for the `orders` table.

use sqlx::PgPool;

use crate::models::order::{CreateOrder, Order};

const COLUMNS: &str = "id, customer_name, email, phone, car_id, trim_id, color_id, interior_id, \
                        car_name, trim_name, color_name, interior_name, notes, \
                        created_at, updated_at";

pub struct OrderRepo;

impl OrderRepo {
    pub async fn create(pool: &PgPool, input: &CreateOrder) -> Result<Order, sqlx::Error> {
        let query = format!(
            "INSERT INTO orders
                (customer_name, email, phone, car_id, trim_id, color_id, interior_id,
                 car_name, trim_name, color_name, interior_name, notes)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(&input.customer_name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(input.car_id)
            .bind(input.trim_id)
            .bind(input.color_id)
            .bind(input.interior_id)
            .bind(&input.car_name)
            .bind(&input.trim_name)
            .bind(&input.color_name)
            .bind(&input.interior_name)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// List orders, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Order>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM orders ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Order>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
