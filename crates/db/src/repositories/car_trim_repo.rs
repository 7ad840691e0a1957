//! Repository for the `car_trims` table.

use sqlx::types::Json;
use sqlx::PgPool;
use showroom_core::types::DbId;

use crate::models::car_trim::{CarTrim, CreateCarTrim, UpdateCarTrim};

const COLUMNS: &str =
    "id, car_id, name, price, specification, sort_order, created_at, updated_at";

/// Provides CRUD operations for car trims.
pub struct CarTrimRepo;

impl CarTrimRepo {
    /// Append a single trim to a car.
    pub async fn create(
        pool: &PgPool,
        car_id: DbId,
        input: &CreateCarTrim,
    ) -> Result<CarTrim, sqlx::Error> {
        let query = format!(
            "INSERT INTO car_trims (car_id, name, price, specification, sort_order)
             VALUES ($1, $2, $3, $4,
                     (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM car_trims WHERE car_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarTrim>(&query)
            .bind(car_id)
            .bind(&input.name)
            .bind(&input.price)
            .bind(&input.specification)
            .fetch_one(pool)
            .await
    }

    /// Insert all trims of a car in one statement, in the given order.
    pub async fn create_batch(
        pool: &PgPool,
        car_id: DbId,
        trims: &[CreateCarTrim],
    ) -> Result<Vec<CarTrim>, sqlx::Error> {
        if trims.is_empty() {
            return Ok(vec![]);
        }

        let names: Vec<String> = trims.iter().map(|t| t.name.clone()).collect();
        let prices: Vec<String> = trims.iter().map(|t| t.price.clone()).collect();
        let specs: Vec<Json<serde_json::Value>> =
            trims.iter().map(|t| Json(t.specification.clone())).collect();
        let orders: Vec<i32> = (0..trims.len() as i32).collect();

        let query = format!(
            "INSERT INTO car_trims (car_id, name, price, specification, sort_order)
             SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[], $4::jsonb[], $5::int4[])
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarTrim>(&query)
            .bind(car_id)
            .bind(&names)
            .bind(&prices)
            .bind(&specs)
            .bind(&orders)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CarTrim>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM car_trims WHERE id = $1");
        sqlx::query_as::<_, CarTrim>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_car(pool: &PgPool, car_id: DbId) -> Result<Vec<CarTrim>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM car_trims WHERE car_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, CarTrim>(&query)
            .bind(car_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_cars(pool: &PgPool, car_ids: &[DbId]) -> Result<Vec<CarTrim>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM car_trims WHERE car_id = ANY($1) ORDER BY car_id, sort_order, id"
        );
        sqlx::query_as::<_, CarTrim>(&query)
            .bind(car_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a trim of the given car. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        car_id: DbId,
        id: DbId,
        input: &UpdateCarTrim,
    ) -> Result<Option<CarTrim>, sqlx::Error> {
        let query = format!(
            "UPDATE car_trims SET
                name = COALESCE($3, name),
                price = COALESCE($4, price),
                specification = COALESCE($5, specification)
             WHERE id = $1 AND car_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarTrim>(&query)
            .bind(id)
            .bind(car_id)
            .bind(&input.name)
            .bind(&input.price)
            .bind(&input.specification)
            .fetch_optional(pool)
            .await
    }

    /// Delete one trim of the given car. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, car_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_trims WHERE id = $1 AND car_id = $2")
            .bind(id)
            .bind(car_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every trim of a car. Returns the count of deleted rows.
    pub async fn delete_by_car(pool: &PgPool, car_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_trims WHERE car_id = $1")
            .bind(car_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
