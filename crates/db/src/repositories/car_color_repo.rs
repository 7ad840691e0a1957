//! Repository for the `car_colors` table.

use sqlx::PgPool;
use showroom_core::types::DbId;

use crate::models::car_color::{CarColor, CreateCarColor, UpdateCarColor};

const COLUMNS: &str = "id, car_id, name, code, image_url, sort_order, created_at, updated_at";

/// Provides CRUD operations for car colors.
pub struct CarColorRepo;

impl CarColorRepo {
    /// Append a single color to a car.
    pub async fn create(
        pool: &PgPool,
        car_id: DbId,
        input: &CreateCarColor,
    ) -> Result<CarColor, sqlx::Error> {
        let query = format!(
            "INSERT INTO car_colors (car_id, name, code, image_url, sort_order)
             VALUES ($1, $2, $3, $4,
                     (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM car_colors WHERE car_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarColor>(&query)
            .bind(car_id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Insert all colors of a car in one statement, in the given order.
    pub async fn create_batch(
        pool: &PgPool,
        car_id: DbId,
        colors: &[CreateCarColor],
    ) -> Result<Vec<CarColor>, sqlx::Error> {
        if colors.is_empty() {
            return Ok(vec![]);
        }

        let names: Vec<String> = colors.iter().map(|c| c.name.clone()).collect();
        let codes: Vec<String> = colors.iter().map(|c| c.code.clone()).collect();
        let urls: Vec<Option<String>> = colors.iter().map(|c| c.image_url.clone()).collect();
        let orders: Vec<i32> = (0..colors.len() as i32).collect();

        let query = format!(
            "INSERT INTO car_colors (car_id, name, code, image_url, sort_order)
             SELECT $1::bigint, * FROM UNNEST($2::text[], $3::text[], $4::text[], $5::int4[])
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarColor>(&query)
            .bind(car_id)
            .bind(&names)
            .bind(&codes)
            .bind(&urls)
            .bind(&orders)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CarColor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM car_colors WHERE id = $1");
        sqlx::query_as::<_, CarColor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_car(pool: &PgPool, car_id: DbId) -> Result<Vec<CarColor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM car_colors WHERE car_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, CarColor>(&query)
            .bind(car_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_cars(
        pool: &PgPool,
        car_ids: &[DbId],
    ) -> Result<Vec<CarColor>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM car_colors WHERE car_id = ANY($1) ORDER BY car_id, sort_order, id"
        );
        sqlx::query_as::<_, CarColor>(&query)
            .bind(car_ids)
            .fetch_all(pool)
            .await
    }

    /// Update a color of the given car. Only non-`None` fields are applied.
    pub async fn update(
        pool: &PgPool,
        car_id: DbId,
        id: DbId,
        input: &UpdateCarColor,
    ) -> Result<Option<CarColor>, sqlx::Error> {
        let query = format!(
            "UPDATE car_colors SET
                name = COALESCE($3, name),
                code = COALESCE($4, code),
                image_url = COALESCE($5, image_url)
             WHERE id = $1 AND car_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarColor>(&query)
            .bind(id)
            .bind(car_id)
            .bind(&input.name)
            .bind(&input.code)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, car_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_colors WHERE id = $1 AND car_id = $2")
            .bind(id)
            .bind(car_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete every color of a car. Returns the count of deleted rows.
    pub async fn delete_by_car(pool: &PgPool, car_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_colors WHERE car_id = $1")
            .bind(car_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
