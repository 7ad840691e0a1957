//! Repository for the `car_interiors` table.

use sqlx::PgPool;
use showroom_core::types::DbId;

use crate::models::car_interior::{CarInterior, CreateCarInterior, UpdateCarInterior};

const COLUMNS: &str = "id, car_id, name, sort_order, created_at, updated_at";

pub struct CarInteriorRepo;

impl CarInteriorRepo {
    pub async fn create(
        pool: &PgPool,
        car_id: DbId,
        input: &CreateCarInterior,
    ) -> Result<CarInterior, sqlx::Error> {
        let query = format!(
            "INSERT INTO car_interiors (car_id, name, sort_order)
             VALUES ($1, $2,
                     (SELECT COALESCE(MAX(sort_order) + 1, 0) FROM car_interiors WHERE car_id = $1))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarInterior>(&query)
            .bind(car_id)
            .bind(&input.name)
            .fetch_one(pool)
            .await
    }

    /// Insert all interiors of a car in one statement, in the given order.
    pub async fn create_batch(
        pool: &PgPool,
        car_id: DbId,
        interiors: &[CreateCarInterior],
    ) -> Result<Vec<CarInterior>, sqlx::Error> {
        if interiors.is_empty() {
            return Ok(vec![]);
        }

        let names: Vec<String> = interiors.iter().map(|i| i.name.clone()).collect();
        let orders: Vec<i32> = (0..interiors.len() as i32).collect();

        let query = format!(
            "INSERT INTO car_interiors (car_id, name, sort_order)
             SELECT $1::bigint, * FROM UNNEST($2::text[], $3::int4[])
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarInterior>(&query)
            .bind(car_id)
            .bind(&names)
            .bind(&orders)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<CarInterior>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM car_interiors WHERE id = $1");
        sqlx::query_as::<_, CarInterior>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list_by_car(
        pool: &PgPool,
        car_id: DbId,
    ) -> Result<Vec<CarInterior>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM car_interiors WHERE car_id = $1 ORDER BY sort_order, id"
        );
        sqlx::query_as::<_, CarInterior>(&query)
            .bind(car_id)
            .fetch_all(pool)
            .await
    }

    pub async fn list_by_cars(
        pool: &PgPool,
        car_ids: &[DbId],
    ) -> Result<Vec<CarInterior>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM car_interiors WHERE car_id = ANY($1) \
             ORDER BY car_id, sort_order, id"
        );
        sqlx::query_as::<_, CarInterior>(&query)
            .bind(car_ids)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        car_id: DbId,
        id: DbId,
        input: &UpdateCarInterior,
    ) -> Result<Option<CarInterior>, sqlx::Error> {
        let query = format!(
            "UPDATE car_interiors SET name = COALESCE($3, name)
             WHERE id = $1 AND car_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CarInterior>(&query)
            .bind(id)
            .bind(car_id)
            .bind(&input.name)
            .fetch_optional(pool)
            .await
    }

    pub async fn delete(pool: &PgPool, car_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_interiors WHERE id = $1 AND car_id = $2")
            .bind(id)
            .bind(car_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_by_car(pool: &PgPool, car_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM car_interiors WHERE car_id = $1")
            .bind(car_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
