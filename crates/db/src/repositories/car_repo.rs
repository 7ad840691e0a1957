//! Repository for the `cars` table.

use sqlx::PgPool;
use showroom_core::types::DbId;

use crate::models::car::{Car, CarDetail, SaveCar};
use crate::repositories::{CarColorRepo, CarInteriorRepo, CarTrimRepo};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, name, base_price, specification, image_url, created_at, updated_at";

/// Provides CRUD operations for cars.
pub struct CarRepo;

impl CarRepo {
    /// Insert a new car, returning the created row.
    pub async fn create(pool: &PgPool, input: &SaveCar) -> Result<Car, sqlx::Error> {
        let query = format!(
            "INSERT INTO cars (name, base_price, specification, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(&input.name)
            .bind(&input.base_price)
            .bind(&input.specification)
            .bind(&input.image_url)
            .fetch_one(pool)
            .await
    }

    /// Replace every writable column of a car.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &SaveCar,
    ) -> Result<Option<Car>, sqlx::Error> {
        let query = format!(
            "UPDATE cars SET
                name = $2,
                base_price = $3,
                specification = $4,
                image_url = $5
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.base_price)
            .bind(&input.specification)
            .bind(&input.image_url)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Car>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM cars WHERE id = $1");
        sqlx::query_as::<_, Car>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List cars, newest first.
    pub async fn list(pool: &PgPool, limit: i64, offset: i64) -> Result<Vec<Car>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM cars ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, Car>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Load a car with its trims, colors and interiors.
    pub async fn find_detail(pool: &PgPool, id: DbId) -> Result<Option<CarDetail>, sqlx::Error> {
        let Some(car) = Self::find_by_id(pool, id).await? else {
            return Ok(None);
        };
        Ok(Some(CarDetail {
            car,
            trims: CarTrimRepo::list_by_car(pool, id).await?,
            colors: CarColorRepo::list_by_car(pool, id).await?,
            interiors: CarInteriorRepo::list_by_car(pool, id).await?,
        }))
    }

    /// Load a page of cars with their option rows, newest first.
    ///
    /// Children are fetched with one query per table, not per car.
    pub async fn list_details(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CarDetail>, sqlx::Error> {
        let cars = Self::list(pool, limit, offset).await?;
        if cars.is_empty() {
            return Ok(vec![]);
        }
        let ids: Vec<DbId> = cars.iter().map(|c| c.id).collect();
        let mut trims = CarTrimRepo::list_by_cars(pool, &ids).await?;
        let mut colors = CarColorRepo::list_by_cars(pool, &ids).await?;
        let mut interiors = CarInteriorRepo::list_by_cars(pool, &ids).await?;

        Ok(cars
            .into_iter()
            .map(|car| {
                let id = car.id;
                CarDetail {
                    car,
                    trims: drain_for(&mut trims, |t| t.car_id == id),
                    colors: drain_for(&mut colors, |c| c.car_id == id),
                    interiors: drain_for(&mut interiors, |i| i.car_id == id),
                }
            })
            .collect())
    }

    /// Delete a car, its option rows and any wizard sessions editing it,
    /// in one transaction.
    ///
    /// Returns `true` if the car existed.
    pub async fn delete_with_children(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let mut tx = pool.begin().await?;
        for table in ["car_colors", "car_trims", "car_interiors", "wizard_sessions"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE car_id = $1"))
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        let result = sqlx::query("DELETE FROM cars WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
        Ok(result.rows_affected() > 0)
    }
}

fn drain_for<T>(rows: &mut Vec<T>, mut keep: impl FnMut(&T) -> bool) -> Vec<T> {
    let (matched, rest): (Vec<T>, Vec<T>) = std::mem::take(rows).into_iter().partition(|r| keep(r));
    *rows = rest;
    matched
}
