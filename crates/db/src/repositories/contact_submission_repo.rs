//! Repository for the `contact_submissions` table.

use sqlx::PgPool;

use crate::models::contact_submission::{ContactSubmission, CreateContactSubmission};

const COLUMNS: &str =
    "id, name, email, phone, preferred_contact, car_id, message, created_at, updated_at";

pub struct ContactSubmissionRepo;

impl ContactSubmissionRepo {
    pub async fn create(
        pool: &PgPool,
        input: &CreateContactSubmission,
    ) -> Result<ContactSubmission, sqlx::Error> {
        let query = format!(
            "INSERT INTO contact_submissions
                (name, email, phone, preferred_contact, car_id, message)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ContactSubmission>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.phone)
            .bind(&input.preferred_contact)
            .bind(input.car_id)
            .bind(&input.message)
            .fetch_one(pool)
            .await
    }

    /// List submissions, newest first.
    pub async fn list(
        pool: &PgPool,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ContactSubmission>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM contact_submissions
             ORDER BY created_at DESC, id DESC
             LIMIT $1 OFFSET $2"
        );
        sqlx::query_as::<_, ContactSubmission>(&query)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }
}
