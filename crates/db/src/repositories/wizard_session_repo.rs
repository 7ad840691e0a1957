//! Repository for the `wizard_sessions` table.
//!
//! Sessions are always scoped to their owning user. The `submitting` flag is
//! the busy guard around submission: it is claimed with a compare-and-set
//! and progress saves or deletes never touch a session while it is set.

use sqlx::PgPool;
use showroom_core::types::DbId;

use crate::models::wizard_session::{CreateWizardSession, WizardSessionRow, MODE_CREATE, MODE_EDIT};

const COLUMNS: &str =
    "id, user_id, mode, car_id, stage, form_data, submitting, created_at, updated_at";

pub struct WizardSessionRepo;

impl WizardSessionRepo {
    /// Open a session. A second create-mode session for the same user
    /// violates `uq_wizard_sessions_create_slot`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateWizardSession,
    ) -> Result<WizardSessionRow, sqlx::Error> {
        let query = format!(
            "INSERT INTO wizard_sessions (user_id, mode, car_id, stage, form_data)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardSessionRow>(&query)
            .bind(input.user_id)
            .bind(input.mode)
            .bind(input.car_id)
            .bind(input.stage)
            .bind(&input.form_data)
            .fetch_one(pool)
            .await
    }

    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<WizardSessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wizard_sessions WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, WizardSessionRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's create-mode draft slot, if occupied.
    pub async fn find_create_draft(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Option<WizardSessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wizard_sessions WHERE user_id = $1 AND mode = '{MODE_CREATE}'"
        );
        sqlx::query_as::<_, WizardSessionRow>(&query)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// The user's edit session for a car, if any.
    pub async fn find_edit_session(
        pool: &PgPool,
        user_id: DbId,
        car_id: DbId,
    ) -> Result<Option<WizardSessionRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM wizard_sessions
             WHERE user_id = $1 AND car_id = $2 AND mode = '{MODE_EDIT}'"
        );
        sqlx::query_as::<_, WizardSessionRow>(&query)
            .bind(user_id)
            .bind(car_id)
            .fetch_optional(pool)
            .await
    }

    /// All sessions editing a car, across users.
    pub async fn list_by_car(
        pool: &PgPool,
        car_id: DbId,
    ) -> Result<Vec<WizardSessionRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM wizard_sessions WHERE car_id = $1");
        sqlx::query_as::<_, WizardSessionRow>(&query)
            .bind(car_id)
            .fetch_all(pool)
            .await
    }

    /// Persist the stage cursor and draft after a completed stage.
    ///
    /// Returns `None` if the session is gone or currently submitting.
    pub async fn save_progress(
        pool: &PgPool,
        id: DbId,
        stage: i32,
        form_data: &serde_json::Value,
    ) -> Result<Option<WizardSessionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE wizard_sessions SET stage = $2, form_data = $3
             WHERE id = $1 AND submitting = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardSessionRow>(&query)
            .bind(id)
            .bind(stage)
            .bind(form_data)
            .fetch_optional(pool)
            .await
    }

    /// Atomically mark a session as submitting.
    ///
    /// Returns `None` if the session does not exist for this user or is
    /// already submitting.
    pub async fn try_claim_submit(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<WizardSessionRow>, sqlx::Error> {
        let query = format!(
            "UPDATE wizard_sessions SET submitting = true
             WHERE id = $1 AND user_id = $2 AND submitting = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardSessionRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// Clear the submitting flag after a failed submission.
    pub async fn release_submit(pool: &PgPool, id: DbId) -> Result<(), sqlx::Error> {
        sqlx::query("UPDATE wizard_sessions SET submitting = false WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(())
    }

    /// Delete a session unconditionally. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM wizard_sessions WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user's session unless it is submitting.
    ///
    /// Returns the deleted row, or `None` if nothing matched.
    pub async fn delete_if_idle(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<WizardSessionRow>, sqlx::Error> {
        let query = format!(
            "DELETE FROM wizard_sessions
             WHERE id = $1 AND user_id = $2 AND submitting = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, WizardSessionRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }
}
