//! Repository for the `support_tickets` table.

use sqlx::PgPool;
use showroom_core::types::DbId;

use crate::models::support_ticket::{CreateSupportTicket, SupportTicket};

const COLUMNS: &str =
    "id, name, email, subject, message, priority, status, created_at, updated_at";

pub struct SupportTicketRepo;

impl SupportTicketRepo {
    /// Open a new ticket with status `open`.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSupportTicket,
    ) -> Result<SupportTicket, sqlx::Error> {
        let query = format!(
            "INSERT INTO support_tickets (name, email, subject, message, priority, status)
             VALUES ($1, $2, $3, $4, $5, 'open')
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(&input.name)
            .bind(&input.email)
            .bind(&input.subject)
            .bind(&input.message)
            .bind(&input.priority)
            .fetch_one(pool)
            .await
    }

    /// List tickets newest first, optionally filtered by status.
    pub async fn list(
        pool: &PgPool,
        status: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<SupportTicket>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM support_tickets
             WHERE ($1::text IS NULL OR status = $1)
             ORDER BY created_at DESC, id DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Set a ticket's status. Returns `None` if the ticket does not exist.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        status: &str,
    ) -> Result<Option<SupportTicket>, sqlx::Error> {
        let query = format!(
            "UPDATE support_tickets SET status = $2 WHERE id = $1 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SupportTicket>(&query)
            .bind(id)
            .bind(status)
            .fetch_optional(pool)
            .await
    }
}
