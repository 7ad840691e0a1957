//! Support tickets.

use serde::Serialize;
use showroom_core::leads::SupportForm;
use showroom_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `support_tickets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SupportTicket {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub priority: String,
    pub status: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for opening a ticket. New tickets always start `open`.
#[derive(Debug, Clone)]
pub struct CreateSupportTicket {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub priority: String,
}

impl From<&SupportForm> for CreateSupportTicket {
    fn from(form: &SupportForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            subject: form.subject.trim().to_string(),
            message: form.message.trim().to_string(),
            priority: form.priority.as_str().to_string(),
        }
    }
}
