//! Contact wizard submissions.

use serde::Serialize;
use showroom_core::leads::ContactForm;
use showroom_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `contact_submissions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ContactSubmission {
    pub id: DbId,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_contact: String,
    pub car_id: Option<DbId>,
    pub message: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a contact submission.
#[derive(Debug, Clone)]
pub struct CreateContactSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub preferred_contact: String,
    pub car_id: Option<DbId>,
    pub message: String,
}

impl From<&ContactForm> for CreateContactSubmission {
    fn from(form: &ContactForm) -> Self {
        Self {
            name: form.name.trim().to_string(),
            email: form.email.trim().to_string(),
            phone: form
                .phone
                .as_deref()
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            preferred_contact: form.preferred_contact.as_str().to_string(),
            car_id: form.car_id,
            message: form.message.trim().to_string(),
        }
    }
}
