//! Stored configuration wizard sessions.

use showroom_core::types::{DbId, Timestamp};
use showroom_core::wizard::{StoredDraft, WizardMode, WizardSession};
use sqlx::FromRow;

pub const MODE_CREATE: &str = "create";
pub const MODE_EDIT: &str = "edit";

/// A row from the `wizard_sessions` table.
#[derive(Debug, Clone, FromRow)]
pub struct WizardSessionRow {
    pub id: DbId,
    pub user_id: DbId,
    pub mode: String,
    pub car_id: Option<DbId>,
    pub stage: i32,
    pub form_data: serde_json::Value,
    pub submitting: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl WizardSessionRow {
    pub fn mode(&self) -> Option<WizardMode> {
        match (self.mode.as_str(), self.car_id) {
            (MODE_CREATE, None) => Some(WizardMode::Create),
            (MODE_EDIT, Some(car_id)) => Some(WizardMode::Edit { car_id }),
            _ => None,
        }
    }

    /// Decode the stored state; `None` when any part is malformed.
    pub fn to_session(&self) -> Option<WizardSession> {
        let mode = self.mode()?;
        let stored = StoredDraft::from_parts(self.stage, &self.form_data)?;
        WizardSession::resume(mode, stored).ok()
    }
}

/// DTO for opening a session row.
pub struct CreateWizardSession {
    pub user_id: DbId,
    pub mode: &'static str,
    pub car_id: Option<DbId>,
    pub stage: i32,
    pub form_data: serde_json::Value,
}

impl CreateWizardSession {
    pub fn from_session(user_id: DbId, session: &WizardSession) -> Self {
        let stored = session.to_stored();
        let (mode, car_id) = match session.mode {
            WizardMode::Create => (MODE_CREATE, None),
            WizardMode::Edit { car_id } => (MODE_EDIT, Some(car_id)),
        };
        Self {
            user_id,
            mode,
            car_id,
            stage: i32::from(stored.stage),
            form_data: form_data_json(&stored),
        }
    }
}

/// The `form_data` column holds only the draft; the stage has its own column.
pub fn form_data_json(stored: &StoredDraft) -> serde_json::Value {
    serde_json::to_value(&stored.form_data).unwrap_or_else(|_| serde_json::json!({}))
}
