//! Lead-capture forms: contact wizard, order form, and support tickets.
//!
//! Field-level checks (lengths, email shape) are declared with `validator`
//! derives. The contact wizard reports the first of its named steps whose
//! fields fail, so a client can jump back to that step.

use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Contact wizard
// ---------------------------------------------------------------------------

/// Named steps of the chat-style contact wizard, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStep {
    Name,
    ContactDetails,
    Interest,
    Message,
}

pub const CONTACT_STEPS: [ContactStep; 4] = [
    ContactStep::Name,
    ContactStep::ContactDetails,
    ContactStep::Interest,
    ContactStep::Message,
];

impl ContactStep {
    pub fn label(self) -> &'static str {
        match self {
            Self::Name => "Name",
            Self::ContactDetails => "Contact Details",
            Self::Interest => "Interest",
            Self::Message => "Message",
        }
    }

    /// Form fields collected on this step.
    pub fn fields(self) -> &'static [&'static str] {
        match self {
            Self::Name => &["name"],
            Self::ContactDetails => &["email", "phone", "preferred_contact"],
            Self::Interest => &["car_id"],
            Self::Message => &["message"],
        }
    }
}

/// How the customer wants to be reached.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreferredContact {
    #[default]
    Email,
    Phone,
}

impl PreferredContact {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Phone => "phone",
        }
    }
}

/// Completed contact wizard.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ContactForm {
    #[validate(length(max = 200), custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(default)]
    pub preferred_contact: PreferredContact,
    pub car_id: Option<DbId>,
    #[validate(length(max = 5000), custom(function = "not_blank", message = "Message is required"))]
    pub message: String,
}

/// Reject values made only of whitespace; `length(min = 1)` lets them through.
fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

fn has_field_error(errors: &ValidationErrors, field: &str) -> bool {
    errors
        .field_errors()
        .keys()
        .any(|k| AsRef::<str>::as_ref(k) == field)
}

impl ContactForm {
    /// Validate the whole wizard, naming the first failing step.
    pub fn check(&self) -> Result<(), CoreError> {
        let mut errors = match self.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };
        if self.preferred_contact == PreferredContact::Phone
            && self.phone.as_deref().map_or(true, |p| p.trim().is_empty())
        {
            errors.add(
                "phone",
                ValidationError::new("required")
                    .with_message("A phone number is required to be contacted by phone".into()),
            );
        }
        if errors.is_empty() {
            return Ok(());
        }

        let step = CONTACT_STEPS
            .iter()
            .find(|s| s.fields().iter().any(|f| has_field_error(&errors, f)))
            .copied()
            .unwrap_or(ContactStep::Message);
        Err(CoreError::Validation(format!(
            "Step '{}' is incomplete: {errors}",
            step.label()
        )))
    }
}

// ---------------------------------------------------------------------------
// Order form
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct OrderForm {
    #[validate(length(max = 200), custom(function = "not_blank", message = "Name is required"))]
    pub customer_name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(max = 40), custom(function = "not_blank", message = "Phone is required"))]
    pub phone: String,
    pub car_id: DbId,
    pub trim_id: Option<DbId>,
    pub color_id: Option<DbId>,
    pub interior_id: Option<DbId>,
    #[validate(length(max = 5000))]
    pub notes: Option<String>,
}

impl OrderForm {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}

/// Ensure an option picked on an order belongs to the ordered car.
pub fn ensure_option_belongs(
    option: &'static str,
    option_car_id: Option<DbId>,
    car_id: DbId,
) -> Result<(), CoreError> {
    match option_car_id {
        Some(owner) if owner == car_id => Ok(()),
        Some(_) => Err(CoreError::Validation(format!(
            "The selected {option} is not available for car {car_id}"
        ))),
        None => Err(CoreError::Validation(format!(
            "The selected {option} does not exist"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Support tickets
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketPriority {
    Low,
    #[default]
    Normal,
    High,
}

impl TicketPriority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
        }
    }
}

/// Lifecycle of a support ticket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
}

impl TicketStatus {
    /// Parse a status string from the database or a request.
    pub fn from_str_db(s: &str) -> Result<Self, CoreError> {
        match s {
            "open" => Ok(Self::Open),
            "in_progress" => Ok(Self::InProgress),
            "resolved" => Ok(Self::Resolved),
            _ => Err(CoreError::Validation(format!(
                "Invalid ticket status '{s}'. Must be one of: open, in_progress, resolved"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Resolved => "resolved",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SupportForm {
    #[validate(length(max = 200), custom(function = "not_blank", message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(max = 300), custom(function = "not_blank", message = "Subject is required"))]
    pub subject: String,
    #[validate(length(max = 10000), custom(function = "not_blank", message = "Message is required"))]
    pub message: String,
    #[serde(default)]
    pub priority: TicketPriority,
}

impl SupportForm {
    pub fn check(&self) -> Result<(), CoreError> {
        self.validate()
            .map_err(|e| CoreError::Validation(e.to_string()))
    }
}
