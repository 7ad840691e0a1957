//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches, where the
//!   table supports single-row edits

pub mod car;
pub mod car_color;
pub mod car_interior;
pub mod car_trim;
pub mod contact_submission;
pub mod order;
pub mod session;
pub mod support_ticket;
pub mod user;
pub mod wizard_session;
