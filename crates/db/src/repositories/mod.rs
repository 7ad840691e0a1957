//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod car_color_repo;
pub mod car_interior_repo;
pub mod car_repo;
pub mod car_trim_repo;
pub mod contact_submission_repo;
pub mod order_repo;
pub mod session_repo;
pub mod support_ticket_repo;
pub mod user_repo;
pub mod wizard_session_repo;

pub use car_color_repo::CarColorRepo;
pub use car_interior_repo::CarInteriorRepo;
pub use car_repo::CarRepo;
pub use car_trim_repo::CarTrimRepo;
pub use contact_submission_repo::ContactSubmissionRepo;
pub use order_repo::OrderRepo;
pub use session_repo::SessionRepo;
pub use support_ticket_repo::SupportTicketRepo;
pub use user_repo::UserRepo;
pub use wizard_session_repo::WizardSessionRepo;
