//! Request extractors guarding admin routes.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireAdmin`] -- Additionally requires the `admin` role.

pub mod auth;
pub mod rbac;
