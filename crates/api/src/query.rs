//! Shared query parameter types for API handlers.

use serde::Deserialize;
use showroom_core::search::{clamp_limit, clamp_offset};

/// Default page size for list endpoints.
pub const DEFAULT_LIMIT: i64 = 50;
/// Largest page a client may request.
pub const MAX_LIMIT: i64 = 200;

/// Generic pagination parameters (`?limit=&offset=`).
#[derive(Debug, Default, Deserialize)]
pub struct PaginationParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl PaginationParams {
    /// Clamped `(limit, offset)` pair.
    pub fn resolve(&self) -> (i64, i64) {
        (
            clamp_limit(self.limit, DEFAULT_LIMIT, MAX_LIMIT),
            clamp_offset(self.offset),
        )
    }
}

/// Ticket list filter (`?status=&limit=&offset=`).
#[derive(Debug, Deserialize)]
pub struct TicketListParams {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}
