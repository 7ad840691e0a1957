//! Pagination helpers shared by list endpoints.

/// Clamp a user-provided limit into `1..=max`, falling back to `default`.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limit_defaults_when_absent() {
        assert_eq!(clamp_limit(None, 25, 100), 25);
    }

    #[test]
    fn limit_is_clamped_to_range() {
        assert_eq!(clamp_limit(Some(0), 25, 100), 1);
        assert_eq!(clamp_limit(Some(-5), 25, 100), 1);
        assert_eq!(clamp_limit(Some(500), 25, 100), 100);
        assert_eq!(clamp_limit(Some(40), 25, 100), 40);
    }

    #[test]
    fn offset_never_negative() {
        assert_eq!(clamp_offset(None), 0);
        assert_eq!(clamp_offset(Some(-3)), 0);
        assert_eq!(clamp_offset(Some(10)), 10);
    }
}
