pub const DEFAULT_PAGE_SIZE: i64 = 10;
pub const MAX_PAGE_SIZE: i64 = 50;

/// Page-number pagination for the patient list: page >= 1, limit
/// clamped into [1, 50] with a default of 10.
pub fn clamp_page_limit(page: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (page, limit)
}

/// Skip/limit pagination for the query engine: skip >= 0, limit
/// clamped into [1, 50] with a default of 10.
pub fn clamp_skip_limit(skip: Option<i64>, limit: Option<i64>) -> (u64, i64) {
    let skip = skip.unwrap_or(0).max(0) as u64;
    let limit = limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE);
    (skip, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_absent() {
        assert_eq!(clamp_page_limit(None, None), (1, 10));
        assert_eq!(clamp_skip_limit(None, None), (0, 10));
    }

    #[test]
    fn limit_clamped_into_bounds() {
        assert_eq!(clamp_page_limit(Some(2), Some(0)), (2, 1));
        assert_eq!(clamp_page_limit(Some(2), Some(1000)), (2, 50));
        assert_eq!(clamp_skip_limit(Some(5), Some(0)), (5, 1));
        assert_eq!(clamp_skip_limit(Some(5), Some(1000)), (5, 50));
    }

    #[test]
    fn negative_inputs_clamped() {
        assert_eq!(clamp_page_limit(Some(-3), Some(-7)), (1, 1));
        assert_eq!(clamp_skip_limit(Some(-3), Some(-7)), (0, 1));
    }

    #[test]
    fn effective_skip_is_page_minus_one_times_limit() {
        let (page, limit) = clamp_page_limit(Some(4), Some(25));
        assert_eq!((page - 1) * limit, 75);
    }
}
