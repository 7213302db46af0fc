/// Normalizes pagination input: 1-based page, page size clamped to 1-100.
pub fn validate_pagination(page: Option<u32>, limit: Option<u32>) -> (u32, u32) {
    let page = page.unwrap_or(1).max(1);
    let limit = limit.unwrap_or(20).clamp(1, 100);
    (page, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(validate_pagination(None, None), (1, 20));
    }

    #[test]
    fn test_clamping() {
        assert_eq!(validate_pagination(Some(0), Some(0)), (1, 1));
        assert_eq!(validate_pagination(Some(5), Some(500)), (5, 100));
    }
}
