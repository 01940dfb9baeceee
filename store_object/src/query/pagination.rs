//! Pagination arithmetic
//!
//! Pure functions only: no I/O, no allocation beyond the returned values.

use serde::{Deserialize, Serialize};

/// Number of pages needed for `total_items` at `limit` per page.
///
/// `limit` of zero is treated as one so the division is always defined.
pub fn total_pages(total_items: u64, limit: u32) -> u64 {
    let limit = u64::from(limit.max(1));
    total_items.div_ceil(limit)
}

/// Row offset of the first item on `page` (1-based)
pub fn offset(page: u32, limit: u32) -> u64 {
    u64::from(page.max(1) - 1) * u64::from(limit)
}

/// Bounds applied to caller-supplied page and limit values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationSettings {
    pub default_page: u32,
    pub default_limit: u32,
    pub max_limit: u32,
}

impl Default for PaginationSettings {
    fn default() -> Self {
        Self {
            default_page: 1,
            default_limit: 10,
            max_limit: 100,
        }
    }
}

impl PaginationSettings {
    pub fn new(default_page: u32, default_limit: u32, max_limit: u32) -> Self {
        Self {
            default_page: default_page.max(1),
            default_limit: default_limit.max(1),
            max_limit: max_limit.max(1),
        }
    }

    /// Page below 1 becomes the default page
    pub fn normalize_page(&self, page: Option<i64>) -> u32 {
        match page {
            Some(p) if p >= 1 => u32::try_from(p).unwrap_or(u32::MAX),
            _ => self.default_page,
        }
    }

    /// Limit below 1 becomes the default limit; above the maximum it is clamped
    pub fn normalize_limit(&self, limit: Option<i64>) -> u32 {
        match limit {
            Some(l) if l >= 1 => {
                u32::try_from(l).unwrap_or(u32::MAX).min(self.max_limit)
            }
            _ => self.default_limit.min(self.max_limit),
        }
    }
}

/// Pagination metadata returned with (and cached alongside) every page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total_items: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageMeta {
    pub fn new(page: u32, limit: u32, total_items: u64) -> Self {
        let total_pages = total_pages(total_items, limit);
        Self {
            page,
            limit,
            total_items,
            total_pages,
            has_next_page: u64::from(page) < total_pages,
            has_previous_page: page > 1,
        }
    }

    pub fn offset(&self) -> u64 {
        offset(self.page, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn first_of_three_pages() {
        let meta = PageMeta::new(1, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(!meta.has_previous_page);
        assert_eq!(meta.offset(), 0);
    }

    #[test]
    fn last_page_has_no_next() {
        let meta = PageMeta::new(3, 10, 25);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
        assert_eq!(meta.offset(), 20);
    }

    #[test]
    fn page_past_the_end_is_allowed() {
        let meta = PageMeta::new(9, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next_page);
        assert!(meta.has_previous_page);
    }

    #[test]
    fn empty_collection_has_zero_pages() {
        let meta = PageMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
    }

    #[test]
    fn normalization_applies_defaults_and_clamps() {
        let settings = PaginationSettings::new(1, 10, 50);
        assert_eq!(settings.normalize_page(None), 1);
        assert_eq!(settings.normalize_page(Some(0)), 1);
        assert_eq!(settings.normalize_page(Some(-4)), 1);
        assert_eq!(settings.normalize_page(Some(7)), 7);

        assert_eq!(settings.normalize_limit(None), 10);
        assert_eq!(settings.normalize_limit(Some(0)), 10);
        assert_eq!(settings.normalize_limit(Some(25)), 25);
        assert_eq!(settings.normalize_limit(Some(500)), 50);
    }

    proptest! {
        #[test]
        fn prop_offset_formula(page in 1u32..100_000, limit in 1u32..1_000) {
            prop_assert_eq!(offset(page, limit), u64::from(page - 1) * u64::from(limit));
        }

        #[test]
        fn prop_total_pages_is_ceiling(total in 0u64..10_000_000, limit in 1u32..1_000) {
            let pages = total_pages(total, limit);
            let limit = u64::from(limit);
            prop_assert!(pages * limit >= total);
            prop_assert!(pages == 0 || (pages - 1) * limit < total);
        }

        #[test]
        fn prop_normalized_values_stay_in_bounds(
            page in any::<i64>(),
            limit in any::<i64>(),
            max in 1u32..500,
        ) {
            let settings = PaginationSettings::new(1, 10.min(max), max);
            prop_assert!(settings.normalize_page(Some(page)) >= 1);
            let limit = settings.normalize_limit(Some(limit));
            prop_assert!((1..=max).contains(&limit));
        }
    }
}
