//! Page validation and slicing
//!
//! Pages are 1-indexed. A result set of `n` items at page size `s` has
//! `ceil(n / s)` pages, and an empty result set has zero pages. Requested
//! pages are clamped into range by [`validate`]; a request that needed
//! clamping is answered with a [`PaginationOutcome::Redirect`] to the
//! canonical page instead of a rendered page.

/// Result of running a listing request
#[derive(Debug, Clone, PartialEq)]
pub enum PaginationOutcome<T> {
    /// A page of results ready for display
    Render {
        items: Vec<T>,
        current_page: u64,
        total_pages: u64,
    },
    /// The requested page was out of range or malformed
    Redirect {
        /// Canonical page number
        page: u64,
        /// Canonical location, preserving the search and tag parameters
        location: String,
    },
}

/// Parse a raw `page` parameter
///
/// An absent parameter is page 1. Anything that is not an integer yields
/// `None`, which [`validate`] maps to page 1.
#[must_use]
pub fn parse_page(raw: Option<&str>) -> Option<i64> {
    match raw {
        None => Some(1),
        Some(value) => value.trim().parse().ok(),
    }
}

/// Number of pages needed for `total_count` items
#[must_use]
pub const fn total_pages(total_count: usize, page_size: usize) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total_count.div_ceil(page_size) as u64
}

/// Clamp a requested page into `1..=max(total_pages, 1)`
///
/// - unparsable or below 1 → 1
/// - no pages at all → 1
/// - beyond the last page → the last page
#[must_use]
pub fn validate(requested: Option<i64>, total_pages: u64) -> u64 {
    let Some(page) = requested.and_then(|p| u64::try_from(p).ok()).filter(|&p| p >= 1) else {
        return 1;
    };
    if total_pages == 0 {
        return 1;
    }
    page.min(total_pages)
}

/// The half-open slice `[(page-1)*size, page*size)` of `items`, clipped
///
/// Out-of-range pages, page 0 and a zero page size all yield an empty slice.
#[must_use]
pub fn paginate<T>(items: &[T], page: u64, page_size: usize) -> &[T] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let Some(start) = usize::try_from(page - 1)
        .ok()
        .and_then(|p| p.checked_mul(page_size))
    else {
        return &[];
    };
    if start >= items.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_page() {
        assert_eq!(parse_page(None), Some(1));
        assert_eq!(parse_page(Some("3")), Some(3));
        assert_eq!(parse_page(Some(" 7 ")), Some(7));
        assert_eq!(parse_page(Some("-2")), Some(-2));
        assert_eq!(parse_page(Some("abc")), None);
        assert_eq!(parse_page(Some("")), None);
        assert_eq!(parse_page(Some("1.5")), None);
        assert_eq!(parse_page(Some("NaN")), None);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 9), 0);
        assert_eq!(total_pages(1, 9), 1);
        assert_eq!(total_pages(9, 9), 1);
        assert_eq!(total_pages(10, 9), 2);
        assert_eq!(total_pages(15, 9), 2);
        assert_eq!(total_pages(5, 0), 0);
    }

    #[test]
    fn test_validate_in_range_unchanged() {
        assert_eq!(validate(Some(1), 3), 1);
        assert_eq!(validate(Some(2), 3), 2);
        assert_eq!(validate(Some(3), 3), 3);
    }

    #[test]
    fn test_validate_clamps_high() {
        assert_eq!(validate(Some(99), 2), 2);
        assert_eq!(validate(Some(i64::MAX), 5), 5);
    }

    #[test]
    fn test_validate_invalid_is_one() {
        assert_eq!(validate(None, 4), 1);
        assert_eq!(validate(Some(0), 4), 1);
        assert_eq!(validate(Some(-5), 4), 1);
        assert_eq!(validate(Some(i64::MIN), 4), 1);
    }

    #[test]
    fn test_validate_no_pages() {
        assert_eq!(validate(Some(1), 0), 1);
        assert_eq!(validate(Some(5), 0), 1);
        assert_eq!(validate(None, 0), 1);
    }

    #[test]
    fn test_validate_range_property() {
        for total in 0..=12u64 {
            for page in -3..=20i64 {
                let valid = validate(Some(page), total);
                assert!(valid >= 1);
                assert!(valid <= total.max(1));
                if page >= 1 && (page as u64) <= total {
                    assert_eq!(valid, page as u64);
                }
            }
        }
    }

    #[test]
    fn test_paginate_slices() {
        let items: Vec<u32> = (1..=15).collect();
        assert_eq!(paginate(&items, 1, 9), &[1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(paginate(&items, 2, 9), &[10, 11, 12, 13, 14, 15]);
        assert!(paginate(&items, 3, 9).is_empty());
    }

    #[test]
    fn test_paginate_out_of_bounds_is_safe() {
        let items = vec!['a', 'b'];
        assert!(paginate(&items, 0, 5).is_empty());
        assert!(paginate(&items, 1, 0).is_empty());
        assert!(paginate(&items, u64::MAX, usize::MAX).is_empty());
        assert!(paginate::<char>(&[], 1, 5).is_empty());
    }

    #[test]
    fn test_pages_reconstruct_input() {
        let items: Vec<u32> = (0..47).collect();
        for size in 1..=12 {
            let pages = total_pages(items.len(), size);
            let rebuilt: Vec<u32> = (1..=pages)
                .flat_map(|p| paginate(&items, p, size).iter().copied())
                .collect();
            assert_eq!(rebuilt, items);
        }
    }
}
