//! Query parameters and pagination utilities

use std::collections::HashMap;

pub const API_KEY_PARAM: &str = "api_key";
pub const PAGE_PARAM: &str = "page";

/// Query parameters accepted by every export route
///
/// Both values are kept as raw strings: a malformed page number is coerced,
/// never rejected. Handlers build this from a plain key/value map, where a
/// repeated parameter keeps its last value.
///
/// # Example
/// ```text
/// GET /chimp-api/posts?api_key=...&page=2
/// ```
#[derive(Debug, Clone, Default)]
pub struct ExportParams {
    /// Shared secret presented by the caller
    pub api_key: Option<String>,

    /// Requested page, 1-based
    pub page: Option<String>,
}

impl From<HashMap<String, String>> for ExportParams {
    fn from(mut query: HashMap<String, String>) -> Self {
        Self {
            api_key: query.remove(API_KEY_PARAM),
            page: query.remove(PAGE_PARAM),
        }
    }
}

impl ExportParams {
    /// Page number, coerced to at least 1
    pub fn page(&self) -> usize {
        self.page.as_deref().map(coerce_page).unwrap_or(1)
    }
}

/// Coerce any page input into a 1-based page number
///
/// Takes the leading integer of the input (so `"3abc"` is page 3); anything
/// non-numeric, zero or negative becomes page 1.
pub fn coerce_page(raw: &str) -> usize {
    let trimmed = raw.trim_start();
    let (negative, digits) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if negative || digits.is_empty() {
        return 1;
    }

    // Overlong inputs saturate instead of wrapping back to page 1
    let page = digits.parse::<usize>().unwrap_or(usize::MAX);
    page.max(1)
}

/// One page of host records plus the total across all pages
#[derive(Debug, Clone)]
pub struct HostPage<T> {
    pub items: Vec<T>,
    pub total: usize,
}

impl<T> HostPage<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Self { items, total }
    }

    /// Slice a full, already ordered collection into one page
    pub fn slice(all: Vec<T>, page: usize, per_page: usize) -> Self {
        let total = all.len();
        let items = all
            .into_iter()
            .skip(page_offset(page, per_page))
            .take(per_page)
            .collect();
        Self::new(items, total)
    }
}

/// Pagination envelope surfaced through response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationMeta {
    /// Total number of items across all pages
    pub total: usize,

    /// Total number of pages
    pub total_pages: usize,
}

impl PaginationMeta {
    pub fn new(total: usize, per_page: usize) -> Self {
        // Ensure per_page is at least 1 to avoid division by zero
        let per_page = per_page.max(1);
        Self {
            total,
            total_pages: total.div_ceil(per_page),
        }
    }
}

/// Zero-based offset of the first item on a page
pub fn page_offset(page: usize, per_page: usize) -> usize {
    page.max(1).saturating_sub(1).saturating_mul(per_page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_default_to_first_page() {
        let params = ExportParams::default();
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_params_from_query_map() {
        let query: HashMap<String, String> = [
            ("api_key".to_string(), "k".to_string()),
            ("page".to_string(), "4".to_string()),
            ("other".to_string(), "x".to_string()),
        ]
        .into_iter()
        .collect();

        let params = ExportParams::from(query);
        assert_eq!(params.api_key.as_deref(), Some("k"));
        assert_eq!(params.page(), 4);

        let params = ExportParams::from(HashMap::new());
        assert!(params.api_key.is_none());
        assert_eq!(params.page(), 1);
    }

    #[test]
    fn test_coerce_page_non_positive() {
        assert_eq!(coerce_page("0"), 1);
        assert_eq!(coerce_page("-4"), 1);
        assert_eq!(coerce_page(""), 1);
    }

    #[test]
    fn test_coerce_page_non_numeric() {
        assert_eq!(coerce_page("abc"), 1);
        assert_eq!(coerce_page("two"), 1);
    }

    #[test]
    fn test_coerce_page_leading_integer() {
        assert_eq!(coerce_page("3"), 3);
        assert_eq!(coerce_page("7abc"), 7);
        assert_eq!(coerce_page(" +2"), 2);
    }

    #[test]
    fn test_coerce_page_overflow_saturates() {
        assert_eq!(coerce_page("99999999999999999999999999"), usize::MAX);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(145, 50);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 3);

        assert_eq!(PaginationMeta::new(0, 10).total_pages, 0);
        assert_eq!(PaginationMeta::new(10, 10).total_pages, 1);
    }

    #[test]
    fn test_host_page_slice_beyond_end() {
        let page = HostPage::slice((1..=5).collect::<Vec<_>>(), 3, 2);
        assert_eq!(page.items, vec![5]);
        assert_eq!(page.total, 5);

        let page = HostPage::slice((1..=5).collect::<Vec<_>>(), 9, 2);
        assert!(page.items.is_empty());
        assert_eq!(page.total, 5);
    }

    #[test]
    fn test_page_offset_saturates() {
        assert_eq!(page_offset(usize::MAX, 50), usize::MAX);
        assert_eq!(page_offset(1, 50), 0);
    }
}
