//! Pagination and ordering utilities for list queries

use serde::{Deserialize, Serialize};

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 100;

/// Offset pagination request
///
/// Both fields are optional; `first` defaults to 20 and is clamped to 1..=100.
///
/// # Example
/// ```rust,ignore
/// // GraphQL:  allProducts(first: 10, offset: 20) { ... }
/// let page = Page::paginate(products, &PageRequest::new(Some(10), Some(20)));
/// ```
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageRequest {
    /// Number of items to return
    pub first: Option<usize>,

    /// Number of items to skip
    pub offset: Option<usize>,
}

impl PageRequest {
    pub fn new(first: Option<usize>, offset: Option<usize>) -> Self {
        Self { first, offset }
    }

    /// Get limit, ensuring it stays within bounds
    pub fn limit(&self) -> usize {
        self.first.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }
}

/// One page of results with pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    /// The paginated data
    pub items: Vec<T>,

    /// Total number of items (after filters)
    pub total_count: usize,

    /// Whether there are items after this page
    pub has_next_page: bool,

    /// Whether there are items before this page
    pub has_previous_page: bool,
}

impl<T> Page<T> {
    /// Cut a page out of an already filtered and sorted collection
    pub fn paginate(items: Vec<T>, request: &PageRequest) -> Self {
        let total_count = items.len();
        let limit = request.limit();
        let offset = request.offset();

        let items: Vec<T> = items.into_iter().skip(offset).take(limit).collect();

        Self {
            items,
            total_count,
            has_next_page: offset + limit < total_count,
            has_previous_page: offset > 0,
        }
    }
}

/// Sort expression: `field` ascending, `-field` descending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: String,
    pub descending: bool,
}

impl OrderBy {
    /// Parse a Django-style ordering expression
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        let (field, descending) = match expr.strip_prefix('-') {
            Some(rest) => (rest, true),
            None => (expr, false),
        };

        if field.is_empty() {
            return None;
        }

        Some(Self {
            field: field.to_string(),
            descending,
        })
    }

    /// Parse a list of expressions, dropping empty ones
    pub fn parse_all(exprs: &[String]) -> Vec<Self> {
        exprs.iter().filter_map(|e| Self::parse(e)).collect()
    }
}
