//! Page requests and result pages.

use serde::{Deserialize, Serialize};

use crate::criteria::TodoField;
use crate::error::CoreError;

/// Page size applied when a request does not name one.
pub const DEFAULT_PAGE_SIZE: i64 = 2;

/// Largest page size a client may ask for.
pub const MAX_PAGE_SIZE: i64 = 100;

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A single-field sort specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: TodoField,
    pub direction: Direction,
}

impl Sort {
    pub const fn by_id() -> Self {
        Self {
            field: TodoField::Id,
            direction: Direction::Asc,
        }
    }

    /// Parse the `field[,asc|desc]` form used in query strings.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let mut parts = raw.split(',').map(str::trim);
        let name = parts.next().unwrap_or_default();
        let field = TodoField::from_name(name)
            .ok_or_else(|| CoreError::Validation(format!("Unknown sort field '{name}'")))?;

        let direction = match parts.next().map(str::to_ascii_lowercase).as_deref() {
            None | Some("") | Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(other) => {
                return Err(CoreError::Validation(format!(
                    "Unknown sort direction '{other}'"
                )))
            }
        };

        if parts.next().is_some() {
            return Err(CoreError::Validation(format!("Malformed sort '{raw}'")));
        }

        Ok(Self { field, direction })
    }
}

impl Default for Sort {
    fn default() -> Self {
        Self::by_id()
    }
}

// ---------------------------------------------------------------------------
// PageRequest
// ---------------------------------------------------------------------------

/// Which slice of an ordered result set to return.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Zero-based page index.
    pub page: i64,
    pub size: i64,
    pub sort: Sort,
}

impl PageRequest {
    /// First page of `size` rows in id order. `size` is clamped.
    pub fn first(size: i64) -> Self {
        Self {
            page: 0,
            size: clamp_size(Some(size), DEFAULT_PAGE_SIZE),
            sort: Sort::by_id(),
        }
    }

    /// Build a request from optional query-string values.
    ///
    /// Missing values fall back to `default`; the page index is floored at
    /// zero and the size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn from_parts(
        page: Option<i64>,
        size: Option<i64>,
        sort: Option<&str>,
        default: &PageRequest,
    ) -> Result<Self, CoreError> {
        let sort = match sort {
            Some(raw) if !raw.trim().is_empty() => Sort::parse(raw)?,
            _ => default.sort,
        };
        Ok(Self {
            page: page.unwrap_or(default.page).max(0),
            size: clamp_size(size, default.size),
            sort,
        })
    }

    /// Row offset of the first item on this page.
    pub fn offset(&self) -> i64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

/// Clamp a user-provided page size to `1..=MAX_PAGE_SIZE`.
pub fn clamp_size(size: Option<i64>, default: i64) -> i64 {
    size.unwrap_or(default).clamp(1, MAX_PAGE_SIZE)
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
    pub is_first: bool,
    pub is_last: bool,
    pub has_next: bool,
    pub has_previous: bool,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: i64) -> Self {
        let size = request.size.max(1);
        let total_pages = (total_elements + size - 1) / size;
        let page = request.page;
        Self {
            content,
            page,
            size,
            total_elements,
            total_pages,
            is_first: page == 0,
            // `page` may be as large as i64::MAX; compare against the last index.
            is_last: page >= total_pages - 1,
            has_next: page < total_pages - 1,
            has_previous: page > 0,
        }
    }
}
