//! Pagination and sorting contracts.
//!
//! # Responsibility
//! - Describe a zero-based page window plus ordered sort keys.
//! - Render sort keys into deterministic `ORDER BY` clauses.
//! - Carry page slices with total-count metadata.
//!
//! # Invariants
//! - A `PageRequest` always has `size > 0`.
//! - Every rendered ordering ends with the table's primary key ascending
//!   unless that key is already part of the sort, so equal rows never
//!   shift between pages.
//! - SQLite sorts `NULL` before any value in ascending order.

use crate::db::schema::{
    DEPT_ID_COLUMN, DEPT_NAME_COLUMN, EMPLOYEE_AGE_COLUMN, EMPLOYEE_CREATED_AT_COLUMN,
    EMPLOYEE_DEPT_ID_COLUMN, EMPLOYEE_ID_COLUMN, EMPLOYEE_NAME_COLUMN,
};
use crate::repo::error::{RepoError, RepoResult};
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Closed set of sortable columns for one table.
pub trait SortField: Copy + Eq + Debug {
    /// Storage column backing this field.
    fn column(self) -> &'static str;
    /// Primary-key field used as the final tiebreaker.
    fn tiebreaker() -> Self;
}

/// Sortable employee fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeSortField {
    Id,
    Name,
    Age,
    CreatedAt,
    DeptId,
}

impl SortField for EmployeeSortField {
    fn column(self) -> &'static str {
        match self {
            Self::Id => EMPLOYEE_ID_COLUMN,
            Self::Name => EMPLOYEE_NAME_COLUMN,
            Self::Age => EMPLOYEE_AGE_COLUMN,
            Self::CreatedAt => EMPLOYEE_CREATED_AT_COLUMN,
            Self::DeptId => EMPLOYEE_DEPT_ID_COLUMN,
        }
    }

    fn tiebreaker() -> Self {
        Self::Id
    }
}

/// Sortable department fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeptSortField {
    DeptId,
    DeptName,
}

impl SortField for DeptSortField {
    fn column(self) -> &'static str {
        match self {
            Self::DeptId => DEPT_ID_COLUMN,
            Self::DeptName => DEPT_NAME_COLUMN,
        }
    }

    fn tiebreaker() -> Self {
        Self::DeptId
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct SortKey<F> {
    field: F,
    direction: Direction,
}

/// Ordered list of sort keys, applied first to last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort<F> {
    keys: Vec<SortKey<F>>,
}

impl<F: SortField> Sort<F> {
    /// No explicit ordering; rows still come back in primary-key order.
    pub fn unsorted() -> Self {
        Self { keys: Vec::new() }
    }

    pub fn by(field: F, direction: Direction) -> Self {
        Self::unsorted().and(field, direction)
    }

    pub fn asc(field: F) -> Self {
        Self::by(field, Direction::Asc)
    }

    pub fn desc(field: F) -> Self {
        Self::by(field, Direction::Desc)
    }

    /// Appends a lower-priority key.
    pub fn and(mut self, field: F, direction: Direction) -> Self {
        self.keys.push(SortKey { field, direction });
        self
    }

    /// Renders `col DIR, ...` with the tiebreaker appended.
    ///
    /// `qualifier` is prefixed to every column (e.g. `"u."`).
    pub(crate) fn order_by_clause(&self, qualifier: &str) -> String {
        let tiebreaker = F::tiebreaker();
        let mut parts = self
            .keys
            .iter()
            .map(|key| {
                format!(
                    "{qualifier}{} {}",
                    key.field.column(),
                    key.direction.as_sql()
                )
            })
            .collect::<Vec<_>>();
        if !self.keys.iter().any(|key| key.field == tiebreaker) {
            parts.push(format!("{qualifier}{} ASC", tiebreaker.column()));
        }
        parts.join(", ")
    }
}

impl<F: SortField> Default for Sort<F> {
    fn default() -> Self {
        Self::unsorted()
    }
}

/// Zero-based page window with ordering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest<F> {
    page: u32,
    size: u32,
    sort: Sort<F>,
}

impl<F: SortField> PageRequest<F> {
    /// Builds a page request.
    ///
    /// # Errors
    /// - `RepoError::InvalidArgument` when `size` is zero.
    pub fn of(page: u32, size: u32, sort: Sort<F>) -> RepoResult<Self> {
        if size == 0 {
            return Err(RepoError::InvalidArgument(
                "page size must be a positive integer".to_string(),
            ));
        }
        Ok(Self { page, size, sort })
    }

    /// Builds an unsorted page request.
    pub fn of_size(page: u32, size: u32) -> RepoResult<Self> {
        Self::of(page, size, Sort::unsorted())
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> &Sort<F> {
        &self.sort
    }

    /// Number of rows preceding this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// `(limit, offset)` bind values, or `None` when the page starts at or
    /// past `total` and cannot hold any row.
    pub(crate) fn window(&self, total: u64) -> Option<(i64, i64)> {
        let offset = self.offset();
        if offset >= total {
            return None;
        }
        let offset = i64::try_from(offset).ok()?;
        Some((i64::from(self.size), offset))
    }

    /// Request for the following page with the same size and ordering.
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            size: self.size,
            sort: self.sort.clone(),
        }
    }
}

/// One ordered slice of a larger result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    pub content: Vec<T>,
    /// Zero-based index of this page.
    pub page: u32,
    pub size: u32,
    /// Rows matching the query across all pages.
    pub total_elements: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub(crate) fn new<F: SortField>(
        content: Vec<T>,
        request: &PageRequest<F>,
        total_elements: u64,
    ) -> Self {
        let size = u64::from(request.size);
        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages: total_elements.div_ceil(size),
        }
    }

    pub fn number_of_elements(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn has_next(&self) -> bool {
        u64::from(self.page) + 1 < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

}
