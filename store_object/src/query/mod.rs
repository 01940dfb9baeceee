//! Query parameters
//!
//! This module provides list parameters, sort ordering and pagination arithmetic.

pub mod list_query;
pub mod ordering;
pub mod pagination;

#[cfg(test)]
mod tests;

pub use list_query::{ListQuery, PageRequest, SortSpec};
pub use ordering::SortOrder;
pub use pagination::{offset, total_pages, PageMeta, PaginationSettings};
