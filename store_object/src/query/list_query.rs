//! List query parameters
//!
//! `ListQuery` is what callers hand in; `PageRequest` is the validated,
//! normalized form the backing store receives.

use super::ordering::SortOrder;
use super::pagination::{offset, PaginationSettings};
use crate::traits::TableMetadata;
use crate::StoreError;
use std::collections::BTreeMap;

/// Caller-supplied list parameters
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
    pub sort: Option<String>,
    pub order: Option<SortOrder>,
    pub filters: BTreeMap<String, String>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse raw string parameters (e.g. from a query string).
    ///
    /// Non-numeric page/limit values and unknown sort orders are rejected.
    /// Blank values count as absent.
    pub fn from_raw(
        page: Option<&str>,
        limit: Option<&str>,
        sort: Option<&str>,
        order: Option<&str>,
    ) -> Result<Self, StoreError> {
        Ok(Self {
            page: parse_number("page", page)?,
            limit: parse_number("limit", limit)?,
            sort: non_blank(sort).map(str::to_string),
            order: non_blank(order).map(str::parse::<SortOrder>).transpose()?,
            filters: BTreeMap::new(),
        })
    }

    pub fn page(mut self, page: i64) -> Self {
        self.page = Some(page);
        self
    }

    pub fn limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some(field.into());
        self.order = Some(order);
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(field.into(), value.into());
        self
    }

    /// Validate against the entity and apply pagination bounds
    pub fn resolve<T: TableMetadata>(
        &self,
        settings: &PaginationSettings,
    ) -> Result<PageRequest, StoreError> {
        let sort = match (self.sort.as_deref().and_then(|s| non_blank(Some(s))), self.order) {
            (Some(field), order) => Some(SortSpec::new::<T>(field, order.unwrap_or_default())?),
            (None, Some(order)) => Some(SortSpec::new::<T>("id", order)?),
            (None, None) => None,
        };

        let mut filters = BTreeMap::new();
        for (field, value) in &self.filters {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            if !T::filterable_fields().contains(&field.as_str()) {
                return Err(StoreError::invalid(format!(
                    "cannot filter {} by '{}'",
                    T::table_name(),
                    field
                )));
            }
            filters.insert(field.clone(), value.to_string());
        }

        Ok(PageRequest {
            page: settings.normalize_page(self.page),
            limit: settings.normalize_limit(self.limit),
            sort,
            filters,
        })
    }
}

/// Validated sort column and direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub order: SortOrder,
}

impl SortSpec {
    fn new<T: TableMetadata>(field: &str, order: SortOrder) -> Result<Self, StoreError> {
        if !T::sortable_fields().contains(&field) {
            return Err(StoreError::invalid(format!(
                "cannot sort {} by '{}'",
                T::table_name(),
                field
            )));
        }
        Ok(Self {
            field: field.to_string(),
            order,
        })
    }
}

/// Normalized page request handed to the backing store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
    pub sort: Option<SortSpec>,
    pub filters: BTreeMap<String, String>,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.max(1),
            sort: None,
            filters: BTreeMap::new(),
        }
    }

    pub fn offset(&self) -> u64 {
        offset(self.page, self.limit)
    }

    /// Cache-key parameters: pagination, ordering and `filter.`-prefixed filters
    pub fn cache_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("page".to_string(), self.page.to_string()),
            ("limit".to_string(), self.limit.to_string()),
        ];
        if let Some(sort) = &self.sort {
            params.push(("sort".to_string(), sort.field.clone()));
            params.push(("order".to_string(), sort.order.as_str().to_string()));
        }
        params.extend(
            self.filters
                .iter()
                .map(|(field, value)| (format!("filter.{}", field), value.clone())),
        );
        params
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn parse_number(name: &str, value: Option<&str>) -> Result<Option<i64>, StoreError> {
    non_blank(value)
        .map(|v| {
            v.parse::<i64>()
                .map_err(|_| StoreError::invalid(format!("{} must be an integer, got '{}'", name, v)))
        })
        .transpose()
}
