//! # List Queries
//!
//! Filter, relation, sort, and paging options for `find`, and the paginated
//! envelope list calls return.
//!
//! ## Wire Format
//! ```text
//! FindOptions::new()
//!     .filter("owner", 1)             →  owner_eq=1
//!     .include("owner")               →  relations=owner
//!     .sort("createdAt", Desc)        →  orderBy=createdAt&order=DESC
//!     .per_page(50)                   →  perPage=50
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SortOrder {
    #[default]
    #[serde(rename = "ASC")]
    Asc,
    #[serde(rename = "DESC")]
    Desc,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "ASC"),
            SortOrder::Desc => write!(f, "DESC"),
        }
    }
}

/// Options for a list query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FindOptions {
    /// Equality filters, `(field, value)`.
    pub filters: Vec<(String, String)>,
    /// Relations to embed in each record.
    pub include: Vec<String>,
    /// Field and direction to sort by.
    pub sort: Option<(String, SortOrder)>,
    pub per_page: Option<u32>,
}

impl FindOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps records whose `field` equals `value` (or whose related record has that id).
    pub fn filter(mut self, field: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((field.into(), value.to_string()));
        self
    }

    /// Embeds the named relation instead of returning its id.
    pub fn include(mut self, relation: impl Into<String>) -> Self {
        self.include.push(relation.into());
        self
    }

    pub fn sort(mut self, field: impl Into<String>, order: SortOrder) -> Self {
        self.sort = Some((field.into(), order));
        self
    }

    /// Asks for a page size. `None` or zero leaves the backend default.
    pub fn per_page(mut self, per_page: Option<u32>) -> Self {
        self.per_page = per_page.filter(|&n| n > 0);
        self
    }

    /// Query-string pairs in the backend's REST dialect.
    pub fn to_query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs: Vec<(String, String)> = self
            .filters
            .iter()
            .map(|(field, value)| (format!("{}_eq", field), value.clone()))
            .collect();

        if !self.include.is_empty() {
            pairs.push(("relations".to_string(), self.include.join(",")));
        }

        if let Some((field, order)) = &self.sort {
            pairs.push(("orderBy".to_string(), field.clone()));
            pairs.push(("order".to_string(), order.to_string()));
        }

        if let Some(per_page) = self.per_page {
            pairs.push(("perPage".to_string(), per_page.to_string()));
        }

        pairs
    }
}

/// One page of a list query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,

    #[serde(default)]
    pub total: u64,

    #[serde(default = "first_page")]
    pub current_page: u64,

    #[serde(default = "first_page")]
    pub last_page: u64,

    #[serde(default)]
    pub per_page: u64,
}

fn first_page() -> u64 {
    1
}

impl<T> Paginated<T> {
    /// Wraps a complete result set as a single page.
    pub fn single(data: Vec<T>) -> Self {
        let total = data.len() as u64;
        Paginated {
            data,
            total,
            current_page: 1,
            last_page: 1,
            per_page: total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_pairs() {
        let opts = FindOptions::new()
            .filter("owner", 1)
            .include("owner")
            .sort("createdAt", SortOrder::Desc)
            .per_page(Some(50));

        assert_eq!(
            opts.to_query_pairs(),
            vec![
                ("owner_eq".to_string(), "1".to_string()),
                ("relations".to_string(), "owner".to_string()),
                ("orderBy".to_string(), "createdAt".to_string()),
                ("order".to_string(), "DESC".to_string()),
                ("perPage".to_string(), "50".to_string()),
            ]
        );
    }

    #[test]
    fn test_empty_options_produce_no_pairs() {
        assert!(FindOptions::new().to_query_pairs().is_empty());
    }

    #[test]
    fn test_multiple_relations_are_comma_joined() {
        let opts = FindOptions::new().include("owner").include("restaurant");
        assert_eq!(
            opts.to_query_pairs(),
            vec![("relations".to_string(), "owner,restaurant".to_string())]
        );
    }

    #[test]
    fn test_zero_per_page_is_dropped() {
        let opts = FindOptions::new().per_page(Some(0));
        assert_eq!(opts.per_page, None);
        assert!(opts.to_query_pairs().is_empty());
    }

    #[test]
    fn test_paginated_envelope() {
        let page: Paginated<serde_json::Value> = serde_json::from_value(json!({
            "data": [{ "id": 1 }, { "id": 2 }],
            "total": 2,
            "currentPage": 1,
            "lastPage": 1,
            "perPage": 10
        }))
        .unwrap();
        assert_eq!(page.data.len(), 2);
        assert_eq!(page.per_page, 10);

        let minimal: Paginated<u32> = serde_json::from_value(json!({ "data": [] })).unwrap();
        assert_eq!(minimal.current_page, 1);
        assert_eq!(minimal.total, 0);
    }
}
