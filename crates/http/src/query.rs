//! Serialization of list filters into query parameters

use crate::types::{PersonFilters, ProductFilters};
use std::fmt::Display;

/// Ordered list of query parameters.
///
/// Absent values and empty strings are never added; numbers are always
/// added, including zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text parameter unless it is missing or empty
    pub fn text(mut self, key: &'static str, value: Option<&str>) -> Self {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    /// Add a scalar parameter unless it is missing
    pub fn value<V: Display>(mut self, key: &'static str, value: Option<V>) -> Self {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
        self
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// URL-encoded form, e.g. `search=Juan&page=1`
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pairs.iter().map(|(k, v)| (*k, v.as_str())))
            .finish()
    }
}

/// Sparse query criteria of a list endpoint
pub trait FilterSet {
    fn to_query(&self) -> QueryParams;
}

impl FilterSet for PersonFilters {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .text("email", self.email.as_deref())
            .text("last_name", self.last_name.as_deref())
            .text("search", self.search.as_deref())
            .text("ordering", self.ordering.as_deref())
            .value("page", self.page)
            .value("page_size", self.page_size)
    }
}

impl FilterSet for ProductFilters {
    fn to_query(&self) -> QueryParams {
        QueryParams::new()
            .text("sku", self.sku.as_deref())
            .value("price_min", self.price_min)
            .value("price_max", self.price_max)
            .text("q", self.q.as_deref())
            .text("ordering", self.ordering.as_deref())
            .value("page", self.page)
            .value("page_size", self.page_size)
    }
}
