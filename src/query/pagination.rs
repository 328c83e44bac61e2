//! # Pagination
//!
//! Page/limit resolution and next/prev link derivation.
//!
//! Raw `page` and `limit` values never fail: anything that is not a positive
//! integer falls back to the default.

use serde::{Deserialize, Serialize};

/// Default page when `page` is missing or unusable
pub const DEFAULT_PAGE: usize = 1;

/// Default page size when `limit` is missing or unusable
pub const DEFAULT_LIMIT: usize = 25;

/// Upper bound applied to `limit`
pub const MAX_LIMIT: usize = 1000;

/// Which documents the pagination total counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TotalScope {
    /// Documents matching the active filter predicate
    #[default]
    Filtered,

    /// Every document in the collection, regardless of filters
    Collection,
}

/// Pagination settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationConfig {
    #[serde(default = "default_limit")]
    pub default_limit: usize,

    #[serde(default = "max_limit")]
    pub max_limit: usize,

    #[serde(default)]
    pub total_scope: TotalScope,
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

fn max_limit() -> usize {
    MAX_LIMIT
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: max_limit(),
            total_scope: TotalScope::default(),
        }
    }
}

/// Resolved page request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    pub fn new(page: usize, limit: usize) -> Self {
        Self { page, limit }
    }

    /// Resolve raw `page`/`limit` parameters against the configuration
    pub fn resolve(page: Option<&str>, limit: Option<&str>, config: &PaginationConfig) -> Self {
        let page = page.and_then(positive_int).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .and_then(positive_int)
            .unwrap_or(config.default_limit)
            .min(config.max_limit.max(1));

        Self { page, limit }
    }

    /// Index of the first document on this page
    pub fn start_index(&self) -> usize {
        (self.page - 1).saturating_mul(self.limit)
    }

    /// Index one past the last document on this page
    pub fn end_index(&self) -> usize {
        self.page.saturating_mul(self.limit)
    }
}

fn positive_int(raw: &str) -> Option<usize> {
    raw.trim().parse::<usize>().ok().filter(|n| *n > 0)
}

/// Link to an adjacent page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLink {
    pub page: usize,
    pub limit: usize,
}

/// Next/prev links of a result envelope
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationLinks {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<PageLink>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<PageLink>,
}

/// Pagination state for one request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page: usize,
    pub limit: usize,
    pub start_index: usize,
    pub end_index: usize,
    pub total: usize,
}

impl PaginationState {
    pub fn new(request: PageRequest, total: usize) -> Self {
        Self {
            page: request.page,
            limit: request.limit,
            start_index: request.start_index(),
            end_index: request.end_index(),
            total,
        }
    }

    /// `next` iff more documents follow this page, `prev` iff this page
    /// does not start at the first document
    pub fn links(&self) -> PaginationLinks {
        let next = (self.end_index < self.total).then(|| PageLink {
            page: self.page + 1,
            limit: self.limit,
        });
        let prev = (self.start_index > 0).then(|| PageLink {
            page: self.page - 1,
            limit: self.limit,
        });

        PaginationLinks { next, prev }
    }
}
