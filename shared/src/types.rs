//! Common types used across the ledger

use serde::{Deserialize, Serialize};

/// Largest page any list endpoint returns
pub const MAX_PAGE_SIZE: i64 = 500;

/// Limit/offset window for list queries
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl ListQuery {
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: Some(limit),
            offset: Some(offset),
        }
    }

    /// Effective limit: non-positive or missing values fall back to `default`, large ones are capped
    pub fn limit_or(&self, default: i64) -> i64 {
        match self.limit {
            Some(limit) if limit > 0 => limit.min(MAX_PAGE_SIZE),
            _ => default,
        }
    }

    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }
}

/// A page of results together with the unpaged total
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let query = ListQuery::default();
        assert_eq!(query.limit_or(50), 50);
        assert_eq!(query.offset(), 0);
    }

    #[test]
    fn test_list_query_clamps() {
        assert_eq!(ListQuery::new(0, -5).limit_or(10), 10);
        assert_eq!(ListQuery::new(-1, 0).limit_or(10), 10);
        assert_eq!(ListQuery::new(10_000, 0).limit_or(10), MAX_PAGE_SIZE);
        assert_eq!(ListQuery::new(20, -5).offset(), 0);
        assert_eq!(ListQuery::new(20, 40).offset(), 40);
    }
}
