//! Paginated list envelope and the query that requests it.

use serde::{Deserialize, Serialize};

/// One page of a listing, as echoed by the backend.
///
/// `total_pages` is computed by the backend and trusted as returned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paginated<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

/// Query for `GET /patients`.
///
/// Absent fields are not sent at all. A zero page/limit or an empty search string
/// counts as absent.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PatientQuery {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
}

impl PatientQuery {
    pub fn new(page: Option<u32>, limit: Option<u32>, search: Option<String>) -> Self {
        Self {
            page,
            limit,
            search,
        }
    }

    /// Query-string pairs to send, in `page`, `limit`, `search` order.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(3);
        if let Some(page) = self.page.filter(|p| *p > 0) {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit.filter(|l| *l > 0) {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search", search.to_owned()));
        }
        pairs
    }
}
