use serde::{Deserialize, Serialize};

use crate::catalog::{Location, Product};

/// Which collection a search result came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultKind {
    Location,
    Product,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: String,
    pub name: String,
    pub kind: ResultKind,
    pub image: String,
    pub description: String,
    pub url: String,
}

/// The capped, ordered result set. `results` is the combined list after
/// the final truncation; `places` and `products` are its constituent
/// sublists before the merge, kept separately for caller convenience.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub places: Vec<SearchResult>,
    pub products: Vec<SearchResult>,
    pub results: Vec<SearchResult>,
    pub total: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: usize,
    pub limit: usize,
    pub total: usize,
    pub pages: usize,
}

impl Pagination {
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        let pages = if limit == 0 { 0 } else { total.div_ceil(limit) };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LocationsResponse {
    pub places: Vec<Location>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ProductsResponse {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}
