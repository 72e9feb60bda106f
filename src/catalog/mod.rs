pub mod memory;
pub mod remote;
pub mod types;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::MemoryCatalog;
pub use remote::RemoteCatalog;
pub use types::{Location, Product};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("catalog upstream unreachable: {0}")]
    Unreachable(String),

    #[error("catalog upstream timed out after {0}ms")]
    Timeout(u64),

    #[error("catalog payload could not be decoded: {0}")]
    BadPayload(String),

    #[error("catalog io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filter applied by the stores before any limit is taken. Every field is
/// explicitly optional and the value is built once per call. Queries are
/// matched as literal text, never compiled into a pattern.
#[derive(Debug, Default, Clone)]
pub struct CatalogFilter {
    pub name_contains: Option<String>,
    pub category: Option<String>,
    pub in_stock: Option<bool>,
}

impl CatalogFilter {
    pub fn name_contains(query: &str) -> Self {
        Self {
            name_contains: Some(query.to_string()),
            ..Self::default()
        }
    }
}

/// Case-insensitive literal substring match. An empty needle matches
/// everything, mirroring an absent filter.
pub(crate) fn contains_ci(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
pub trait LocationStore: Send + Sync {
    /// Active locations matching `filter`, capped at `limit`, in the
    /// store's natural (creation-descending) order.
    async fn find_active(
        &self,
        filter: &CatalogFilter,
        limit: usize,
    ) -> Result<Vec<Location>, StoreError>;

    /// One page of active locations plus the total match count.
    async fn list_active(
        &self,
        filter: &CatalogFilter,
        page: usize,
        per_page: usize,
    ) -> Result<(Vec<Location>, usize), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Location>, StoreError>;
}

#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn find_active(
        &self,
        filter: &CatalogFilter,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError>;

    async fn list_active(
        &self,
        filter: &CatalogFilter,
        page: usize,
        per_page: usize,
    ) -> Result<(Vec<Product>, usize), StoreError>;

    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError>;
}
