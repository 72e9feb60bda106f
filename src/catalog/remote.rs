use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use super::types::{Location, Product};
use super::{CatalogFilter, LocationStore, ProductStore, StoreError};

/// Catalog backed by an upstream HTTP API. One request per store call,
/// bounded by a per-call deadline; failures map straight onto
/// `StoreError` with no retries at this layer.
pub struct RemoteCatalog {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

#[derive(Deserialize)]
struct UpstreamPagination {
    #[serde(default)]
    total: usize,
}

#[derive(Deserialize)]
struct LocationsEnvelope {
    #[serde(default)]
    places: Vec<Location>,
    #[serde(default)]
    pagination: Option<UpstreamPagination>,
}

#[derive(Deserialize)]
struct ProductsEnvelope {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    pagination: Option<UpstreamPagination>,
}

impl RemoteCatalog {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client,
            base_url,
            timeout,
        }
    }

    fn query_params(
        filter: &CatalogFilter,
        page: usize,
        per_page: usize,
    ) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page", page.to_string()),
            ("limit", per_page.to_string()),
        ];
        if let Some(q) = filter.name_contains.as_deref() {
            params.push(("q", q.to_string()));
        }
        if let Some(category) = filter.category.as_deref() {
            params.push(("category", category.to_string()));
        }
        if let Some(in_stock) = filter.in_stock {
            params.push(("inStock", in_stock.to_string()));
        }
        params
    }

    async fn fetch_envelope<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, StoreError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("remote catalog request: {} {:?}", url, params);

        let fut = self.client.get(&url).query(params).send();
        let response = tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unreachable(format!(
                "upstream returned {status} for /{path}"
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| StoreError::BadPayload(e.to_string()))
    }

    async fn fetch_one<T: DeserializeOwned>(&self, path: &str) -> Result<Option<T>, StoreError> {
        let url = format!("{}/{}", self.base_url, path);

        let fut = self.client.get(&url).send();
        let response = tokio::time::timeout(self.timeout, fut)
            .await
            .map_err(|_| StoreError::Timeout(self.timeout.as_millis() as u64))?
            .map_err(|e| StoreError::Unreachable(e.to_string()))?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unreachable(format!(
                "upstream returned {status} for /{path}"
            )));
        }

        response
            .json::<T>()
            .await
            .map(Some)
            .map_err(|e| StoreError::BadPayload(e.to_string()))
    }
}

#[async_trait]
impl LocationStore for RemoteCatalog {
    async fn find_active(
        &self,
        filter: &CatalogFilter,
        limit: usize,
    ) -> Result<Vec<Location>, StoreError> {
        let params = Self::query_params(filter, 1, limit);
        let envelope: LocationsEnvelope = self.fetch_envelope("places", &params).await?;
        Ok(envelope.places)
    }

    async fn list_active(
        &self,
        filter: &CatalogFilter,
        page: usize,
        per_page: usize,
    ) -> Result<(Vec<Location>, usize), StoreError> {
        let params = Self::query_params(filter, page, per_page);
        let envelope: LocationsEnvelope = self.fetch_envelope("places", &params).await?;
        let total = envelope
            .pagination
            .map(|p| p.total)
            .unwrap_or(envelope.places.len());
        Ok((envelope.places, total))
    }

    async fn get(&self, id: &str) -> Result<Option<Location>, StoreError> {
        self.fetch_one(&format!("places/{id}")).await
    }
}

#[async_trait]
impl ProductStore for RemoteCatalog {
    async fn find_active(
        &self,
        filter: &CatalogFilter,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError> {
        let params = Self::query_params(filter, 1, limit);
        let envelope: ProductsEnvelope = self.fetch_envelope("products", &params).await?;
        Ok(envelope.products)
    }

    async fn list_active(
        &self,
        filter: &CatalogFilter,
        page: usize,
        per_page: usize,
    ) -> Result<(Vec<Product>, usize), StoreError> {
        let params = Self::query_params(filter, page, per_page);
        let envelope: ProductsEnvelope = self.fetch_envelope("products", &params).await?;
        let total = envelope
            .pagination
            .map(|p| p.total)
            .unwrap_or(envelope.products.len());
        Ok((envelope.products, total))
    }

    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        self.fetch_one(&format!("products/{id}")).await
    }
}
