use std::path::Path;

use async_trait::async_trait;
use serde::Deserialize;

use super::types::{Location, Product};
use super::{contains_ci, CatalogFilter, LocationStore, ProductStore, StoreError};

/// In-memory catalog, seeded once at startup and read-only afterwards.
/// The default backend, and the backend every test runs against.
pub struct MemoryCatalog {
    locations: Vec<Location>,
    products: Vec<Product>,
}

#[derive(Deserialize)]
struct SeedFile {
    #[serde(default)]
    places: Vec<Location>,
    #[serde(default)]
    products: Vec<Product>,
}

impl MemoryCatalog {
    /// Records are held creation-descending, the catalog's natural order.
    pub fn new(mut locations: Vec<Location>, mut products: Vec<Product>) -> Self {
        locations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        products.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Self {
            locations,
            products,
        }
    }

    pub fn empty() -> Self {
        Self {
            locations: Vec::new(),
            products: Vec::new(),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let contents = std::fs::read_to_string(path)?;
        let seed: SeedFile = serde_json::from_str(&contents)
            .map_err(|e| StoreError::BadPayload(e.to_string()))?;
        Ok(Self::new(seed.places, seed.products))
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }

    pub fn product_count(&self) -> usize {
        self.products.len()
    }

    fn filtered_locations<'a>(
        &'a self,
        filter: &'a CatalogFilter,
    ) -> impl Iterator<Item = &'a Location> {
        self.locations.iter().filter(move |loc| {
            loc.is_active
                && filter
                    .name_contains
                    .as_deref()
                    .is_none_or(|q| contains_ci(&loc.name, q))
                && filter
                    .category
                    .as_deref()
                    .is_none_or(|c| loc.category == c)
        })
    }

    fn filtered_products<'a>(
        &'a self,
        filter: &'a CatalogFilter,
    ) -> impl Iterator<Item = &'a Product> {
        self.products.iter().filter(move |product| {
            product.is_active
                && filter
                    .name_contains
                    .as_deref()
                    .is_none_or(|q| contains_ci(&product.name, q))
                && filter
                    .category
                    .as_deref()
                    .is_none_or(|c| product.category == c)
                && filter.in_stock.is_none_or(|wanted| product.in_stock == wanted)
        })
    }
}

#[async_trait]
impl LocationStore for MemoryCatalog {
    async fn find_active(
        &self,
        filter: &CatalogFilter,
        limit: usize,
    ) -> Result<Vec<Location>, StoreError> {
        Ok(self.filtered_locations(filter).take(limit).cloned().collect())
    }

    async fn list_active(
        &self,
        filter: &CatalogFilter,
        page: usize,
        per_page: usize,
    ) -> Result<(Vec<Location>, usize), StoreError> {
        let total = self.filtered_locations(filter).count();
        let page = page.max(1);
        let items = self
            .filtered_locations(filter)
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn get(&self, id: &str) -> Result<Option<Location>, StoreError> {
        Ok(self.locations.iter().find(|loc| loc.id == id).cloned())
    }
}

#[async_trait]
impl ProductStore for MemoryCatalog {
    async fn find_active(
        &self,
        filter: &CatalogFilter,
        limit: usize,
    ) -> Result<Vec<Product>, StoreError> {
        Ok(self.filtered_products(filter).take(limit).cloned().collect())
    }

    async fn list_active(
        &self,
        filter: &CatalogFilter,
        page: usize,
        per_page: usize,
    ) -> Result<(Vec<Product>, usize), StoreError> {
        let total = self.filtered_products(filter).count();
        let page = page.max(1);
        let items = self
            .filtered_products(filter)
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();
        Ok((items, total))
    }

    async fn get(&self, id: &str) -> Result<Option<Product>, StoreError> {
        Ok(self.products.iter().find(|product| product.id == id).cloned())
    }
}
