use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use thiserror::Error;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{debug, error};

use crate::catalog::{CatalogFilter, Location, Product};
use crate::core::types::{
    ErrorResponse, LocationsResponse, Pagination, ProductsResponse, SearchResponse,
};
use crate::search::{self, RESULT_CAP};
use crate::AppState;

/// Browse endpoints default to this page size.
const DEFAULT_PAGE_SIZE: usize = 10;

/// What a failed request looks like on the wire. Messages stay generic;
/// the underlying store error is logged, never sent to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Failed to search")]
    SearchFailed,

    #[error("Failed to fetch places")]
    PlacesFailed,

    #[error("Failed to fetch products")]
    ProductsFailed,

    #[error("Place not found")]
    PlaceNotFound,

    #[error("Product not found")]
    ProductNotFound,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::PlaceNotFound | ApiError::ProductNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .route("/search", get(search_handler))
        .route("/places", get(list_places_handler))
        .route("/places/{id}", get(get_place_handler))
        .route("/products", get(list_products_handler))
        .route("/products/{id}", get(get_product_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "mirador",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub limit: Option<usize>,
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    // The cap is fixed; a caller-supplied limit is accepted but ignored.
    if let Some(limit) = params.limit {
        debug!("ignoring client-requested limit {limit}, cap stays at {RESULT_CAP}");
    }

    let query = params.q.unwrap_or_default();
    match search::search_catalog(&state, &query).await {
        Ok(response) => Ok(Json(response)),
        Err(e) => {
            error!("Search error: {e}");
            Err(ApiError::SearchFailed)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "inStock")]
    pub in_stock: Option<bool>,
    #[serde(default)]
    pub page: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl ListParams {
    fn filter(&self) -> CatalogFilter {
        CatalogFilter {
            name_contains: self.q.clone().filter(|q| !q.trim().is_empty()),
            category: self.category.clone(),
            // Matches the source behavior: only `inStock=true` filters.
            in_stock: self.in_stock.filter(|v| *v),
        }
    }

    fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    fn page_size(&self) -> usize {
        self.limit.unwrap_or(DEFAULT_PAGE_SIZE).max(1)
    }
}

async fn list_places_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<LocationsResponse>, ApiError> {
    let (page, limit) = (params.page(), params.page_size());
    let (places, total) = state
        .locations
        .list_active(&params.filter(), page, limit)
        .await
        .map_err(|e| {
            error!("Place listing error: {e}");
            ApiError::PlacesFailed
        })?;

    Ok(Json(LocationsResponse {
        places,
        pagination: Pagination::new(page, limit, total),
    }))
}

async fn get_place_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Location>, ApiError> {
    let place = state.locations.get(&id).await.map_err(|e| {
        error!("Place fetch error: {e}");
        ApiError::PlacesFailed
    })?;
    place.map(Json).ok_or(ApiError::PlaceNotFound)
}

async fn list_products_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let (page, limit) = (params.page(), params.page_size());
    let (products, total) = state
        .products
        .list_active(&params.filter(), page, limit)
        .await
        .map_err(|e| {
            error!("Product listing error: {e}");
            ApiError::ProductsFailed
        })?;

    Ok(Json(ProductsResponse {
        products,
        pagination: Pagination::new(page, limit, total),
    }))
}

async fn get_product_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state.products.get(&id).await.map_err(|e| {
        error!("Product fetch error: {e}");
        ApiError::ProductsFailed
    })?;
    product.map(Json).ok_or(ApiError::ProductNotFound)
}
