pub mod format;

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use crate::catalog::{CatalogFilter, Location, Product, StoreError};
use crate::core::types::{SearchResponse, SearchResult};
use crate::AppState;

/// At most this many locations, followed by at most this many products.
pub const LOCATION_LIMIT: usize = 4;
pub const PRODUCT_LIMIT: usize = 3;

/// Hard cap on the combined result list, enforced at assembly time even
/// though the per-collection limits already sum to it.
pub const RESULT_CAP: usize = 7;

/// Trimmed queries shorter than this are treated as absent.
pub const MIN_QUERY_LEN: usize = 2;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Either store call failed; no partial results are ever returned.
    #[error("search unavailable: {0}")]
    Unavailable(#[from] StoreError),
}

/// Execute a catalog search.
///
/// A trimmed query shorter than [`MIN_QUERY_LEN`], like a query with no
/// matches at all, yields the unfiltered default set instead of an empty
/// list. The fallback is a designed success path, not an error.
pub async fn search_catalog(
    state: &Arc<AppState>,
    raw_query: &str,
) -> Result<SearchResponse, SearchError> {
    let query = raw_query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return default_set(state).await;
    }

    let cache_key = query.to_lowercase();
    if let Some(cache) = &state.search_cache {
        if let Some(cached) = cache.get(&cache_key).await {
            debug!("search cache hit");
            return Ok(cached);
        }
    }

    let filter = CatalogFilter::name_contains(query);
    let (locations, products) = tokio::try_join!(
        state.locations.find_active(&filter, LOCATION_LIMIT),
        state.products.find_active(&filter, PRODUCT_LIMIT),
    )?;

    let response = if locations.is_empty() && products.is_empty() {
        debug!("no matches for query, returning default set");
        default_set(state).await?
    } else {
        assemble(&locations, &products)
    };

    if let Some(cache) = &state.search_cache {
        cache.insert(cache_key, response.clone()).await;
    }
    Ok(response)
}

/// The unfiltered fallback: first locations and products in the stores'
/// natural order.
async fn default_set(state: &Arc<AppState>) -> Result<SearchResponse, SearchError> {
    let filter = CatalogFilter::default();
    let (locations, products) = tokio::try_join!(
        state.locations.find_active(&filter, LOCATION_LIMIT),
        state.products.find_active(&filter, PRODUCT_LIMIT),
    )?;
    Ok(assemble(&locations, &products))
}

/// Locations first, then products, truncated to [`RESULT_CAP`]. The
/// sublists are kept as the stores returned them; only the combined list
/// is truncated.
fn assemble(locations: &[Location], products: &[Product]) -> SearchResponse {
    let places: Vec<SearchResult> = locations.iter().map(format::location_result).collect();
    let product_results: Vec<SearchResult> = products.iter().map(format::product_result).collect();

    let mut results: Vec<SearchResult> = places
        .iter()
        .chain(product_results.iter())
        .cloned()
        .collect();
    results.truncate(RESULT_CAP);
    let total = results.len();

    SearchResponse {
        places,
        products: product_results,
        results,
        total,
    }
}
