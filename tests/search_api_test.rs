//! Endpoint-level tests for `GET /search`, driven through the real router
//! against the bundled seed catalog.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use mirador::catalog::{
    CatalogFilter, Location, LocationStore, MemoryCatalog, Product, ProductStore, StoreError,
};
use mirador::http::build_router;
use mirador::AppState;

fn seeded_state() -> Arc<AppState> {
    let catalog =
        Arc::new(MemoryCatalog::load("seed/catalog.json").expect("seed catalog should load"));
    Arc::new(AppState::new(catalog.clone(), catalog))
}

async fn get_json(state: Arc<AppState>, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = build_router(state)
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn result_ids(body: &serde_json::Value) -> Vec<String> {
    body["results"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn empty_query_returns_the_default_set() {
    let (status, body) = get_json(seeded_state(), "/search?q=").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["places"].as_array().unwrap().len(), 4);
    assert_eq!(body["products"].as_array().unwrap().len(), 3);
    assert_eq!(body["total"], 7);
    // Repository order: newest records first.
    assert_eq!(body["places"][0]["id"], "red-rock");
    assert_eq!(body["products"][0]["id"], "poster-angels-flight");
}

#[tokio::test]
async fn single_character_query_is_treated_as_absent() {
    let state = seeded_state();
    let (_, short) = get_json(state.clone(), "/search?q=a").await;
    let (_, empty) = get_json(state, "/search?q=").await;
    assert_eq!(result_ids(&short), result_ids(&empty));
}

#[tokio::test]
async fn query_matching_one_location_yields_total_one() {
    let (status, body) = get_json(seeded_state(), "/search?q=gaylord").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["places"].as_array().unwrap().len(), 1);
    assert!(body["products"].as_array().unwrap().is_empty());
    assert_eq!(body["total"], 1);
    assert_eq!(body["results"][0]["name"], "Gaylord Resort");
    assert_eq!(body["results"][0]["kind"], "location");
    assert_eq!(body["results"][0]["url"], "/pages/lugares/gaylord-resort");
}

#[tokio::test]
async fn zero_matches_fall_back_to_the_default_set() {
    let state = seeded_state();
    let (status, body) = get_json(state.clone(), "/search?q=zzzznomatch").await;
    let (_, default) = get_json(state, "/search?q=").await;

    assert_eq!(status, StatusCode::OK);
    assert!(!result_ids(&body).is_empty());
    assert_eq!(result_ids(&body), result_ids(&default));
}

#[tokio::test]
async fn empty_product_description_is_replaced_with_the_price() {
    let (_, body) = get_json(seeded_state(), "/search?q=sombrero").await;
    assert_eq!(body["products"][0]["description"], "USD 25");
}

#[tokio::test]
async fn matches_span_both_collections_places_first() {
    // "angels" hits the Angels Flight place and the poster product.
    let (_, body) = get_json(seeded_state(), "/search?q=angels").await;

    assert_eq!(body["total"], 2);
    assert_eq!(body["results"][0]["kind"], "location");
    assert_eq!(body["results"][1]["kind"], "product");
}

#[tokio::test]
async fn caller_supplied_limit_is_ignored() {
    let state = seeded_state();
    let (_, capped) = get_json(state.clone(), "/search?q=&limit=100").await;
    let (_, plain) = get_json(state, "/search?q=").await;
    assert_eq!(result_ids(&capped), result_ids(&plain));
    assert!(capped["results"].as_array().unwrap().len() <= 7);
}

#[tokio::test]
async fn regex_metacharacters_never_error() {
    let state = seeded_state();
    for q in [".%2A", "%5Bangels%5D", "%28flight", "a%2B%2B"] {
        let (status, _) = get_json(state.clone(), &format!("/search?q={q}")).await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn every_result_carries_a_kind_and_url() {
    let state = seeded_state();
    for q in ["", "hiking", "angels", "zzzznomatch"] {
        let (_, body) = get_json(state.clone(), &format!("/search?q={q}")).await;
        for result in body["results"].as_array().unwrap() {
            let kind = result["kind"].as_str().unwrap();
            assert!(kind == "location" || kind == "product");
            assert!(!result["url"].as_str().unwrap().is_empty());
        }
    }
}

/// A store whose every call fails, standing in for unreachable storage.
struct FailingStore;

#[async_trait]
impl LocationStore for FailingStore {
    async fn find_active(
        &self,
        _filter: &CatalogFilter,
        _limit: usize,
    ) -> Result<Vec<Location>, StoreError> {
        Err(StoreError::Unreachable("connection refused".into()))
    }

    async fn list_active(
        &self,
        _filter: &CatalogFilter,
        _page: usize,
        _per_page: usize,
    ) -> Result<(Vec<Location>, usize), StoreError> {
        Err(StoreError::Unreachable("connection refused".into()))
    }

    async fn get(&self, _id: &str) -> Result<Option<Location>, StoreError> {
        Err(StoreError::Unreachable("connection refused".into()))
    }
}

#[async_trait]
impl ProductStore for FailingStore {
    async fn find_active(
        &self,
        _filter: &CatalogFilter,
        _limit: usize,
    ) -> Result<Vec<Product>, StoreError> {
        Err(StoreError::Unreachable("connection refused".into()))
    }

    async fn list_active(
        &self,
        _filter: &CatalogFilter,
        _page: usize,
        _per_page: usize,
    ) -> Result<(Vec<Product>, usize), StoreError> {
        Err(StoreError::Unreachable("connection refused".into()))
    }

    async fn get(&self, _id: &str) -> Result<Option<Product>, StoreError> {
        Err(StoreError::Unreachable("connection refused".into()))
    }
}

#[tokio::test]
async fn store_failure_surfaces_as_a_generic_500() {
    let store = Arc::new(FailingStore);
    let state = Arc::new(AppState::new(store.clone(), store));
    let (status, body) = get_json(state, "/search?q=angels").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    // Generic message only; no storage detail leaks to the client.
    assert_eq!(body["error"], "Failed to search");
}
