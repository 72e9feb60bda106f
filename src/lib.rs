pub mod catalog;
pub mod core;
pub mod http;
pub mod search;

// --- Primary core exports ---
pub use crate::core::types;
pub use crate::core::types::*;
pub use crate::core::AppState;

pub use crate::catalog::{CatalogFilter, Location, LocationStore, Product, ProductStore, StoreError};
pub use crate::search::SearchError;
