use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

fn default_true() -> bool {
    true
}

fn default_currency() -> String {
    "USD".to_string()
}

/// A destination entry in the catalog. Field casing matches the upstream
/// document format, so the same records round-trip through the seed file,
/// the remote catalog API, and our own browse endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Region line shown under the name, e.g. "Los Angeles, California".
    pub location: String,
    pub hero_image: String,
    #[serde(default)]
    pub gallery: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub rating: Option<f32>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

/// A merchandise entry in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub long_description: Option<String>,
    pub price: f64,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub images: Vec<String>,
    pub category: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default = "default_true")]
    pub in_stock: bool,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}
