//! Projection of catalog records into search results.

use crate::catalog::{Location, Product};
use crate::core::types::{ResultKind, SearchResult};

/// Shown when a product has no images of its own.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder-image.jpg";

pub fn location_result(location: &Location) -> SearchResult {
    SearchResult {
        id: location.id.clone(),
        name: location.name.clone(),
        kind: ResultKind::Location,
        image: location.hero_image.clone(),
        description: location.location.clone(),
        url: format!("/pages/lugares/{}", location.id),
    }
}

pub fn product_result(product: &Product) -> SearchResult {
    let image = product
        .images
        .first()
        .cloned()
        .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string());
    let description = if product.description.is_empty() {
        format_price(product)
    } else {
        product.description.clone()
    };

    SearchResult {
        id: product.id.clone(),
        name: product.name.clone(),
        kind: ResultKind::Product,
        image,
        description,
        url: format!("/pages/shop/{}", product.id),
    }
}

/// Display price, e.g. `"USD 25"`.
pub fn format_price(product: &Product) -> String {
    format!("{} {}", product.currency, product.price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn product(description: &str, images: Vec<String>) -> Product {
        Product {
            id: "hat-hiking".into(),
            name: "Sombrero Hiking".into(),
            description: description.into(),
            long_description: None,
            price: 25.0,
            currency: "USD".into(),
            images,
            category: "apparel".into(),
            quantity: 3,
            in_stock: true,
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn location_projects_region_and_hero_image() {
        let location = Location {
            id: "angels-flight".into(),
            name: "Angels Flight".into(),
            description: "A historic funicular downtown".into(),
            location: "Los Angeles, California".into(),
            hero_image: "/angels-flight.png".into(),
            gallery: Vec::new(),
            category: "landmark".into(),
            rating: Some(4.5),
            is_active: true,
            created_at: Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap(),
        };

        let result = location_result(&location);
        assert_eq!(result.kind, ResultKind::Location);
        assert_eq!(result.description, "Los Angeles, California");
        assert_eq!(result.image, "/angels-flight.png");
        assert_eq!(result.url, "/pages/lugares/angels-flight");
    }

    #[test]
    fn product_keeps_its_own_description_and_first_image() {
        let result = product_result(&product(
            "Sombrero protector para el sol",
            vec!["/hat-1.png".into(), "/hat-2.png".into()],
        ));
        assert_eq!(result.kind, ResultKind::Product);
        assert_eq!(result.description, "Sombrero protector para el sol");
        assert_eq!(result.image, "/hat-1.png");
        assert_eq!(result.url, "/pages/shop/hat-hiking");
    }

    #[test]
    fn empty_description_falls_back_to_formatted_price() {
        let result = product_result(&product("", vec!["/hat-1.png".into()]));
        assert_eq!(result.description, "USD 25");
    }

    #[test]
    fn missing_images_fall_back_to_placeholder() {
        let result = product_result(&product("desc", Vec::new()));
        assert_eq!(result.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn fractional_prices_keep_their_cents() {
        let mut p = product("", Vec::new());
        p.price = 19.99;
        assert_eq!(format_price(&p), "USD 19.99");
    }
}
