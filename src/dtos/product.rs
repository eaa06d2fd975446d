// src/dtos/product.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::health::HealthRating;
use crate::models::product::{Product, ProductDraft, ProductStatus};

#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    #[serde(flatten)]
    pub product: ProductDraft,
    /// Admins may save an unpublished draft; ignored for contributors.
    pub is_published: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProductRequest {
    #[serde(flatten)]
    pub product: ProductDraft,
    pub is_published: Option<bool>,
    pub requires_approval: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub barcode: Option<String>,
    pub ingredients: Vec<String>,
    pub health_score: i32,
    pub health_rating: HealthRating,
    pub nutrition_data: Option<serde_json::Value>,
    pub allergens: Vec<String>,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_dairy_free: bool,
    pub is_organic: bool,
    pub is_published: bool,
    pub requires_approval: bool,
    pub status: ProductStatus,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub tags: Vec<String>,
    pub serving_size: Option<String>,
    pub calories_per_serving: Option<f64>,
    pub user_submitted: bool,
    pub submitted_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Convert from Model to Response DTO
impl From<&Product> for ProductResponse {
    fn from(product: &Product) -> Self {
        let health = product.health();
        Self {
            id: product.id,
            name: product.name.clone(),
            brand: product.brand.clone(),
            description: product.description.clone(),
            image_url: product.image_url.clone(),
            barcode: product.barcode.clone(),
            ingredients: product.ingredient_list().map(str::to_string).collect(),
            health_score: health.value(),
            health_rating: health.rating(),
            nutrition_data: product.nutrition_data.clone(),
            allergens: product.allergens.clone(),
            is_vegetarian: product.is_vegetarian,
            is_vegan: product.is_vegan,
            is_gluten_free: product.is_gluten_free,
            is_dairy_free: product.is_dairy_free,
            is_organic: product.is_organic,
            is_published: product.is_published,
            requires_approval: product.requires_approval,
            status: product.status(),
            category: product.category.clone(),
            subcategory: product.subcategory.clone(),
            tags: product.tags.clone(),
            serving_size: product.serving_size.clone(),
            calories_per_serving: product.calories_per_serving,
            user_submitted: product.user_submitted,
            submitted_by: product.submitted_by.clone(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self::from(&product)
    }
}

pub fn to_responses<'a>(products: impl IntoIterator<Item = &'a Product>) -> Vec<ProductResponse> {
    products.into_iter().map(ProductResponse::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::product::fixtures::product;

    #[test]
    fn response_splits_ingredients_and_rates_health() {
        let mut p = product(5, "Tropicana Orange Juice");
        p.ingredients = Some("Orange Juice Concentrate, Water, Sugar".into());
        p.health_score = 75;

        let response = ProductResponse::from(&p);
        assert_eq!(response.ingredients, ["Orange Juice Concentrate", "Water", "Sugar"]);
        assert_eq!(response.health_rating, HealthRating::Good);
        assert_eq!(response.status, ProductStatus::Published);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["health_rating"], "good");
        assert_eq!(json["status"], "published");
    }

    #[test]
    fn timestamps_match_other_responses() {
        let p = product(6, "Quaker Oats");
        let response = ProductResponse::from(&p);
        assert_eq!(response.created_at, p.created_at);

        // Same wire format chrono gives every DateTime<Utc> field
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["updated_at"], serde_json::to_value(p.updated_at).unwrap());
    }

    #[test]
    fn update_request_flattens_draft() {
        let req: UpdateProductRequest =
            serde_json::from_str(r#"{"health_score": 120, "is_published": true}"#).unwrap();
        assert_eq!(req.product.health_score, Some(120));
        assert_eq!(req.is_published, Some(true));
        assert_eq!(req.requires_approval, None);
    }
}
