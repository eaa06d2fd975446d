use serde::{Deserialize, Deserializer, Serialize};
use sqlx::{FromRow, PgExecutor};
use chrono::{DateTime, Utc};

use crate::catalog::health::HealthScore;
use crate::error::AppError;
use crate::middleware::auth::AuthContext;

pub const PRODUCT_COLUMNS: &str = "id, name, brand, description, image_url, barcode, ingredients,
    health_score, nutrition_data, allergens, is_vegetarian, is_vegan, is_gluten_free,
    is_dairy_free, is_organic, is_published, requires_approval, category, subcategory, tags,
    serving_size, calories_per_serving, user_submitted, submitted_by, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub barcode: Option<String>,
    pub ingredients: Option<String>,
    pub health_score: i32,
    pub nutrition_data: Option<serde_json::Value>,
    pub allergens: Vec<String>,
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_gluten_free: bool,
    pub is_dairy_free: bool,
    pub is_organic: bool,
    pub is_published: bool,
    pub requires_approval: bool,
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

/// Where a product sits in the publishing workflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    Published,
    Pending,
    Draft,
}

impl Product {
    pub fn health(&self) -> HealthScore {
        HealthScore::clamped(self.health_score as i64)
    }

    pub fn ingredient_list(&self) -> impl Iterator<Item = &str> {
        self.ingredients
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|i| !i.is_empty())
    }

    pub fn status(&self) -> ProductStatus {
        if self.is_published {
            ProductStatus::Published
        } else if self.requires_approval || self.user_submitted {
            ProductStatus::Pending
        } else {
            ProductStatus::Draft
        }
    }
}

/// Every product field as optional; used for creates, partial updates and submission payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductDraft {
    pub name: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub barcode: Option<String>,
    pub ingredients: Option<String>,
    #[serde(deserialize_with = "deserialize_score")]
    pub health_score: Option<i64>,
    pub nutrition_data: Option<serde_json::Value>,
    pub allergens: Option<Vec<String>>,
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub is_dairy_free: Option<bool>,
    pub is_organic: Option<bool>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub tags: Option<Vec<String>>,
    pub serving_size: Option<String>,
    pub calories_per_serving: Option<f64>,
}

impl ProductDraft {
    /// Fields set in `overrides` win.
    pub fn merge(self, overrides: ProductDraft) -> ProductDraft {
        ProductDraft {
            name: overrides.name.or(self.name),
            brand: overrides.brand.or(self.brand),
            description: overrides.description.or(self.description),
            image_url: overrides.image_url.or(self.image_url),
            barcode: overrides.barcode.or(self.barcode),
            ingredients: overrides.ingredients.or(self.ingredients),
            health_score: overrides.health_score.or(self.health_score),
            nutrition_data: overrides.nutrition_data.or(self.nutrition_data),
            allergens: overrides.allergens.or(self.allergens),
            is_vegetarian: overrides.is_vegetarian.or(self.is_vegetarian),
            is_vegan: overrides.is_vegan.or(self.is_vegan),
            is_gluten_free: overrides.is_gluten_free.or(self.is_gluten_free),
            is_dairy_free: overrides.is_dairy_free.or(self.is_dairy_free),
            is_organic: overrides.is_organic.or(self.is_organic),
            category: overrides.category.or(self.category),
            subcategory: overrides.subcategory.or(self.subcategory),
            tags: overrides.tags.or(self.tags),
            serving_size: overrides.serving_size.or(self.serving_size),
            calories_per_serving: overrides.calories_per_serving.or(self.calories_per_serving),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == ProductDraft::default()
    }

    fn clamped_score(&self) -> Option<i32> {
        self.health_score.map(|s| HealthScore::clamped(s).value())
    }
}

// Fractional scores round to the nearest integer before clamping
fn deserialize_score<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<i64>, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.map(|score| score.round() as i64))
}

/// Publishing flags set on insert.
#[derive(Debug, Clone, Default)]
pub struct Publication {
    pub is_published: bool,
    pub requires_approval: bool,
    pub user_submitted: bool,
    pub submitted_by: Option<String>,
}

impl Publication {
    /// Admins publish directly (unless they ask not to); anyone else queues for approval.
    pub fn for_creator(creator: &AuthContext, is_published: Option<bool>) -> Self {
        if creator.is_admin() {
            Self {
                is_published: is_published.unwrap_or(true),
                ..Self::default()
            }
        } else {
            Self::awaiting_approval(Some(creator.username.clone()))
        }
    }

    pub fn awaiting_approval(submitted_by: Option<String>) -> Self {
        Self {
            is_published: false,
            requires_approval: true,
            user_submitted: true,
            submitted_by,
        }
    }
}

/// Column filters for the public product list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductFilter {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub is_vegan: Option<bool>,
    pub is_vegetarian: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub is_dairy_free: Option<bool>,
    pub is_organic: Option<bool>,
}

impl Product {
    pub async fn fetch_published<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE is_published ORDER BY name, id"
        ))
        .fetch_all(executor)
        .await
    }

    pub async fn fetch_published_filtered<'e, E: PgExecutor<'e>>(
        executor: E,
        filter: &ProductFilter,
    ) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products
             WHERE is_published
               AND ($1::TEXT IS NULL OR category = $1)
               AND ($2::TEXT IS NULL OR brand = $2)
               AND ($3::BOOLEAN IS NULL OR is_vegan = $3)
               AND ($4::BOOLEAN IS NULL OR is_vegetarian = $4)
               AND ($5::BOOLEAN IS NULL OR is_gluten_free = $5)
               AND ($6::BOOLEAN IS NULL OR is_dairy_free = $6)
               AND ($7::BOOLEAN IS NULL OR is_organic = $7)
             ORDER BY name, id"
        ))
        .bind(filter.category.as_deref())
        .bind(filter.brand.as_deref())
        .bind(filter.is_vegan)
        .bind(filter.is_vegetarian)
        .bind(filter.is_gluten_free)
        .bind(filter.is_dairy_free)
        .bind(filter.is_organic)
        .fetch_all(executor)
        .await
    }

    pub async fn fetch_all<'e, E: PgExecutor<'e>>(executor: E) -> Result<Vec<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(executor)
        .await
    }

    pub async fn find<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id)
            .fetch_optional(executor)
            .await
    }

    pub async fn find_published<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1 AND is_published"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        draft: &ProductDraft,
        publication: &Publication,
    ) -> Result<Product, AppError> {
        let name = draft
            .name
            .as_deref()
            .ok_or_else(|| AppError::validation("Product name is required"))?;
        let score = draft.clamped_score().unwrap_or(HealthScore::default().value());

        let product = sqlx::query_as::<_, Product>(&format!(
            "INSERT INTO products (name, brand, description, image_url, barcode, ingredients,
                health_score, nutrition_data, allergens, is_vegetarian, is_vegan, is_gluten_free,
                is_dairy_free, is_organic, is_published, requires_approval, category, subcategory,
                tags, serving_size, calories_per_serving, user_submitted, submitted_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16,
                $17, $18, $19, $20, $21, $22, $23)
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(name)
        .bind(draft.brand.as_deref())
        .bind(draft.description.as_deref())
        .bind(draft.image_url.as_deref())
        .bind(draft.barcode.as_deref())
        .bind(draft.ingredients.as_deref())
        .bind(score)
        .bind(draft.nutrition_data.as_ref())
        .bind(draft.allergens.clone().unwrap_or_default())
        .bind(draft.is_vegetarian.unwrap_or(false))
        .bind(draft.is_vegan.unwrap_or(false))
        .bind(draft.is_gluten_free.unwrap_or(false))
        .bind(draft.is_dairy_free.unwrap_or(false))
        .bind(draft.is_organic.unwrap_or(false))
        .bind(publication.is_published)
        .bind(publication.requires_approval)
        .bind(draft.category.as_deref())
        .bind(draft.subcategory.as_deref())
        .bind(draft.tags.clone().unwrap_or_default())
        .bind(draft.serving_size.as_deref())
        .bind(draft.calories_per_serving)
        .bind(publication.user_submitted)
        .bind(publication.submitted_by.as_deref())
        .fetch_one(executor)
        .await?;

        Ok(product)
    }

    /// Applies the set fields of `draft`; `None` leaves a column untouched.
    pub async fn apply_draft<'e, E: PgExecutor<'e>>(
        executor: E,
        id: i64,
        draft: &ProductDraft,
        is_published: Option<bool>,
        requires_approval: Option<bool>,
    ) -> Result<Option<Product>, sqlx::Error> {
        sqlx::query_as::<_, Product>(&format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                brand = COALESCE($3, brand),
                description = COALESCE($4, description),
                image_url = COALESCE($5, image_url),
                barcode = COALESCE($6, barcode),
                ingredients = COALESCE($7, ingredients),
                health_score = COALESCE($8, health_score),
                nutrition_data = COALESCE($9, nutrition_data),
                allergens = COALESCE($10, allergens),
                is_vegetarian = COALESCE($11, is_vegetarian),
                is_vegan = COALESCE($12, is_vegan),
                is_gluten_free = COALESCE($13, is_gluten_free),
                is_dairy_free = COALESCE($14, is_dairy_free),
                is_organic = COALESCE($15, is_organic),
                category = COALESCE($16, category),
                subcategory = COALESCE($17, subcategory),
                tags = COALESCE($18, tags),
                serving_size = COALESCE($19, serving_size),
                calories_per_serving = COALESCE($20, calories_per_serving),
                is_published = COALESCE($21, is_published),
                requires_approval = COALESCE($22, requires_approval),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id)
        .bind(draft.name.as_deref())
        .bind(draft.brand.as_deref())
        .bind(draft.description.as_deref())
        .bind(draft.image_url.as_deref())
        .bind(draft.barcode.as_deref())
        .bind(draft.ingredients.as_deref())
        .bind(draft.clamped_score())
        .bind(draft.nutrition_data.as_ref())
        .bind(draft.allergens.as_ref())
        .bind(draft.is_vegetarian)
        .bind(draft.is_vegan)
        .bind(draft.is_gluten_free)
        .bind(draft.is_dairy_free)
        .bind(draft.is_organic)
        .bind(draft.category.as_deref())
        .bind(draft.subcategory.as_deref())
        .bind(draft.tags.as_ref())
        .bind(draft.serving_size.as_deref())
        .bind(draft.calories_per_serving)
        .bind(is_published)
        .bind(requires_approval)
        .fetch_optional(executor)
        .await
    }

    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn product(id: i64, name: &str) -> Product {
        let now = Utc::now();
        Product {
            id,
            name: name.to_string(),
            brand: None,
            description: None,
            image_url: None,
            barcode: None,
            ingredients: None,
            health_score: 50,
            nutrition_data: None,
            allergens: Vec::new(),
            is_vegetarian: false,
            is_vegan: false,
            is_gluten_free: false,
            is_dairy_free: false,
            is_organic: false,
            is_published: true,
            requires_approval: false,
            category: None,
            subcategory: None,
            tags: Vec::new(),
            serving_size: None,
            calories_per_serving: None,
            user_submitted: false,
            submitted_by: None,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::product;
    use super::*;
    use crate::models::user::Role;

    #[test]
    fn ingredient_list_trims_and_skips_blanks() {
        let mut p = product(1, "Chips");
        p.ingredients = Some(" Potatoes, Vegetable Oil ,, Salt ".to_string());
        assert_eq!(p.ingredient_list().collect::<Vec<_>>(), ["Potatoes", "Vegetable Oil", "Salt"]);
    }

    #[test]
    fn status_follows_flags() {
        let mut p = product(1, "Milk");
        assert_eq!(p.status(), ProductStatus::Published);

        p.is_published = false;
        assert_eq!(p.status(), ProductStatus::Draft);

        p.user_submitted = true;
        assert_eq!(p.status(), ProductStatus::Pending);
    }

    #[test]
    fn merge_prefers_overrides() {
        let base = ProductDraft {
            name: Some("Bournvita".into()),
            brand: Some("Cadbury".into()),
            health_score: Some(55),
            ..ProductDraft::default()
        };
        let overrides = ProductDraft {
            health_score: Some(40),
            category: Some("Beverages".into()),
            ..ProductDraft::default()
        };

        let merged = base.merge(overrides);
        assert_eq!(merged.name.as_deref(), Some("Bournvita"));
        assert_eq!(merged.health_score, Some(40));
        assert_eq!(merged.category.as_deref(), Some("Beverages"));
    }

    #[test]
    fn draft_deserializes_partial_json() {
        let draft: ProductDraft = serde_json::from_str(r#"{"name":"Amul Butter","is_vegan":false}"#).unwrap();
        assert_eq!(draft.name.as_deref(), Some("Amul Butter"));
        assert_eq!(draft.is_vegan, Some(false));
        assert!(draft.brand.is_none());
        assert!(ProductDraft::default().is_empty());
        assert!(!draft.is_empty());
    }

    fn creator(role: Role) -> AuthContext {
        AuthContext { user_id: 7, role, username: "priya".into() }
    }

    #[test]
    fn admins_publish_by_default() {
        let publication = Publication::for_creator(&creator(Role::Admin), None);
        assert!(publication.is_published);
        assert!(!publication.requires_approval);
        assert!(!publication.user_submitted);
        assert_eq!(publication.submitted_by, None);

        assert!(!Publication::for_creator(&creator(Role::Admin), Some(false)).is_published);
    }

    #[test]
    fn contributors_wait_for_approval() {
        // The requested flag is ignored for contributors
        let publication = Publication::for_creator(&creator(Role::Contributor), Some(true));
        assert!(!publication.is_published);
        assert!(publication.requires_approval);
        assert!(publication.user_submitted);
        assert_eq!(publication.submitted_by.as_deref(), Some("priya"));
    }

    #[test]
    fn fractional_health_score_rounds() {
        let draft: ProductDraft = serde_json::from_str(r#"{"health_score":55.5}"#).unwrap();
        assert_eq!(draft.health_score, Some(56));

        let draft: ProductDraft = serde_json::from_str(r#"{"health_score":null}"#).unwrap();
        assert_eq!(draft.health_score, None);

        let draft: ProductDraft = serde_json::from_str(r#"{"health_score":140}"#).unwrap();
        assert_eq!(draft.clamped_score(), Some(100));
    }
}
