use crate::catalog::health::HealthScore;
use crate::error::AppError;
use crate::models::product::ProductDraft;

pub const REQUIRED_FIELDS_MESSAGE: &str = "Please fill in all required fields";

fn clean(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_list(values: Option<Vec<String>>) -> Option<Vec<String>> {
    values.map(|list| list.into_iter().filter_map(|v| clean(Some(v))).collect())
}

/// Splits on commas, trims, drops blanks and rejoins with `", "`.
pub fn normalize_ingredients(raw: &str) -> String {
    raw.split(',')
        .map(str::trim)
        .filter(|i| !i.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Trims text fields, blanks become unset, and the health score is clamped.
pub fn normalize(draft: ProductDraft) -> ProductDraft {
    ProductDraft {
        name: clean(draft.name),
        brand: clean(draft.brand),
        description: clean(draft.description),
        image_url: clean(draft.image_url),
        barcode: clean(draft.barcode),
        ingredients: clean(draft.ingredients.map(|i| normalize_ingredients(&i))),
        health_score: draft.health_score.map(|s| HealthScore::clamped(s).value() as i64),
        allergens: clean_list(draft.allergens),
        category: clean(draft.category),
        subcategory: clean(draft.subcategory),
        tags: clean_list(draft.tags),
        serving_size: clean(draft.serving_size),
        ..draft
    }
}

/// Contributor submissions need name, brand, category and ingredients.
pub fn require_submission_fields(draft: &ProductDraft) -> Result<(), AppError> {
    let complete = draft.name.is_some()
        && draft.brand.is_some()
        && draft.category.is_some()
        && draft.ingredients.is_some();
    if complete {
        Ok(())
    } else {
        Err(AppError::validation(REQUIRED_FIELDS_MESSAGE))
    }
}

pub fn require_product_fields(draft: &ProductDraft) -> Result<(), AppError> {
    if draft.name.is_some() && draft.brand.is_some() && draft.category.is_some() {
        Ok(())
    } else {
        Err(AppError::validation(REQUIRED_FIELDS_MESSAGE))
    }
}

/// `raw` is the edit before normalization, so a blanked name is still visible.
pub fn validate_edit(raw: &ProductDraft, normalized: &ProductDraft) -> Result<(), AppError> {
    if raw.name.is_some() && normalized.name.is_none() {
        return Err(AppError::validation("Product name is required"));
    }
    if normalized.is_empty() {
        return Err(AppError::validation("Edit does not change any field"));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !email.contains(char::is_whitespace)
        }
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(AppError::validation("Invalid contact email"))
    }
}
