use serde::Deserialize;

use super::pagination::Pagination;
use crate::models::product::Product;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchParams {
    #[serde(alias = "q")]
    pub query: Option<String>,
    pub category: Option<String>,
    #[serde(default)]
    pub vegan: bool,
    #[serde(default)]
    pub vegetarian: bool,
    #[serde(default)]
    pub gluten_free: bool,
    #[serde(default)]
    pub dairy_free: bool,
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

#[derive(Debug)]
pub struct SearchPage<'a> {
    pub products: &'a [&'a Product],
    pub total: usize,
    pub page: u32,
    pub total_pages: u32,
}

impl SearchParams {
    pub fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.limit)
    }

    fn needle(&self) -> Option<String> {
        self.query
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase)
    }

    pub fn matches(&self, product: &Product) -> bool {
        if let Some(needle) = self.needle() {
            if !matches_query(product, &needle) {
                return false;
            }
        }

        if let Some(category) = self.category.as_deref().filter(|c| !c.is_empty()) {
            if product.category.as_deref() != Some(category) {
                return false;
            }
        }

        (!self.vegan || product.is_vegan)
            && (!self.vegetarian || product.is_vegetarian)
            && (!self.gluten_free || product.is_gluten_free)
            && (!self.dairy_free || product.is_dairy_free)
    }
}

fn matches_query(product: &Product, needle: &str) -> bool {
    let contains = |s: &str| s.to_lowercase().contains(needle);

    contains(product.name.as_str())
        || product.brand.as_deref().is_some_and(contains)
        || product.ingredient_list().any(contains)
}

/// Filters `products` in catalog order.
pub fn filter<'a>(products: &'a [Product], params: &SearchParams) -> Vec<&'a Product> {
    products.iter().filter(|p| params.matches(p)).collect()
}

pub fn paginate<'a>(matched: &'a [&'a Product], params: &SearchParams) -> SearchPage<'a> {
    let pagination = params.pagination();
    SearchPage {
        products: pagination.slice(matched),
        total: matched.len(),
        page: pagination.page,
        total_pages: pagination.total_pages(matched.len()),
    }
}
