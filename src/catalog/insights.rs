use std::collections::BTreeMap;

use serde::Serialize;

use crate::models::product::Product;

pub const TRENDING_COUNT: usize = 4;
pub const HEALTH_INSIGHTS_COUNT: usize = 3;

const HEALTH_TAGS: &[&str] = &[
    "antioxidant",
    "omega-3",
    "protein",
    "vitamin",
    "fiber",
    "heart-healthy",
    "anti-inflammatory",
];

const DEFAULT_CATEGORY_ICON: &str = "fa-utensils";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryCount {
    pub id: usize,
    pub name: String,
    pub count: usize,
    pub icon: &'static str,
}

pub fn category_icon(category: &str) -> &'static str {
    match category {
        "Dairy" => "fa-cheese",
        "Bakery" => "fa-bread-slice",
        "Beverages" => "fa-mug-hot",
        "Snacks" => "fa-cookie",
        "Cereals" => "fa-wheat-awn",
        "Condiments" => "fa-bottle-droplet",
        "Spices" => "fa-mortar-pestle",
        "Sweets" => "fa-candy-cane",
        "Health Supplements" => "fa-pills",
        "Superfoods" => "fa-seedling",
        _ => DEFAULT_CATEGORY_ICON,
    }
}

fn top_by_score<'a>(mut products: Vec<&'a Product>, n: usize) -> Vec<&'a Product> {
    // Stable sort keeps catalog order among equal scores
    products.sort_by(|a, b| b.health_score.cmp(&a.health_score));
    products.truncate(n);
    products
}

pub fn trending(products: &[Product]) -> Vec<&Product> {
    top_by_score(products.iter().collect(), TRENDING_COUNT)
}

pub fn health_insights(products: &[Product]) -> Vec<&Product> {
    let tagged = products
        .iter()
        .filter(|p| {
            p.tags
                .iter()
                .any(|tag| HEALTH_TAGS.iter().any(|health_tag| tag.contains(*health_tag)))
        })
        .collect();
    top_by_score(tagged, HEALTH_INSIGHTS_COUNT)
}

pub fn categories(products: &[Product]) -> Vec<CategoryCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for category in products.iter().filter_map(|p| p.category.as_deref()) {
        *counts.entry(category).or_default() += 1;
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(index, (name, count))| CategoryCount {
            id: index + 1,
            name: name.to_string(),
            count,
            icon: category_icon(name),
        })
        .collect()
}
