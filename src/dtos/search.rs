use serde::{Deserialize, Serialize};

use super::product::{to_responses, ProductResponse};
use crate::catalog::search::SearchPage;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub products: Vec<ProductResponse>,
    pub total: usize,
    pub page: u32,
    pub total_pages: u32,
}

impl From<SearchPage<'_>> for SearchResponse {
    fn from(page: SearchPage<'_>) -> Self {
        Self {
            products: to_responses(page.products.iter().copied()),
            total: page.total,
            page: page.page,
            total_pages: page.total_pages,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct AutocompleteQuery {
    #[serde(default, alias = "query")]
    pub q: String,
}

#[derive(Debug, Deserialize)]
pub struct RecentQuery {
    #[serde(default)]
    pub ids: String,
    /// Product just opened; moved to the front of `ids`.
    pub viewed: Option<i64>,
}
