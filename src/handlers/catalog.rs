use axum::{extract::State, Json};
use tracing::{debug, instrument};

use crate::catalog::{autocomplete, insights, recent, search};
use crate::dtos::product::{to_responses, ProductResponse};
use crate::dtos::search::{AutocompleteQuery, RecentQuery, SearchResponse};
use crate::error::AppError;
use crate::extractors::AppQuery;
use crate::models::product::Product;
use crate::state::AppState;

// GET /products/search
#[instrument(skip(state))]
pub async fn search_products(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<search::SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let products = Product::fetch_published(&state.db_pool).await?;
    let matched = search::filter(&products, &params);
    let page = search::paginate(&matched, &params);
    debug!(total = page.total, page = page.page, "Search complete");

    Ok(Json(SearchResponse::from(page)))
}

// GET /products/autocomplete?q=
#[instrument(skip(state))]
pub async fn autocomplete(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AutocompleteQuery>,
) -> Result<Json<Vec<autocomplete::Suggestion>>, AppError> {
    // Skip the database for queries too short to suggest on
    if query.q.chars().count() < autocomplete::MIN_QUERY_CHARS {
        return Ok(Json(Vec::new()));
    }

    let products = Product::fetch_published(&state.db_pool).await?;
    Ok(Json(autocomplete::suggest(&products, &query.q)))
}

// GET /products/recent?ids=3,1,2&viewed=5
#[instrument(skip(state))]
pub async fn recently_viewed(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<RecentQuery>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let mut ids = recent::parse_ids(&query.ids);
    if let Some(viewed) = query.viewed {
        ids = recent::push_recent(&ids, viewed);
    }
    if ids.is_empty() {
        return Ok(Json(Vec::new()));
    }

    let products = Product::fetch_published(&state.db_pool).await?;
    Ok(Json(to_responses(recent::order_by_ids(&products, &ids))))
}

// GET /products/trending
#[instrument(skip(state))]
pub async fn trending(State(state): State<AppState>) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = Product::fetch_published(&state.db_pool).await?;
    Ok(Json(to_responses(insights::trending(&products))))
}

// GET /products/health-insights
#[instrument(skip(state))]
pub async fn health_insights(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProductResponse>>, AppError> {
    let products = Product::fetch_published(&state.db_pool).await?;
    Ok(Json(to_responses(insights::health_insights(&products))))
}

// GET /categories
#[instrument(skip(state))]
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<Vec<insights::CategoryCount>>, AppError> {
    let products = Product::fetch_published(&state.db_pool).await?;
    Ok(Json(insights::categories(&products)))
}
