use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use crate::handlers::catalog::{
    autocomplete, health_insights, list_categories, recently_viewed, search_products, trending,
};
use crate::handlers::product::{create_product, get_product, list_products, products_by_category};
use crate::handlers::submission::suggest_edit;
use crate::middleware::auth::require_auth;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let create = post(create_product).layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/products", get(list_products).merge(create))
        .route("/products/search", get(search_products))
        .route("/products/autocomplete", get(autocomplete))
        .route("/products/recent", get(recently_viewed))
        .route("/products/trending", get(trending))
        .route("/products/health-insights", get(health_insights))
        .route("/products/category/{name}", get(products_by_category))
        .route("/products/{id}", get(get_product))
        .route("/products/{id}/edits", post(suggest_edit))
        .route("/categories", get(list_categories))
}
