pub mod admin;
pub mod products;
pub mod submissions;
pub mod users;

use axum::{http::HeaderValue, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(products::routes(state.clone()))
        .merge(submissions::routes())
        .merge(users::routes(state.clone()))
        .merge(admin::routes(state))
}

/// The full application served under `/api`.
pub fn app(state: AppState) -> Router {
    let api = create_router(state.clone())
        .route("/", get(|| async { "Can I Eat API" }))
        .route("/health", get(health_check));

    Router::new()
        .nest("/api", api)
        .layer(cors_layer(state.config.cors_origin.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    match origin.and_then(|o| o.parse::<HeaderValue>().ok()) {
        Some(origin) => layer.allow_origin(origin),
        None => layer.allow_origin(Any),
    }
}

async fn health_check() -> &'static str {
    "OK"
}
