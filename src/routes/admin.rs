use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use crate::handlers::product::{admin_get_product, admin_list_products, delete_product, update_product};
use crate::handlers::submission::{approve_submission, get_submission, list_submissions, reject_submission};
use crate::handlers::user::create_user;
use crate::middleware::auth::{require_admin, require_auth};
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let admin = Router::new()
        .route("/products", get(admin_list_products))
        .route(
            "/products/{id}",
            get(admin_get_product).put(update_product).delete(delete_product),
        )
        .route("/submissions", get(list_submissions))
        .route("/submissions/{id}", get(get_submission))
        .route("/submissions/{id}/approve", post(approve_submission))
        .route("/submissions/{id}/reject", post(reject_submission))
        .route("/users", post(create_user))
        // require_auth runs first and attaches the AuthContext require_admin reads
        .layer(middleware::from_fn_with_state(state.clone(), require_admin))
        .layer(middleware::from_fn_with_state(state, require_auth));

    Router::new().nest("/admin", admin)
}
