use axum::{routing::post, Router};
use crate::handlers::submission::create_submission;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/submissions", post(create_submission))
}
