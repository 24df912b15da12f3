pub mod health;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::state::AppState;
use crate::workflow::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/catalog", get(handlers::handle_get_catalog))
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:session_id",
            get(handlers::handle_get_session).delete(handlers::handle_end_session),
        )
        .route(
            "/api/v1/sessions/:session_id/path",
            put(handlers::handle_select_path),
        )
        // Submissions (Path A / Path B)
        .route(
            "/api/v1/sessions/:session_id/strategy",
            post(handlers::handle_submit_strategy),
        )
        .route(
            "/api/v1/sessions/:session_id/lookup",
            post(handlers::handle_submit_lookup),
        )
        // Results
        .route(
            "/api/v1/sessions/:session_id/results/:path",
            get(handlers::handle_get_result),
        )
        .route(
            "/api/v1/sessions/:session_id/results/:path/markdown",
            get(handlers::handle_get_result_markdown),
        )
        .with_state(state)
}
