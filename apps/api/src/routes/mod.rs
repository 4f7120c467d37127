pub mod health;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::report::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();
    Router::new()
        .route("/api/generate", post(handlers::handle_generate))
        .route("/api/health", get(health::health_handler))
        // Browser client; unmatched paths fall through to the static tree
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}
