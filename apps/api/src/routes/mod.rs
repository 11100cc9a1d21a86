pub mod health;
pub mod rate_limit;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::services::ServeDir;

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config.static_dir.clone();

    let api = Router::new()
        .route(
            "/generate-documents",
            post(handlers::handle_generate_documents),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            rate_limit::rate_limit,
        ));

    Router::new()
        .route("/health", get(health::health_handler))
        .nest("/api", api)
        .fallback_service(ServeDir::new(static_dir))
        .with_state(state)
}
