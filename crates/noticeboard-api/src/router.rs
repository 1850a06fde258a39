//! Route definitions for the notice board HTTP API.
//!
//! Notice routes are mounted under `/api/notices`; the static frontend, when
//! configured, is the fallback service.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post, put},
};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Build the complete Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_bytes;
    let static_dir = state.config.server.static_dir.trim().to_string();
    let cors = middleware::cors::build_cors_layer(&state.config.server.cors);

    let api_routes = Router::new().merge(notice_routes()).merge(health_routes());

    let mut router = Router::new().nest("/api", api_routes);
    if !static_dir.is_empty() {
        router = router.fallback_service(ServeDir::new(static_dir).append_index_html_on_directories(true));
    }

    router
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(max_body))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum_middleware::from_fn(middleware::logging::request_logging))
        .with_state(state)
}

/// Notice CRUD, completion and image ingestion
fn notice_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/notices",
            get(handlers::notice::list_notices).post(handlers::notice::create_notice),
        )
        .route("/notices/from-image", post(handlers::notice::create_from_image))
        .route(
            "/notices/{id}",
            get(handlers::notice::get_notice).delete(handlers::notice::delete_notice),
        )
        .route("/notices/{id}/complete", put(handlers::notice::complete_notice))
}

/// Health endpoint
fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
