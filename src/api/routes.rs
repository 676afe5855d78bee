use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::{make_span_with_request_id, request_id_middleware};

/// Creates the router the renderer talks to
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api", api_routes())
        .layer(
            // Outermost first: the id must exist before the trace span is made
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        // Catalog views
        .route("/catalog", get(handlers::get_catalog))
        .route("/catalog/counts", get(handlers::get_counts))
        .route("/catalog/sections/:status", get(handlers::get_section))
        // Protocols
        .route("/catalog/refresh", post(handlers::refresh))
        .route("/catalog/:code/status", put(handlers::change_status))
        // Renderer state
        .route(
            "/settings/hide_special_screenings",
            put(handlers::set_hide_special_screenings),
        )
        .route("/view/anchor", put(handlers::set_anchor))
        .route("/notices", get(handlers::get_notices))
}
