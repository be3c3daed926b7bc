use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers;
use super::AppState;
use crate::middleware::request_id::{make_span_with_request_id, request_id_middleware};

/// Creates the main API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes())
        .with_state(state)
        .layer(
            // Outermost first: the request ID must exist before the trace span is made
            ServiceBuilder::new()
                .layer(CorsLayer::permissive())
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id)),
        )
}

/// API routes under /api/v1
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/home", get(handlers::landing_page))
        // Banner
        .route("/banner", get(handlers::get_banner))
        .route("/banner/next", post(handlers::banner_next))
        .route("/banner/prev", post(handlers::banner_prev))
        .route(
            "/banner/hover",
            post(handlers::banner_hover_start).delete(handlers::banner_hover_end),
        )
        .route(
            "/banner/trailer",
            post(handlers::play_trailer).delete(handlers::close_trailer),
        )
        .route(
            "/banner/info",
            get(handlers::get_banner_info)
                .post(handlers::open_banner_info)
                .delete(handlers::close_banner_info),
        )
        // Rows
        .route(
            "/rows/:row/selection",
            get(handlers::get_selection).delete(handlers::dismiss_selection),
        )
        .route("/rows/:row/selection/:id", post(handlers::select_item))
}
