use super::{handlers, state::AppState};
use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route("/query", post(handlers::query_handler))
        .route("/query-one", post(handlers::query_one_handler))
        .route("/simple", post(handlers::simple_handler))
        .route("/button", post(handlers::button_handler))
        .route("/audio", post(handlers::audio_handler))
        .route("/raw", post(handlers::raw_query_handler))
        .route("/api/query", post(handlers::api_query_handler))
        .route(
            "/advertiser-filter",
            post(handlers::advertiser_filter_handler),
        )
        .with_state(app_state)
        .layer(TraceLayer::new_for_http())
}
