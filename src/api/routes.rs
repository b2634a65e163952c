use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router
///
/// History reset routes are only mounted when `debug_routes` is set.
pub fn create_router(state: AppState, debug_routes: bool) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/api/v1", api_routes(debug_routes))
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// API routes under /api/v1
fn api_routes(debug_routes: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/health", get(handlers::health_check))
        // FlickWord
        .route("/flickword/daily", get(handlers::daily_word))
        .route("/flickword/preview", get(handlers::preview_words))
        .route("/flickword/played", post(handlers::record_word))
        .route("/flickword/stats", get(handlers::word_stats))
        // Trivia
        .route("/trivia/daily", get(handlers::daily_trivia))
        .route("/trivia/preview", get(handlers::preview_trivia))
        .route("/trivia/played", post(handlers::record_trivia))
        .route("/trivia/stats", get(handlers::trivia_stats));

    if !debug_routes {
        return router;
    }

    tracing::warn!("Debug routes enabled, history can be cleared over HTTP");
    router
        .route("/flickword/history", delete(handlers::clear_word_history))
        .route("/trivia/history", delete(handlers::clear_trivia_history))
}
