use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{apply_security_headers, create_cors_layer, Config};
use crate::handlers::{get_event, health_check, list_categories, list_events, quote_event};
use crate::state::AppState;

pub fn create_routes(state: AppState, config: &Config) -> Router {
    let router = Router::new()
        .route("/health", get(health_check))
        .route("/events", get(list_events))
        .route("/events/:id", get(get_event))
        .route("/events/:id/quote", post(quote_event))
        .route("/categories", get(list_categories))
        .with_state(state);

    apply_security_headers(router, config.production)
        .layer(create_cors_layer(config))
        .layer(TraceLayer::new_for_http())
}
