use axum::extract::State;
use axum::response::Response;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

pub mod events;

pub use events::{get_event, list_categories, list_events, quote_event};

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
    events: usize,
    catalog_loaded_at: Option<DateTime<Utc>>,
}

pub async fn health_check(State(state): State<AppState>) -> Result<Response, AppError> {
    let payload = HealthPayload {
        status: "ok",
        service: "eventyako-api",
        events: state.store.list_events()?.len(),
        catalog_loaded_at: state.store.loaded_at(),
    };

    Ok(success(payload, "Health check successful"))
}
