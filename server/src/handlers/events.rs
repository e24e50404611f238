use std::collections::BTreeMap;

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::models::{Event, EventDetail, EventId, TicketTierView};
use crate::services::{
    classify_time_of_day, distinct_categories, filter_catalog, reconcile, FilterCriteria,
    SelectionState, TimeOfDay,
};
use crate::state::AppState;
use crate::store::EventStore;
use crate::utils::error::AppError;
use crate::utils::response::{listing, success};

/// Query string of `GET /events`. Blank values impose no constraint.
#[derive(Debug, Default, Deserialize)]
pub struct EventQuery {
    pub category: Option<String>,
    pub location: Option<String>,
    pub time_of_day: Option<String>,
}

impl TryFrom<EventQuery> for FilterCriteria {
    type Error = AppError;

    fn try_from(query: EventQuery) -> Result<Self, Self::Error> {
        let time_of_day = match query.time_of_day.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(
                raw.parse::<TimeOfDay>()
                    .map_err(|e| AppError::ValidationError(e.to_string()))?,
            ),
        };

        Ok(FilterCriteria {
            category: query.category,
            location_substring: query.location,
            time_of_day,
        })
    }
}

pub async fn list_events(
    State(state): State<AppState>,
    query: Result<Query<EventQuery>, QueryRejection>,
) -> Result<Response, AppError> {
    let Query(query) = query?;
    let criteria = FilterCriteria::try_from(query)?;
    let events = state.store.list_events()?;
    let view = filter_catalog(&events, &criteria);

    info!(
        total = events.len(),
        matched = view.events.len(),
        unclassified = view.unclassified_event_ids.len(),
        "Filtered catalog"
    );

    let message = format!("{} event(s) found", view.events.len());
    Ok(success(view, message))
}

pub async fn list_categories(State(state): State<AppState>) -> Result<Response, AppError> {
    let categories = distinct_categories(&state.store.list_events()?);
    Ok(listing(categories, "Categories retrieved"))
}

#[derive(Serialize)]
struct EventWithTickets {
    #[serde(flatten)]
    event: Event,
    time_of_day: Option<TimeOfDay>,
    tickets: Vec<TicketTierView>,
}

pub async fn get_event(
    State(state): State<AppState>,
    id: Result<Path<EventId>, PathRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let detail = find_event(state.store.as_ref(), id)?;
    let tickets = reconcile(&detail.ticket_counts, &detail.ticket_types);

    let time_of_day = match detail.event.time.as_deref().map(classify_time_of_day) {
        Some(Ok(bucket)) => Some(bucket),
        Some(Err(err)) => {
            warn!(event_id = id, error = %err, "Event time could not be classified");
            None
        }
        None => None,
    };

    let payload = EventWithTickets {
        event: detail.event,
        time_of_day,
        tickets,
    };

    Ok(success(payload, "Event retrieved"))
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteRequest {
    #[serde(default)]
    pub quantities: BTreeMap<String, u32>,
}

/// Prices a tier selection for one event without reserving anything.
pub async fn quote_event(
    State(state): State<AppState>,
    id: Result<Path<EventId>, PathRejection>,
    request: Result<Json<QuoteRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let Path(id) = id?;
    let Json(request) = request?;
    let detail = find_event(state.store.as_ref(), id)?;
    let tiers = reconcile(&detail.ticket_counts, &detail.ticket_types);

    let mut selection = SelectionState::init(&tiers);
    for (tier, quantity) in &request.quantities {
        selection.set(tier, *quantity);
    }

    let summary = selection.checkout_summary(id, &tiers)?;
    info!(
        event_id = id,
        tickets = summary.ticket_count(),
        total = %summary.total,
        "Quoted selection"
    );

    Ok(success(summary, "Selection priced"))
}

fn find_event(store: &dyn EventStore, id: EventId) -> Result<EventDetail, AppError> {
    store
        .event_detail(id)?
        .ok_or_else(|| AppError::NotFound(format!("Event with id '{}' was not found", id)))
}
