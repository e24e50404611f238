use std::collections::HashSet;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{Event, EventDetail, EventId};
use crate::utils::error::CatalogError;

/// Source of catalog and per-event detail data.
pub trait EventStore: Send + Sync {
    fn list_events(&self) -> Result<Vec<Event>, CatalogError>;

    fn event_detail(&self, id: EventId) -> Result<Option<EventDetail>, CatalogError>;

    fn loaded_at(&self) -> Option<DateTime<Utc>> {
        None
    }
}

#[derive(Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    events: Vec<EventDetail>,
}

/// Read-only catalog held in memory, loaded once from a JSON snapshot.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    events: Vec<EventDetail>,
    loaded_at: DateTime<Utc>,
}

impl SnapshotStore {
    pub fn new(events: Vec<EventDetail>) -> Result<Self, CatalogError> {
        validate(&events)?;
        Ok(Self {
            events,
            loaded_at: Utc::now(),
        })
    }

    pub fn empty() -> Self {
        Self {
            events: Vec::new(),
            loaded_at: Utc::now(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        Self::new(file.events)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let store = Self::from_json(&fs::read_to_string(path)?)?;
        info!(
            path = %path.display(),
            events = store.len(),
            "Loaded catalog snapshot"
        );
        Ok(store)
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventStore for SnapshotStore {
    fn list_events(&self) -> Result<Vec<Event>, CatalogError> {
        Ok(self.events.iter().map(|d| d.event.clone()).collect())
    }

    fn event_detail(&self, id: EventId) -> Result<Option<EventDetail>, CatalogError> {
        Ok(self.events.iter().find(|d| d.event.id == id).cloned())
    }

    fn loaded_at(&self) -> Option<DateTime<Utc>> {
        Some(self.loaded_at)
    }
}

fn validate(events: &[EventDetail]) -> Result<(), CatalogError> {
    let mut ids = HashSet::new();

    for detail in events {
        let id = detail.event.id;
        if !ids.insert(id) {
            return Err(CatalogError::Invalid(format!("duplicate event id {}", id)));
        }

        if let Some(record) = detail.ticket_types.iter().find(|t| t.price < Decimal::ZERO) {
            return Err(CatalogError::Invalid(format!(
                "event {} prices tier '{}' below zero",
                id, record.tier_name
            )));
        }

        let mut tiers = HashSet::new();
        for record in &detail.ticket_counts {
            if !tiers.insert(record.tier.as_str()) {
                warn!(event_id = id, tier = %record.tier, "Duplicate tier in inventory feed");
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const SNAPSHOT: &str = r#"{
        "events": [
            {
                "id": 1,
                "name": "Churchill Show",
                "venue": "Carnivore Grounds",
                "category": "comedy",
                "date": "2024-11-02",
                "time": "8:00 PM",
                "ticket_counts": [
                    {"tier": "VIP", "available_count": 5, "total_count": 10, "total_purchased": 5}
                ],
                "ticket_types": [{"tier_name": "VIP", "price": 200}]
            },
            {"id": 2, "name": "Safari Rally", "time": "9:00 AM"}
        ]
    }"#;

    #[test]
    fn test_from_json_lists_and_finds_events() {
        let store = SnapshotStore::from_json(SNAPSHOT).unwrap();
        assert_eq!(store.len(), 2);

        let events = store.list_events().unwrap();
        assert_eq!(events[1].name, "Safari Rally");

        let detail = store.event_detail(1).unwrap().unwrap();
        assert_eq!(detail.ticket_counts[0].tier, "VIP");
        assert!(store.event_detail(99).unwrap().is_none());
        assert!(store.loaded_at().is_some());
    }

    #[test]
    fn test_load_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let store = SnapshotStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SnapshotStore::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, CatalogError::Io(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids() {
        let json = r#"{"events": [{"id": 1, "name": "A"}, {"id": 1, "name": "B"}]}"#;
        let err = SnapshotStore::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_rejects_negative_price() {
        let json = r#"{"events": [{
            "id": 3, "name": "A",
            "ticket_types": [{"tier_name": "VIP", "price": -5}]
        }]}"#;
        let err = SnapshotStore::from_json(json).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid(_)));
    }

    #[test]
    fn test_accepts_negative_zero_price() {
        let json = r#"{"events": [{
            "id": 4, "name": "Free Screening",
            "ticket_types": [{"tier_name": "Free", "price": "-0.0"}]
        }]}"#;
        let store = SnapshotStore::from_json(json).unwrap();
        let detail = store.event_detail(4).unwrap().unwrap();
        assert!(detail.ticket_types[0].price.is_zero());
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = SnapshotStore::from_json("{\"events\": [").unwrap_err();
        assert!(matches!(err, CatalogError::Parse(_)));
    }

    #[test]
    fn test_empty_store() {
        let store = SnapshotStore::empty();
        assert!(store.is_empty());
        assert!(store.list_events().unwrap().is_empty());
    }
}
