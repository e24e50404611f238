use serde::{Deserialize, Serialize};

use crate::models::ticket::{AvailabilityRecord, PricingRecord};

pub type EventId = i64;

/// Catalog entry as delivered by the catalog feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub name: String,
    pub description: Option<String>,
    pub venue: Option<String>,
    pub category: Option<String>,
    /// Display string, never parsed.
    pub date: Option<String>,
    /// `H[:MM] [AM|PM]`
    pub time: Option<String>,
    pub image_url: Option<String>,
}

/// Detail feed payload: the event plus its two independently sourced ticket lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    #[serde(default)]
    pub ticket_counts: Vec<AvailabilityRecord>,
    #[serde(default)]
    pub ticket_types: Vec<PricingRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_accepts_sparse_event_fields() {
        let json = r#"{
            "id": 7,
            "name": "Open Mic",
            "ticket_counts": [
                {"tier": "Regular", "available_count": 3, "total_count": 5, "total_purchased": 2}
            ],
            "ticket_types": [{"tier_name": "Regular", "price": 100}]
        }"#;

        let detail: EventDetail = serde_json::from_str(json).unwrap();
        assert_eq!(detail.event.id, 7);
        assert!(detail.event.venue.is_none());
        assert!(detail.event.time.is_none());
        assert_eq!(detail.ticket_counts.len(), 1);
        assert_eq!(detail.ticket_types[0].tier_name, "Regular");
    }

    #[test]
    fn test_detail_without_ticket_lists() {
        let detail: EventDetail =
            serde_json::from_str(r#"{"id": 1, "name": "Derby", "time": "3:00 PM"}"#).unwrap();
        assert!(detail.ticket_counts.is_empty());
        assert!(detail.ticket_types.is_empty());
    }
}
