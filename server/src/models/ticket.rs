use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Inventory counters for one tier of one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AvailabilityRecord {
    pub tier: String,
    pub available_count: u32,
    pub total_count: u32,
    #[serde(default)]
    pub total_purchased: u32,
}

/// Price for one tier, joined to [`AvailabilityRecord::tier`] by `tier_name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRecord {
    pub tier_name: String,
    pub price: Decimal,
}

/// Availability and price of one tier after reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketTierView {
    pub tier: String,
    pub available_count: u32,
    pub total_count: u32,
    pub total_purchased: u32,
    pub price: Decimal,
}

impl TicketTierView {
    pub fn from_parts(record: &AvailabilityRecord, price: Decimal) -> Self {
        Self {
            tier: record.tier.clone(),
            available_count: record.available_count,
            total_count: record.total_count,
            total_purchased: record.total_purchased,
            price,
        }
    }
}
