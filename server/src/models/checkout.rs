use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::event::EventId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutLine {
    pub tier: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub subtotal: Decimal,
}

/// Everything the external checkout call receives for one event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckoutSummary {
    pub event_id: EventId,
    pub lines: Vec<CheckoutLine>,
    pub total: Decimal,
}

impl CheckoutSummary {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn ticket_count(&self) -> u32 {
        self.lines.iter().map(|line| line.quantity).sum()
    }
}
