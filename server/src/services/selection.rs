use std::collections::{BTreeMap, HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{CheckoutLine, CheckoutSummary, EventId, TicketTierView};
use crate::utils::error::TotalOverflow;

/// Per-tier quantities a visitor intends to buy for one event.
///
/// Quantities are unsigned, so a decrement at zero stays at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    quantities: BTreeMap<String, u32>,
}

impl SelectionState {
    /// Starts every known tier at zero.
    pub fn init(tiers: &[TicketTierView]) -> Self {
        let quantities = tiers.iter().map(|t| (t.tier.clone(), 0)).collect();
        Self { quantities }
    }

    /// Adds one ticket, creating the tier if it is not known yet.
    pub fn increment(&mut self, tier: &str) -> u32 {
        let quantity = self.quantities.entry(tier.to_string()).or_insert(0);
        *quantity = quantity.saturating_add(1);
        *quantity
    }

    /// Removes one ticket, never going below zero.
    pub fn decrement(&mut self, tier: &str) -> u32 {
        let quantity = self.quantities.entry(tier.to_string()).or_insert(0);
        if *quantity == 0 {
            debug!(tier, "Ignoring decrement below zero");
        }
        *quantity = quantity.saturating_sub(1);
        *quantity
    }

    pub fn set(&mut self, tier: &str, quantity: u32) {
        self.quantities.insert(tier.to_string(), quantity);
    }

    pub fn quantity(&self, tier: &str) -> u32 {
        self.quantities.get(tier).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.quantities.iter().map(|(tier, q)| (tier.as_str(), *q))
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.values().all(|q| *q == 0)
    }

    /// Sum of quantity times price. Tiers missing from `tiers` add nothing.
    pub fn total(&self, tiers: &[TicketTierView]) -> Result<Decimal, TotalOverflow> {
        let prices = price_index(tiers);

        self.quantities
            .iter()
            .filter_map(|(tier, quantity)| {
                prices
                    .get(tier.as_str())
                    .map(|price| line_amount(*price, *quantity))
            })
            .try_fold(Decimal::ZERO, |total, amount| {
                total.checked_add(amount?).ok_or(TotalOverflow)
            })
    }

    /// Builds the checkout handoff: one line per selected tier, in tier order.
    pub fn checkout_summary(
        &self,
        event_id: EventId,
        tiers: &[TicketTierView],
    ) -> Result<CheckoutSummary, TotalOverflow> {
        let mut seen = HashSet::new();
        let mut lines = Vec::new();
        let mut total = Decimal::ZERO;

        for t in tiers.iter().filter(|t| seen.insert(t.tier.as_str())) {
            let quantity = self.quantity(&t.tier);
            if quantity == 0 {
                continue;
            }

            let subtotal = line_amount(t.price, quantity)?;
            total = total.checked_add(subtotal).ok_or(TotalOverflow)?;
            lines.push(CheckoutLine {
                tier: t.tier.clone(),
                quantity,
                unit_price: t.price,
                subtotal,
            });
        }

        Ok(CheckoutSummary {
            event_id,
            lines,
            total,
        })
    }
}

fn line_amount(price: Decimal, quantity: u32) -> Result<Decimal, TotalOverflow> {
    price
        .checked_mul(Decimal::from(quantity))
        .ok_or(TotalOverflow)
}

fn price_index(tiers: &[TicketTierView]) -> HashMap<&str, Decimal> {
    let mut prices = HashMap::with_capacity(tiers.len());
    for tier in tiers {
        prices.entry(tier.tier.as_str()).or_insert(tier.price);
    }
    prices
}
