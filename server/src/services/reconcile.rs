use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use tracing::debug;

use crate::models::{AvailabilityRecord, PricingRecord, TicketTierView};

/// Joins inventory counters with tier prices on the exact tier name.
///
/// One view is produced per availability record, in input order. Pricing rows
/// without inventory are dropped. A tier without a price is reported at zero.
pub fn reconcile(
    availability: &[AvailabilityRecord],
    pricing: &[PricingRecord],
) -> Vec<TicketTierView> {
    // First pricing row wins when a tier is priced twice.
    let mut prices: HashMap<&str, Decimal> = HashMap::with_capacity(pricing.len());
    for record in pricing {
        prices.entry(record.tier_name.as_str()).or_insert(record.price);
    }

    let tiers: Vec<TicketTierView> = availability
        .iter()
        .map(|record| {
            // TODO: confirm with product whether an unpriced tier should be hidden
            // rather than offered at zero.
            let price = prices.get(record.tier.as_str()).copied().unwrap_or_else(|| {
                debug!(tier = %record.tier, "No pricing for tier, defaulting to zero");
                Decimal::ZERO
            });
            TicketTierView::from_parts(record, price)
        })
        .collect();

    let stocked: HashSet<&str> = availability.iter().map(|a| a.tier.as_str()).collect();
    for record in pricing {
        if !stocked.contains(record.tier_name.as_str()) {
            debug!(tier = %record.tier_name, "Dropping pricing for tier without inventory");
        }
    }

    tiers
}
