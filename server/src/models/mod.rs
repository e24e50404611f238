pub mod checkout;
pub mod event;
pub mod ticket;

pub use checkout::{CheckoutLine, CheckoutSummary};
pub use event::{Event, EventDetail, EventId};
pub use ticket::{AvailabilityRecord, PricingRecord, TicketTierView};
