pub mod catalog;
pub mod reconcile;
pub mod selection;

pub use catalog::{
    classify_time_of_day, distinct_categories, filter_catalog, filter_events, CatalogView,
    FilterCriteria, TimeOfDay,
};
pub use reconcile::reconcile;
pub use selection::SelectionState;
