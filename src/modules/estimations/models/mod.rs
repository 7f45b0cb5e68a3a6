pub mod estimation;
pub mod estimation_item;

pub use estimation::{BreakdownEntry, CategoryBreakdown, Estimation, EstimationStatus};
pub use estimation_item::{EstimationItem, EstimationItemInput, ItemStatus, ItemTotals};
