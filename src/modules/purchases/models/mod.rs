pub mod allocation;
pub mod purchase_request;

pub use allocation::{AllocationSummary, EstimationLink, ItemAllocation, LinkedItem};
pub use purchase_request::{PurchaseRequest, PurchaseRequestStatus};
