pub mod allocation_validator;
pub mod purchase_service;

pub use allocation_validator::AllocationValidator;
pub use purchase_service::{CreatePurchaseRequest, PurchaseService};
