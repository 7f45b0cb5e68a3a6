// Purchase requests module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{EstimationLink, ItemAllocation, PurchaseRequest, PurchaseRequestStatus};
pub use repositories::PurchaseRepository;
pub use services::{AllocationValidator, PurchaseService};
