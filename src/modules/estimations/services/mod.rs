pub mod estimation_service;
pub mod item_calculator;

pub use estimation_service::{CreateEstimationRequest, EstimationService, OverpaymentReport};
pub use item_calculator::{DiscountCheck, EstimationTotals, ItemCalculator};
