pub mod payment_service;
pub mod target_calculator;

pub use payment_service::PaymentService;
pub use target_calculator::PaymentTargetCalculator;
