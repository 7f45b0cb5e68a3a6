pub mod customer_payment;
pub mod payment_target;

pub use customer_payment::{CustomerPayment, PaymentStatus, PaymentType};
pub use payment_target::{CategoryTarget, PaymentTargetReport};
