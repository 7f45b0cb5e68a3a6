// Payments module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CategoryTarget, CustomerPayment, PaymentStatus, PaymentTargetReport};
pub use repositories::{PaymentRepository, PgTargetDataSource, TargetDataSource};
pub use services::{PaymentService, PaymentTargetCalculator};
