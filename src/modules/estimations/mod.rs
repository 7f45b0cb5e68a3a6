// Estimations module

pub mod controllers;
pub mod models;
pub mod repositories;
pub mod services;

pub use models::{CategoryBreakdown, Estimation, EstimationItem, EstimationStatus};
pub use repositories::EstimationRepository;
pub use services::{EstimationService, ItemCalculator};
