pub mod estimation_repository;

pub use estimation_repository::{EstimationRepository, NewEstimation};
