// Business models module

pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{BizModel, BizModelStatus, CategoryDefinition, CategoryRates, Milestone};
pub use repositories::BizModelRepository;
