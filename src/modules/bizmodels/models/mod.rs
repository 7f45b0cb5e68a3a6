pub mod biz_model;
pub mod milestone;

pub use biz_model::{BizModel, BizModelStatus, CategoryDefinition, CategoryRates};
pub use milestone::{Milestone, MilestoneDirection};
