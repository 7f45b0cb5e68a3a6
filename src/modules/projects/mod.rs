// Projects module

pub mod controllers;
pub mod models;
pub mod repositories;

pub use models::{Project, ProjectStage};
pub use repositories::ProjectRepository;
