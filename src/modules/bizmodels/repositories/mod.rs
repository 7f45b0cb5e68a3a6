pub mod biz_model_repository;

pub use biz_model_repository::BizModelRepository;
