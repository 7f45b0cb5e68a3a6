pub mod payment_repository;
pub mod target_data_source;

pub use payment_repository::PaymentRepository;
pub use target_data_source::{PgTargetDataSource, TargetDataSource};
