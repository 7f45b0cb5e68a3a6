pub mod biz_model_controller;
