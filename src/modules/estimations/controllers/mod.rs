pub mod estimation_controller;
