pub mod purchase_controller;
