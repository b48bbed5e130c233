pub mod application_controllers;
pub mod background_runner;
pub mod input_controller;
pub mod ui_controller;
