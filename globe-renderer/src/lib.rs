pub mod app;
pub mod control;
pub mod data;
pub mod render;
