pub mod app;
pub mod config;
pub mod controller;
pub mod logging;
pub mod sources;
pub mod ui;
