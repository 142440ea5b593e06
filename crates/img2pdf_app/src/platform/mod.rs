pub mod app;
pub mod config;
pub mod effects;
pub mod files;
pub mod logging;
pub mod shell;
pub mod ui;
