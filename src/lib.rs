pub mod apis;
pub mod config;
pub mod constants;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod report;
pub mod types;

// Layered boundaries for application and infrastructure
pub mod app;
pub mod infra;
