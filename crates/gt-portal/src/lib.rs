pub mod config;
pub mod error;
pub mod images;
pub mod telemetry;
