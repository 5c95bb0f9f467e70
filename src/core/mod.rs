pub mod api;
pub mod clock;
pub mod config;
pub mod extension;
pub mod formatter;
pub mod lifecycle;
pub mod models;
pub mod pricing;
pub mod report;
