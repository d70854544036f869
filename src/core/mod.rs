pub mod analysis;
pub mod client;
pub mod config;
pub mod error;
pub mod formatter;
pub mod models;
pub mod months;
pub mod report;
