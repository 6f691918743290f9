//! Data models and structures for the frame latency analyzer

pub mod config;
pub mod dataset;

// Re-export main model types
pub use config::{Config, OutputFormat};
pub use dataset::DatasetSpec;
