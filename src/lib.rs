//! Frame Latency Analyzer
//!
//! Reads per-frame encoding latencies from captured frame filenames
//! (`..._<ms>ms.jpg`), removes IQR outliers, prints per-dataset statistics
//! and renders a grid of latency histograms.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod output;
pub mod render;
pub mod scan;
pub mod stats;

// Re-export commonly used types
pub use app::{App, DatasetAnalysis, DatasetOutcome, RunReport};
pub use error::{AppError, Result};
pub use models::{Config, DatasetSpec, OutputFormat};
pub use output::{OutputFormatter, ColoredFormatter, PlainFormatter, OutputFormatterFactory, JsonReport};
pub use render::{HistogramGrid, RenderOptions};
pub use scan::{scan_directory, DirectoryScanner, LatencyFilenameParser, LatencySample};
pub use stats::{filter_outliers, Histogram, IqrBounds, LatencySummary};

/// Application version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PKG_NAME: &str = env!("CARGO_PKG_NAME");
pub const PKG_DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Default configuration values
pub mod defaults {
    /// Capture rigs compared in a standard run, in panel order
    pub const DEFAULT_DATASETS: &[(&str, &str)] = &[
        ("V1 vis.0 (1920x1080 H.264)", "test_results/v1_vis0"),
        ("V1 vis.1 (1280x720 MJPEG)", "test_results/v1_vis1"),
        ("V2 vis.0 (1920x1080 H.264)", "test_results/v2_vis0"),
        ("V2 vis.1 (1280x720 MJPEG)", "test_results/v2_vis1"),
    ];
    pub const DEFAULT_OUTPUT_PATH: &str = "latency_analysis.png";
    pub const DEFAULT_BINS: usize = 40;
    pub const DEFAULT_IQR_FACTOR: f64 = 1.5;
    pub const DEFAULT_WIDTH: u32 = 2100;
    pub const DEFAULT_HEIGHT: u32 = 1500;
    pub const DEFAULT_ENABLE_COLOR: bool = true;
    pub const FIGURE_TITLE: &str = "Frame Encoding Latency Analysis (Outliers Removed)";
}
