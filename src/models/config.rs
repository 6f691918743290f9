//! Configuration data model and validation

use crate::error::{AppError, Result};
use crate::logging::LogFormat;
use crate::models::dataset::DatasetSpec;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;
use std::str::FromStr;

/// Environment variable names understood by [`Config::merge_from_env`]
pub mod env_keys {
    pub const DATASETS: &str = "LATENCY_DATASETS";
    pub const OUTPUT: &str = "LATENCY_OUTPUT";
    pub const BINS: &str = "LATENCY_BINS";
    pub const IQR_FACTOR: &str = "LATENCY_IQR_FACTOR";
    pub const WIDTH: &str = "LATENCY_WIDTH";
    pub const HEIGHT: &str = "LATENCY_HEIGHT";
    pub const FORMAT: &str = "LATENCY_FORMAT";
    pub const ENABLE_COLOR: &str = "ENABLE_COLOR";
    pub const LOG_FORMAT: &str = "LATENCY_LOG_FORMAT";

    pub const ALL: &[&str] = &[DATASETS, OUTPUT, BINS, IQR_FACTOR, WIDTH, HEIGHT, FORMAT, ENABLE_COLOR, LOG_FORMAT];
}

pub const MIN_BINS: usize = 1;
pub const MAX_BINS: usize = 1000;
pub const MIN_CANVAS_PX: u32 = 200;
pub const MAX_CANVAS_PX: u32 = 10_000;

/// Console output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable per-dataset summary
    #[default]
    Text,
    /// Machine-readable JSON report
    Json,
}

impl FromStr for OutputFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(AppError::parse(format!("Unknown output format '{}', expected text or json", other))),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Labelled result directories, in panel order
    #[serde(default = "default_datasets")]
    pub datasets: Vec<DatasetSpec>,

    /// Where the histogram grid is written
    #[serde(default = "default_output_path")]
    pub output_path: PathBuf,

    /// Histogram bins per panel
    #[serde(default = "default_bins")]
    pub bins: usize,

    /// Multiplier applied to the IQR when computing outlier bounds
    #[serde(default = "default_iqr_factor")]
    pub iqr_factor: f64,

    /// Canvas width in pixels
    #[serde(default = "default_width")]
    pub width: u32,

    /// Canvas height in pixels
    #[serde(default = "default_height")]
    pub height: u32,

    /// Enable colored terminal output
    #[serde(default = "default_enable_color")]
    pub enable_color: bool,

    /// Console output format
    #[serde(default)]
    pub output_format: OutputFormat,

    /// Format of the log lines written to stderr
    #[serde(default)]
    pub log_format: LogFormat,

    /// Render the histogram image
    #[serde(default = "default_plot")]
    pub plot: bool,

    /// Enable verbose output
    #[serde(default)]
    pub verbose: bool,

    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            datasets: default_datasets(),
            output_path: default_output_path(),
            bins: default_bins(),
            iqr_factor: default_iqr_factor(),
            width: default_width(),
            height: default_height(),
            enable_color: default_enable_color(),
            output_format: OutputFormat::default(),
            log_format: LogFormat::default(),
            plot: default_plot(),
            verbose: false,
            debug: false,
        }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Result<()> {
        if self.datasets.is_empty() {
            return Err(AppError::config("At least one dataset is required"));
        }

        let mut labels = HashSet::new();
        for dataset in &self.datasets {
            if dataset.label.trim().is_empty() {
                return Err(AppError::config("Dataset label cannot be empty"));
            }
            if dataset.directory.as_os_str().is_empty() {
                return Err(AppError::config(format!("Dataset '{}' has an empty directory", dataset.label)));
            }
            if !labels.insert(dataset.label.as_str()) {
                return Err(AppError::config(format!("Duplicate dataset label: {}", dataset.label)));
            }
        }

        if !(MIN_BINS..=MAX_BINS).contains(&self.bins) {
            return Err(AppError::config(format!(
                "Bins must be between {} and {}, got: {}",
                MIN_BINS, MAX_BINS, self.bins
            )));
        }

        if !self.iqr_factor.is_finite() || self.iqr_factor < 0.0 {
            return Err(AppError::config(format!(
                "IQR factor must be a finite, non-negative number, got: {}",
                self.iqr_factor
            )));
        }

        for (name, value) in [("Width", self.width), ("Height", self.height)] {
            if !(MIN_CANVAS_PX..=MAX_CANVAS_PX).contains(&value) {
                return Err(AppError::config(format!(
                    "{} must be between {} and {} pixels, got: {}",
                    name, MIN_CANVAS_PX, MAX_CANVAS_PX, value
                )));
            }
        }

        let is_png = self
            .output_path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("png"))
            .unwrap_or(false);
        if !is_png {
            return Err(AppError::config(format!(
                "Output path must end in .png: {}",
                self.output_path.display()
            )));
        }

        Ok(())
    }

    /// Number of grid rows and columns needed for the configured datasets
    pub fn grid_shape(&self) -> (usize, usize) {
        grid_shape_for(self.datasets.len())
    }

    /// Merge process environment variables into this configuration
    pub fn merge_from_env(&mut self) -> Result<()> {
        self.merge_from_lookup(|key| std::env::var(key).ok())
    }

    /// Merge values from an arbitrary key lookup (environment, tests)
    pub fn merge_from_lookup<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(datasets) = lookup(env_keys::DATASETS) {
            self.datasets = DatasetSpec::parse_list(&datasets)?;
        }

        if let Some(output) = lookup(env_keys::OUTPUT) {
            let output = output.trim();
            if !output.is_empty() {
                self.output_path = PathBuf::from(output);
            }
        }

        if let Some(bins) = lookup(env_keys::BINS) {
            self.bins = bins.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::BINS, bins, e)))?;
        }

        if let Some(factor) = lookup(env_keys::IQR_FACTOR) {
            self.iqr_factor = factor.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::IQR_FACTOR, factor, e)))?;
        }

        if let Some(width) = lookup(env_keys::WIDTH) {
            self.width = width.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::WIDTH, width, e)))?;
        }

        if let Some(height) = lookup(env_keys::HEIGHT) {
            self.height = height.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::HEIGHT, height, e)))?;
        }

        if let Some(format) = lookup(env_keys::FORMAT) {
            self.output_format = format.parse()?;
        }

        if let Some(enable_color) = lookup(env_keys::ENABLE_COLOR) {
            self.enable_color = enable_color.trim().parse()
                .map_err(|e| AppError::config(format!("Invalid {} value '{}': {}", env_keys::ENABLE_COLOR, enable_color, e)))?;
        }

        if let Some(log_format) = lookup(env_keys::LOG_FORMAT) {
            self.log_format = log_format.parse()?;
        }

        Ok(())
    }
}

/// Rows and columns for `count` panels: two columns, one for a single panel
pub fn grid_shape_for(count: usize) -> (usize, usize) {
    match count {
        0 => (0, 0),
        1 => (1, 1),
        n => ((n + 1) / 2, 2),
    }
}

// Default value functions for serde
fn default_datasets() -> Vec<DatasetSpec> {
    crate::defaults::DEFAULT_DATASETS
        .iter()
        .map(|(label, dir)| DatasetSpec::new(*label, *dir))
        .collect()
}

fn default_output_path() -> PathBuf {
    PathBuf::from(crate::defaults::DEFAULT_OUTPUT_PATH)
}

fn default_bins() -> usize {
    crate::defaults::DEFAULT_BINS
}

fn default_iqr_factor() -> f64 {
    crate::defaults::DEFAULT_IQR_FACTOR
}

fn default_width() -> u32 {
    crate::defaults::DEFAULT_WIDTH
}

fn default_height() -> u32 {
    crate::defaults::DEFAULT_HEIGHT
}

fn default_enable_color() -> bool {
    crate::defaults::DEFAULT_ENABLE_COLOR
}

fn default_plot() -> bool {
    true
}
