//! Command-line interface definition

use crate::logging::LogFormat;
use crate::models::{DatasetSpec, OutputFormat};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Frame Latency Analyzer - summarize encoding latencies encoded in captured frame filenames
#[derive(Parser, Debug, Clone)]
#[command(name = "fla")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dataset to analyse as LABEL=DIRECTORY (repeatable, keeps order)
    #[arg(short, long = "dataset", value_name = "LABEL=DIR", value_parser = parse_dataset, action = ArgAction::Append)]
    pub datasets: Vec<DatasetSpec>,

    /// Path of the PNG histogram grid
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Histogram bins per panel
    #[arg(short, long, value_parser = parse_bins)]
    pub bins: Option<usize>,

    /// IQR multiplier for the outlier bounds
    #[arg(long, value_name = "K", value_parser = parse_iqr_factor)]
    pub iqr_factor: Option<f64>,

    /// Canvas width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Canvas height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Console output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Format of log lines on stderr
    #[arg(long, value_enum)]
    pub log_format: Option<LogFormat>,

    /// Print statistics only, do not render the image
    #[arg(long)]
    pub no_plot: bool,

    /// Force colored output
    #[arg(long)]
    pub color: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,

    /// Print an example .env file and exit
    #[arg(long, conflicts_with = "env_help")]
    pub env_example: bool,

    /// List the supported environment variables and exit
    #[arg(long)]
    pub env_help: bool,
}

impl Cli {
    /// Validate CLI arguments for conflicts and requirements
    pub fn validate(&self) -> Result<(), String> {
        if self.color && self.no_color {
            return Err("Cannot specify both --color and --no-color".to_string());
        }

        let mut seen = std::collections::HashSet::new();
        for dataset in &self.datasets {
            if !seen.insert(dataset.label.as_str()) {
                return Err(format!("Dataset label '{}' given more than once", dataset.label));
            }
        }

        if let Some(output) = &self.output {
            if output.as_os_str().is_empty() {
                return Err("--output cannot be empty".to_string());
            }
        }

        Ok(())
    }

    /// Explicit color choice from the flags, if any
    pub fn color_override(&self) -> Option<bool> {
        if self.color {
            Some(true)
        } else if self.no_color {
            Some(false)
        } else {
            None
        }
    }

    /// Check if colors should be enabled
    pub fn use_colors(&self) -> bool {
        self.color_override().unwrap_or_else(supports_color)
    }
}

fn parse_dataset(s: &str) -> Result<DatasetSpec, String> {
    s.parse::<DatasetSpec>().map_err(|e| e.to_string())
}

fn parse_bins(s: &str) -> Result<usize, String> {
    let min = crate::models::config::MIN_BINS;
    let max = crate::models::config::MAX_BINS;
    s.parse::<usize>()
        .map_err(|_| format!("Invalid bin count: {}", s))
        .and_then(|bins| {
            if (min..=max).contains(&bins) {
                Ok(bins)
            } else {
                Err(format!("Bins must be between {} and {}", min, max))
            }
        })
}

fn parse_iqr_factor(s: &str) -> Result<f64, String> {
    s.parse::<f64>()
        .map_err(|_| format!("Invalid IQR factor: {}", s))
        .and_then(|factor| {
            if factor.is_finite() && factor >= 0.0 {
                Ok(factor)
            } else {
                Err("IQR factor must be a finite, non-negative number".to_string())
            }
        })
}

/// Check if the terminal supports color output
fn supports_color() -> bool {
    if let Ok(term) = std::env::var("TERM") {
        if term == "dumb" {
            return false;
        }
    }

    if std::env::var("NO_COLOR").is_ok() {
        return false;
    }

    if std::env::var("FORCE_COLOR").is_ok() {
        return true;
    }

    #[cfg(target_os = "windows")]
    {
        if std::env::var("ANSICON").is_ok() || std::env::var("ConEmuANSI").is_ok() {
            return true;
        }
    }

    #[cfg(unix)]
    {
        true
    }
    #[cfg(not(unix))]
    {
        false
    }
}
