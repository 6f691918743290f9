//! Environment variable handling and .env file management

use crate::error::{AppError, Result};
use crate::models::config::env_keys;
use crate::models::Config;
use std::path::Path;

/// Environment variable configuration manager
pub struct EnvManager;

impl EnvManager {
    /// Load .env file if it exists
    pub fn load_env_file(debug: bool) -> Result<()> {
        Self::load_env_file_from(Path::new(".env"), debug)
    }

    /// Load a specific env file; variables already set in the process win
    pub fn load_env_file_from(path: &Path, debug: bool) -> Result<()> {
        if path.exists() {
            dotenv::from_path(path)
                .map_err(|e| AppError::config(format!("Failed to load {}: {}", path.display(), e)))?;

            if debug {
                eprintln!("Loaded configuration from {}", path.display());
                for warning in Self::check_env_file(path)?.unwrap_or_default() {
                    eprintln!("  {}", warning);
                }
            }
        } else if debug {
            eprintln!("No {} file found, using defaults and CLI arguments", path.display());
        }

        Ok(())
    }

    /// Create example .env file content
    pub fn create_example_env_content() -> String {
        r#"# Frame Latency Analyzer Configuration
#
# Values here are used as defaults and can be overridden by real
# environment variables and then by command-line arguments.

# Datasets to analyse, in panel order (label=directory, separated by ';')
# LATENCY_DATASETS=V1 vis.0 (1920x1080 H.264)=test_results/v1_vis0;V1 vis.1 (1280x720 MJPEG)=test_results/v1_vis1

# Where the histogram grid is written (must end in .png)
# LATENCY_OUTPUT=latency_analysis.png

# Histogram bins per panel (1-1000)
# LATENCY_BINS=40

# IQR multiplier for outlier removal
# LATENCY_IQR_FACTOR=1.5

# Canvas size in pixels (200-10000)
# LATENCY_WIDTH=2100
# LATENCY_HEIGHT=1500

# Console output format (text or json)
# LATENCY_FORMAT=text

# Enable colored output (true/false)
# ENABLE_COLOR=true

# Log line format on stderr (console, json or compact)
# LATENCY_LOG_FORMAT=console
"#.to_string()
    }

    /// Validate a single variable the way the configuration loader would apply it
    pub fn validate_env_var(key: &str, value: &str) -> Result<()> {
        if !env_keys::ALL.contains(&key) {
            return Ok(());
        }

        let mut config = Config::default();
        config.merge_from_lookup(|k| (k == key).then(|| value.to_string()))?;
        config.validate()
    }

    /// Get list of all supported environment variables with descriptions
    pub fn get_supported_env_vars() -> Vec<(&'static str, &'static str, &'static str)> {
        vec![
            (env_keys::DATASETS, "Datasets as label=dir, separated by ';'", "cam0=results/cam0;cam1=results/cam1"),
            (env_keys::OUTPUT, "Path of the PNG histogram grid", "latency_analysis.png"),
            (env_keys::BINS, "Histogram bins per panel (1-1000)", "40"),
            (env_keys::IQR_FACTOR, "IQR multiplier for outlier bounds", "1.5"),
            (env_keys::WIDTH, "Canvas width in pixels (200-10000)", "2100"),
            (env_keys::HEIGHT, "Canvas height in pixels (200-10000)", "1500"),
            (env_keys::FORMAT, "Console output format (text, json)", "text"),
            (env_keys::ENABLE_COLOR, "Enable colored output", "true"),
            (env_keys::LOG_FORMAT, "Log line format (console, json, compact)", "json"),
        ]
    }

    /// Display environment variable help
    pub fn display_env_help() -> String {
        let mut help = String::new();
        help.push_str("Supported Environment Variables:\n\n");

        for (var, description, example) in Self::get_supported_env_vars() {
            help.push_str(&format!("  {:<20} {}\n", var, description));
            help.push_str(&format!("  {:<20} Example: {}\n\n", "", example));
        }

        help.push_str("Configuration Priority (highest to lowest):\n");
        help.push_str("  1. Command-line arguments\n");
        help.push_str("  2. Environment variables\n");
        help.push_str("  3. .env file values\n");
        help.push_str("  4. Default values\n");

        help
    }

    /// Validate the assignments of an env file without loading it
    pub fn check_env_file(path: &Path) -> Result<Option<Vec<String>>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::config(format!("Failed to read {}: {}", path.display(), e)))?;

        let warnings = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'))
            .filter_map(|line| {
                let (key, value) = line.split_once('=')?;
                Self::validate_env_var(key.trim(), value.trim())
                    .err()
                    .map(|e| format!("Line '{}': {}", line, e))
            })
            .collect();

        Ok(Some(warnings))
    }
}
