//! Configuration validation utilities and rules

use crate::{
    error::Result,
    models::{config::grid_shape_for, Config, DatasetSpec},
};
use colored::*;

/// IQR multiplier of Tukey's fences
pub const STANDARD_IQR_FACTOR: f64 = 1.5;

/// Configuration validator with advanced validation rules
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validate configuration with comprehensive checks
    pub fn validate_comprehensive(config: &Config) -> Result<Vec<ValidationWarning>> {
        let mut warnings = Vec::new();

        config.validate()?;

        warnings.extend(Self::validate_datasets(&config.datasets));
        warnings.extend(Self::validate_analysis_settings(config));
        warnings.extend(Self::validate_output(config));

        Ok(warnings)
    }

    /// Directory checks; a missing directory is reported later as "No files found"
    fn validate_datasets(datasets: &[DatasetSpec]) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        for dataset in datasets {
            let dir = &dataset.directory;
            if !dir.exists() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("Directory '{}' for dataset '{}' does not exist", dir.display(), dataset.label),
                ));
            } else if !dir.is_dir() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Warning,
                    format!("'{}' for dataset '{}' is not a directory", dir.display(), dataset.label),
                ));
            }
        }

        if datasets.len() > 4 {
            let (rows, cols) = grid_shape_for(datasets.len());
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("{} datasets will be drawn on a {}x{} grid", datasets.len(), rows, cols),
            ));
        }

        warnings
    }

    fn validate_analysis_settings(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if config.bins < 5 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!("{} histogram bins will hide most of the distribution shape (recommended: >= 5)", config.bins),
            ));
        } else if config.bins > 200 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("{} histogram bins may leave most bins empty", config.bins),
            ));
        }

        if config.iqr_factor < 1.0 {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Warning,
                format!(
                    "IQR factor {} is aggressive and may discard ordinary frames (standard: {})",
                    config.iqr_factor, STANDARD_IQR_FACTOR
                ),
            ));
        } else if config.iqr_factor != STANDARD_IQR_FACTOR {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("Using non-standard IQR factor {} (standard: {})", config.iqr_factor, STANDARD_IQR_FACTOR),
            ));
        }

        warnings
    }

    fn validate_output(config: &Config) -> Vec<ValidationWarning> {
        let mut warnings = Vec::new();

        if !config.plot {
            return warnings;
        }

        if let Some(parent) = config.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if !parent.exists() {
                warnings.push(ValidationWarning::new(
                    ValidationLevel::Info,
                    format!("Output directory '{}' will be created", parent.display()),
                ));
            }
        }

        if config.output_path.exists() {
            warnings.push(ValidationWarning::new(
                ValidationLevel::Info,
                format!("'{}' will be overwritten", config.output_path.display()),
            ));
        }

        warnings
    }
}

/// Validation warning levels
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationLevel {
    Info,
    Warning,
    Error,
}

impl ValidationLevel {
    /// Get display string for level
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
        }
    }

    /// Get color for terminal display
    pub fn color(&self) -> Color {
        match self {
            Self::Info => Color::Blue,
            Self::Warning => Color::Yellow,
            Self::Error => Color::Red,
        }
    }
}

/// Configuration validation warning
#[derive(Debug, Clone)]
pub struct ValidationWarning {
    pub level: ValidationLevel,
    pub message: String,
}

impl ValidationWarning {
    /// Create a new validation warning
    pub fn new(level: ValidationLevel, message: String) -> Self {
        Self { level, message }
    }

    /// Format warning for display
    pub fn format(&self, use_color: bool) -> String {
        let tag = format!("[{}]", self.level.as_str());
        if use_color {
            format!("{} {}", tag.color(self.level.color()).bold(), self.message)
        } else {
            format!("{} {}", tag, self.message)
        }
    }
}

/// Convenience function for comprehensive configuration validation
pub fn validate_config(config: &Config) -> Result<Vec<ValidationWarning>> {
    ConfigValidator::validate_comprehensive(config)
}
