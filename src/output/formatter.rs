//! Core formatting trait and the plain text implementation
//!
//! The plain layout matches the console summary the analysis has always
//! printed, so existing notes and scripts that grep it keep working.

use crate::{
    app::{AnalyzedDataset, DatasetAnalysis},
    error::Result,
};
use std::fmt::Write as _;
use std::path::Path;

/// Main trait for output formatting
pub trait OutputFormatter {
    /// Format a section header
    fn format_header(&self, title: &str) -> Result<String>;

    /// Format the summary block of one dataset
    fn format_dataset(&self, analysis: &DatasetAnalysis) -> Result<String>;

    /// Format the closing notice naming the saved image
    fn format_saved(&self, path: &Path) -> Result<String>;

    /// Format warning messages
    fn format_warning(&self, warning: &str) -> Result<String>;
}

/// Configuration options for formatting
#[derive(Debug, Clone)]
pub struct FormattingOptions {
    /// Enable colored output
    pub enable_color: bool,
    /// Add IQR bounds and capture metadata to each block
    pub verbose_mode: bool,
}

impl Default for FormattingOptions {
    fn default() -> Self {
        Self {
            enable_color: true,
            verbose_mode: false,
        }
    }
}

/// Plain text formatter
pub struct PlainFormatter {
    options: FormattingOptions,
}

impl PlainFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FormattingOptions {
        &self.options
    }

    /// Verbose lines shared with the colored formatter
    pub(crate) fn verbose_lines(analyzed: &AnalyzedDataset) -> Vec<String> {
        let bounds = &analyzed.filtered.bounds;
        let mut lines = vec![format!(
            "IQR bounds: {:.2}ms - {:.2}ms (Q1 {:.2}ms, Q3 {:.2}ms, factor {})",
            bounds.lower, bounds.upper, bounds.q1, bounds.q3, bounds.factor
        )];

        let metadata = &analyzed.metadata;
        lines.push(format!("Frames with capture metadata: {}", metadata.frames_with_metadata));
        if metadata.frames_with_metadata > 0 {
            lines.push(format!("Invalid hardware timestamps: {}", metadata.invalid_hardware_timestamps));
        }
        if let (Some(first), Some(span)) = (metadata.first_capture, metadata.capture_span_secs()) {
            lines.push(format!(
                "Capture window: {} (+{:.3}s)",
                first.format("%Y-%m-%d %H:%M:%S%.3f"),
                span
            ));
        }

        lines
    }
}

impl OutputFormatter for PlainFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        Ok(format!("{}\n{}", title, "=".repeat(title.chars().count())))
    }

    fn format_dataset(&self, analysis: &DatasetAnalysis) -> Result<String> {
        let label = &analysis.spec.label;
        let Some(analyzed) = analysis.analyzed() else {
            return Ok(format!("{}: No files found\n", label));
        };
        let s = &analyzed.summary;

        let mut output = String::new();
        writeln!(output)?;
        writeln!(output, "{}", label)?;
        writeln!(output, "  Total frames: {}", s.total_frames)?;
        writeln!(output, "  Outliers removed: {}", s.outliers_removed)?;
        writeln!(output, "  Valid frames: {}", s.valid_frames)?;
        writeln!(output, "  Mean latency: {:.2}ms", s.mean_ms)?;
        writeln!(output, "  Median latency: {:.2}ms", s.median_ms)?;
        writeln!(output, "  Std deviation: {:.2}ms", s.std_dev_ms)?;
        writeln!(output, "  Min latency: {}ms", s.min_ms)?;
        writeln!(output, "  Max latency: {}ms", s.max_ms)?;

        if self.options.verbose_mode {
            for line in Self::verbose_lines(analyzed) {
                writeln!(output, "  {}", line)?;
            }
        }

        Ok(output)
    }

    fn format_saved(&self, path: &Path) -> Result<String> {
        Ok(format!("\n\nHistogram saved to: {}", path.display()))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("Warning: {}", warning))
    }
}
