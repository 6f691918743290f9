//! Colored formatter implementation with terminal color support
//!
//! Same line layout as the plain formatter, with labels highlighted and
//! latency figures tinted by how fast the encoder was.

use crate::{
    app::DatasetAnalysis,
    error::Result,
};
use super::formatter::{FormattingOptions, OutputFormatter, PlainFormatter};
use colored::*;
use std::fmt::Write as _;
use std::path::Path;

/// Latency classification for color coding
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LatencyLevel {
    Excellent, // < 33ms, inside one 30fps frame
    Good,      // 33-66ms
    Fair,      // 66-150ms
    Poor,      // 150-500ms
    VeryPoor,  // > 500ms
}

impl LatencyLevel {
    pub fn from_latency(latency_ms: f64) -> Self {
        if latency_ms < 33.0 {
            Self::Excellent
        } else if latency_ms < 66.0 {
            Self::Good
        } else if latency_ms < 150.0 {
            Self::Fair
        } else if latency_ms < 500.0 {
            Self::Poor
        } else {
            Self::VeryPoor
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Self::Excellent => Color::Green,
            Self::Good => Color::Cyan,
            Self::Fair => Color::Yellow,
            Self::Poor => Color::Magenta,
            Self::VeryPoor => Color::Red,
        }
    }
}

/// Color scheme configuration
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub muted: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            header: Color::Blue,
            success: Color::Green,
            warning: Color::Yellow,
            muted: Color::BrightBlack,
        }
    }
}

/// Colored formatter implementation
pub struct ColoredFormatter {
    options: FormattingOptions,
    color_scheme: ColorScheme,
}

impl ColoredFormatter {
    pub fn new(options: FormattingOptions) -> Self {
        Self::with_color_scheme(options, ColorScheme::default())
    }

    pub fn with_color_scheme(options: FormattingOptions, color_scheme: ColorScheme) -> Self {
        Self { options, color_scheme }
    }

    /// Apply color to text if colors are enabled
    fn colorize(&self, text: &str, color: Color) -> ColoredString {
        if self.options.enable_color {
            text.color(color)
        } else {
            text.normal()
        }
    }

    fn bold(&self, text: &str) -> ColoredString {
        if self.options.enable_color {
            text.bold()
        } else {
            text.normal()
        }
    }

    fn latency(&self, latency_ms: f64, text: String) -> ColoredString {
        self.colorize(&text, LatencyLevel::from_latency(latency_ms).color())
    }
}

impl OutputFormatter for ColoredFormatter {
    fn format_header(&self, title: &str) -> Result<String> {
        let rule = "=".repeat(title.chars().count());
        let heading = if self.options.enable_color {
            title.bold().color(self.color_scheme.header)
        } else {
            title.normal()
        };
        Ok(format!("{}\n{}", heading, self.colorize(&rule, self.color_scheme.muted)))
    }

    fn format_dataset(&self, analysis: &DatasetAnalysis) -> Result<String> {
        let label = &analysis.spec.label;
        let Some(analyzed) = analysis.analyzed() else {
            return Ok(format!(
                "{}: {}\n",
                self.bold(label),
                self.colorize("No files found", self.color_scheme.warning)
            ));
        };
        let s = &analyzed.summary;

        let outliers = if s.outliers_removed > 0 {
            self.colorize(&s.outliers_removed.to_string(), self.color_scheme.warning)
        } else {
            self.colorize("0", self.color_scheme.success)
        };

        let mut output = String::new();
        writeln!(output)?;
        writeln!(output, "{}", self.bold(label))?;
        writeln!(output, "  Total frames: {}", s.total_frames)?;
        writeln!(output, "  Outliers removed: {}", outliers)?;
        writeln!(output, "  Valid frames: {}", s.valid_frames)?;
        writeln!(output, "  Mean latency: {}", self.latency(s.mean_ms, format!("{:.2}ms", s.mean_ms)))?;
        writeln!(output, "  Median latency: {}", self.latency(s.median_ms, format!("{:.2}ms", s.median_ms)))?;
        writeln!(output, "  Std deviation: {:.2}ms", s.std_dev_ms)?;
        writeln!(output, "  Min latency: {}", self.latency(s.min_ms as f64, format!("{}ms", s.min_ms)))?;
        writeln!(output, "  Max latency: {}", self.latency(s.max_ms as f64, format!("{}ms", s.max_ms)))?;

        if self.options.verbose_mode {
            for line in PlainFormatter::verbose_lines(analyzed) {
                writeln!(output, "  {}", self.colorize(&line, self.color_scheme.muted))?;
            }
        }

        Ok(output)
    }

    fn format_saved(&self, path: &Path) -> Result<String> {
        Ok(format!(
            "\n\n{} {}",
            self.colorize("Histogram saved to:", self.color_scheme.success),
            path.display()
        ))
    }

    fn format_warning(&self, warning: &str) -> Result<String> {
        Ok(format!("{} {}", self.colorize("⚠️  Warning:", self.color_scheme.warning), warning))
    }
}
