//! Output formatting and display system
//!
//! Console summaries come in plain and colored flavours behind the
//! [`OutputFormatter`] trait; `--format json` uses [`JsonReport`] instead.

mod formatter;
mod colored;
mod json;

pub use formatter::{
    OutputFormatter,
    PlainFormatter,
    FormattingOptions,
};
pub use colored::{
    ColoredFormatter,
    ColorScheme,
    LatencyLevel,
};
pub use json::{DatasetEntry, JsonReport, MetadataEntry};

/// Output formatting factory for creating appropriate formatters
pub struct OutputFormatterFactory;

impl OutputFormatterFactory {
    /// Create a formatter based on color support and preferences
    pub fn create_formatter(enable_color: bool, verbose: bool) -> Box<dyn OutputFormatter> {
        let options = FormattingOptions {
            enable_color,
            verbose_mode: verbose,
        };

        if enable_color {
            Box::new(ColoredFormatter::new(options))
        } else {
            Box::new(PlainFormatter::new(options))
        }
    }
}
