//! Directory scanning for latency samples
//!
//! Only directory listings are read; file contents are never opened.

pub mod filename;

pub use filename::{
    FrameMetadata, FrameMetadataSummary, LatencyFilenameParser, LatencySample,
    FRAME_FILENAME_PATTERN, LATENCY_FILENAME_PATTERN,
};

use crate::{
    error::{ErrorContext, Result},
    logging::Logger,
};
use std::fs;
use std::path::Path;

/// What a directory listing produced
#[derive(Debug, Clone, Default)]
pub struct ScanReport {
    /// The directory existed when scanned
    pub directory_found: bool,
    /// Entries in the listing
    pub entries_seen: usize,
    /// Matching samples, sorted by file name
    pub samples: Vec<LatencySample>,
    /// Names carrying the suffix whose value does not fit in a `u64`
    pub overflowed: Vec<String>,
}

impl ScanReport {
    /// Latency values in listing order
    pub fn latencies(&self) -> Vec<u64> {
        self.samples.iter().map(|s| s.latency_ms).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Lists result directories and turns matching file names into samples
pub struct DirectoryScanner {
    parser: LatencyFilenameParser,
    logger: Logger,
}

impl DirectoryScanner {
    pub fn new(logger: Logger) -> Result<Self> {
        Ok(Self {
            parser: LatencyFilenameParser::new()?,
            logger,
        })
    }

    pub fn parser(&self) -> &LatencyFilenameParser {
        &self.parser
    }

    /// Scan one directory. A missing directory yields an empty report.
    pub fn scan(&self, directory: &Path) -> Result<ScanReport> {
        let mut report = ScanReport::default();

        if !directory.exists() {
            self.logger.debug("Directory does not exist")
                .field("directory", directory.display().to_string())
                .log();
            return Ok(report);
        }
        report.directory_found = true;

        let entries = fs::read_dir(directory)
            .with_context(|| format!("Failed to list {}", directory.display()))?;

        for entry in entries {
            let entry = entry.with_context(|| format!("Failed to read entry in {}", directory.display()))?;
            report.entries_seen += 1;

            let file_name = entry.file_name();
            let Some(name) = file_name.to_str() else {
                self.logger.debug("Skipping non UTF-8 file name")
                    .field("file_name", file_name.to_string_lossy())
                    .log();
                continue;
            };

            match self.parser.parse_sample(name) {
                Some(sample) => report.samples.push(sample),
                None if self.parser.latency_digits(name).is_some() => {
                    self.logger.warn("Latency value out of range, file skipped")
                        .field("file_name", name)
                        .log();
                    report.overflowed.push(name.to_string());
                }
                None => {}
            }
        }

        report.samples.sort_by(|a, b| a.file_name.cmp(&b.file_name));

        self.logger.debug("Scanned directory")
            .field("directory", directory.display().to_string())
            .field("entries", report.entries_seen)
            .field("samples", report.samples.len())
            .log();

        Ok(report)
    }
}

/// Latency samples found in `directory`, using a warn-level logger
pub fn scan_directory<P: AsRef<Path>>(directory: P) -> Result<Vec<LatencySample>> {
    let mut logger = Logger::new("SCAN".to_string());
    logger.set_level(crate::logging::LogLevel::Warn);
    let scanner = DirectoryScanner::new(logger)?;
    Ok(scanner.scan(directory.as_ref())?.samples)
}
