//! Main application orchestration: scan, filter, summarize, report, render

use crate::{
    error::Result,
    logging::{Logger, LoggerFactory, PerformanceLogger},
    models::{Config, DatasetSpec, OutputFormat},
    output::{JsonReport, OutputFormatterFactory},
    render::{HistogramGrid, RenderOptions},
    scan::{DirectoryScanner, FrameMetadataSummary},
    stats::{filter_outliers, FilteredSamples, Histogram, LatencySummary},
};
use serde::Serialize;
use std::path::PathBuf;

/// Everything computed for a dataset that had matching files
#[derive(Debug, Clone, Serialize)]
pub struct AnalyzedDataset {
    pub summary: LatencySummary,
    pub filtered: FilteredSamples,
    pub histogram: Histogram,
    pub metadata: FrameMetadataSummary,
}

/// Result of analysing one dataset
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DatasetOutcome {
    Analyzed(Box<AnalyzedDataset>),
    NoFiles,
}

/// A dataset paired with its outcome; the panel order follows the config
#[derive(Debug, Clone, Serialize)]
pub struct DatasetAnalysis {
    pub spec: DatasetSpec,
    pub outcome: DatasetOutcome,
}

impl DatasetAnalysis {
    pub fn analyzed(&self) -> Option<&AnalyzedDataset> {
        match &self.outcome {
            DatasetOutcome::Analyzed(analyzed) => Some(analyzed),
            DatasetOutcome::NoFiles => None,
        }
    }

    pub fn summary(&self) -> Option<&LatencySummary> {
        self.analyzed().map(|a| &a.summary)
    }

    pub fn has_files(&self) -> bool {
        self.analyzed().is_some()
    }
}

/// What a complete run produced
#[derive(Debug, Clone)]
pub struct RunReport {
    pub analyses: Vec<DatasetAnalysis>,
    /// Path of the rendered grid, if plotting was enabled
    pub image_path: Option<PathBuf>,
    /// Text written to stdout
    pub output: String,
}

/// Main application struct that coordinates all components
pub struct App {
    config: Config,
    logger: Logger,
    scanner: DirectoryScanner,
    perf: PerformanceLogger,
}

impl App {
    /// Create a new application instance from a validated configuration
    pub fn new(config: Config) -> Result<Self> {
        let factory = LoggerFactory::new(config.clone());
        let logger = factory.create_logger("APP");
        let scanner = DirectoryScanner::new(factory.create_logger("SCAN"))?;
        let perf = factory.create_performance_logger();

        Ok(Self { config, logger, scanner, perf })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Scan, filter and summarize a single dataset
    pub fn analyze_dataset(&self, spec: &DatasetSpec) -> Result<DatasetAnalysis> {
        let report = self.scanner.scan(&spec.directory)?;

        if report.is_empty() {
            self.logger.info("No latency files found")
                .field("dataset", &spec.label)
                .field("directory_found", report.directory_found)
                .log();
            return Ok(DatasetAnalysis {
                spec: spec.clone(),
                outcome: DatasetOutcome::NoFiles,
            });
        }

        let filtered = filter_outliers(&report.latencies(), self.config.iqr_factor)?;
        let summary = LatencySummary::from_filtered(&filtered)?;
        let histogram = Histogram::from_values(&filtered.retained, self.config.bins)?;
        let metadata = FrameMetadataSummary::from_samples(&report.samples);

        self.logger.debug("Filtered outliers")
            .field("dataset", &spec.label)
            .field("lower_bound", filtered.bounds.lower)
            .field("upper_bound", filtered.bounds.upper)
            .field("outliers", filtered.outlier_count())
            .log();

        Ok(DatasetAnalysis {
            spec: spec.clone(),
            outcome: DatasetOutcome::Analyzed(Box::new(AnalyzedDataset {
                summary,
                filtered,
                histogram,
                metadata,
            })),
        })
    }

    /// Analyse every configured dataset, in order
    pub fn analyze_all(&self) -> Result<Vec<DatasetAnalysis>> {
        self.config
            .datasets
            .iter()
            .map(|spec| self.analyze_dataset(spec))
            .collect()
    }

    /// Run the whole pipeline, print the report and render the grid
    pub fn run(mut self) -> Result<RunReport> {
        crate::log_debug!(self.logger, "Analysing {} datasets", self.config.datasets.len());
        self.perf.start_timing("analysis");
        let analyses = self.analyze_all()?;
        self.perf.end_timing("analysis");

        let image_path = if self.config.plot {
            self.perf.start_timing("render");
            let grid = HistogramGrid::new(RenderOptions::from_config(&self.config));
            grid.render(&analyses, &self.config.output_path)?;
            self.perf.end_timing("render");

            self.logger.info("Histogram grid written")
                .field("path", self.config.output_path.display().to_string())
                .log();
            Some(self.config.output_path.clone())
        } else {
            None
        };

        let output = match self.config.output_format {
            OutputFormat::Json => {
                JsonReport::new(&self.config, &analyses, image_path.as_deref()).to_json_pretty()?
            }
            OutputFormat::Text => {
                let formatter = OutputFormatterFactory::create_formatter(
                    self.config.enable_color,
                    self.config.verbose,
                );
                let mut text = String::new();
                for analysis in &analyses {
                    text.push_str(&formatter.format_dataset(analysis)?);
                }
                if let Some(path) = &image_path {
                    text.push_str(&formatter.format_saved(path)?);
                }
                text
            }
        };

        println!("{}", output);

        Ok(RunReport {
            analyses,
            image_path,
            output,
        })
    }
}
