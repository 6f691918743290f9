//! Machine-readable report for `--format json`

use crate::{
    app::DatasetAnalysis,
    error::Result,
    models::Config,
    scan::FrameMetadataSummary,
    stats::{IqrBounds, LatencySummary},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Whole-run report
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    pub version: String,
    pub generated_at: DateTime<Utc>,
    pub iqr_factor: f64,
    pub bins: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<PathBuf>,
    pub datasets: Vec<DatasetEntry>,
}

/// One dataset, in configuration order
#[derive(Debug, Clone, Serialize)]
pub struct DatasetEntry {
    pub label: String,
    pub directory: PathBuf,
    /// `analyzed` or `no_files`
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<LatencySummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounds: Option<IqrBounds>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MetadataEntry>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetadataEntry {
    #[serde(flatten)]
    pub summary: FrameMetadataSummary,
    pub capture_span_secs: Option<f64>,
}

impl JsonReport {
    pub fn new(config: &Config, analyses: &[DatasetAnalysis], image_path: Option<&Path>) -> Self {
        let datasets = analyses
            .iter()
            .map(|analysis| {
                let analyzed = analysis.analyzed();
                DatasetEntry {
                    label: analysis.spec.label.clone(),
                    directory: analysis.spec.directory.clone(),
                    status: if analyzed.is_some() { "analyzed" } else { "no_files" },
                    summary: analyzed.map(|a| a.summary.clone()),
                    bounds: analyzed.map(|a| a.filtered.bounds),
                    metadata: analyzed.map(|a| MetadataEntry {
                        capture_span_secs: a.metadata.capture_span_secs(),
                        summary: a.metadata.clone(),
                    }),
                }
            })
            .collect();

        Self {
            version: crate::VERSION.to_string(),
            generated_at: Utc::now(),
            iqr_factor: config.iqr_factor,
            bins: config.bins,
            image_path: image_path.map(Path::to_path_buf),
            datasets,
        }
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
