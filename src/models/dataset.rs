//! Labelled result directories

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// One labelled directory of captured frames
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    /// Panel title and console heading
    pub label: String,
    /// Directory whose file names carry the latencies
    pub directory: PathBuf,
}

impl DatasetSpec {
    pub fn new<L: Into<String>, P: Into<PathBuf>>(label: L, directory: P) -> Self {
        Self {
            label: label.into(),
            directory: directory.into(),
        }
    }

    /// Parse a `;`-separated list of `label=path` entries, skipping blanks
    pub fn parse_list(value: &str) -> Result<Vec<Self>> {
        value
            .split(';')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| entry.parse::<Self>())
            .collect()
    }
}

impl FromStr for DatasetSpec {
    type Err = AppError;

    /// Parse `label=path`; the label ends at the first `=`
    fn from_str(s: &str) -> Result<Self> {
        let (label, directory) = s
            .split_once('=')
            .ok_or_else(|| AppError::parse(format!("Dataset '{}' must have the form LABEL=PATH", s)))?;

        let label = label.trim();
        let directory = directory.trim();
        if label.is_empty() || directory.is_empty() {
            return Err(AppError::parse(format!("Dataset '{}' needs both a label and a path", s)));
        }

        Ok(Self::new(label, directory))
    }
}

impl fmt::Display for DatasetSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.label, self.directory.display())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dataset() {
        let spec: DatasetSpec = "V1 vis.0 (1920x1080 H.264)=test_results/v1_vis0".parse().unwrap();
        assert_eq!(spec.label, "V1 vis.0 (1920x1080 H.264)");
        assert_eq!(spec.directory, PathBuf::from("test_results/v1_vis0"));
    }

    #[test]
    fn test_path_may_contain_equals() {
        let spec: DatasetSpec = "run=/tmp/a=b".parse().unwrap();
        assert_eq!(spec.label, "run");
        assert_eq!(spec.directory, PathBuf::from("/tmp/a=b"));
    }

    #[test]
    fn test_parse_rejects_missing_parts() {
        assert!("no-separator".parse::<DatasetSpec>().is_err());
        assert!("=path".parse::<DatasetSpec>().is_err());
        assert!("label=  ".parse::<DatasetSpec>().is_err());
    }

    #[test]
    fn test_parse_list() {
        let specs = DatasetSpec::parse_list("a=dir_a; ;b=dir_b;").unwrap();
        assert_eq!(specs, vec![DatasetSpec::new("a", "dir_a"), DatasetSpec::new("b", "dir_b")]);
    }

    #[test]
    fn test_display() {
        let spec = DatasetSpec::new("cam", "results/cam");
        assert_eq!(spec.to_string(), "cam (results/cam)");
    }
}
