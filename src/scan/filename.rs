//! Latency and frame metadata extraction from capture file names
//!
//! The capture program writes one JPEG per frame and renames it once the
//! encode has finished, so the name carries everything we need:
//!
//! ```text
//! 2024.03.05_14.22.01.123_HW_1709648521123456789_17ms.jpg
//! └──── capture time ───┘ └─┘ └─ hardware ns ─┘  └┘
//!                         HW|ERR                 encode latency
//! ```
//!
//! Only the `_<digits>ms.jpg` suffix decides whether a file counts as a
//! latency sample; the rest of the name is optional metadata.

use crate::error::Result;
use chrono::NaiveDateTime;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Suffix that marks a file as a latency sample
pub const LATENCY_FILENAME_PATTERN: &str = r"_(\d+)ms\.jpg$";

/// Full capture file name layout
pub const FRAME_FILENAME_PATTERN: &str =
    r"^(\d{4}\.\d{2}\.\d{2}_\d{2}\.\d{2}\.\d{2}\.\d{3})_(HW|ERR)_(\d+)_\d+ms\.jpg$";

const CAPTURE_TIME_FORMAT: &str = "%Y.%m.%d_%H.%M.%S%.3f";

/// Metadata encoded in a capture file name ahead of the latency suffix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMetadata {
    /// Wall-clock time the frame was handed to the writer
    pub captured_at: NaiveDateTime,
    /// `HW` prefix: the camera delivered a valid hardware timestamp
    pub hardware_time_valid: bool,
    /// Camera hardware timestamp in nanoseconds
    pub hardware_time_ns: u64,
}

/// One latency value read from a directory listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatencySample {
    pub file_name: String,
    pub latency_ms: u64,
    pub metadata: Option<FrameMetadata>,
}

/// Compiled file name patterns
#[derive(Debug, Clone)]
pub struct LatencyFilenameParser {
    latency: Regex,
    frame: Regex,
}

impl LatencyFilenameParser {
    pub fn new() -> Result<Self> {
        Ok(Self {
            latency: Regex::new(LATENCY_FILENAME_PATTERN)?,
            frame: Regex::new(FRAME_FILENAME_PATTERN)?,
        })
    }

    /// Digits captured by the latency suffix, if the name has one
    pub fn latency_digits<'a>(&self, file_name: &'a str) -> Option<&'a str> {
        self.latency
            .captures(file_name)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str())
    }

    /// Latency in milliseconds; `None` when the suffix is missing or overflows `u64`
    pub fn extract_latency(&self, file_name: &str) -> Option<u64> {
        self.latency_digits(file_name)?.parse().ok()
    }

    /// Capture metadata, when the name follows the full capture layout
    pub fn parse_metadata(&self, file_name: &str) -> Option<FrameMetadata> {
        let captures = self.frame.captures(file_name)?;
        let captured_at = NaiveDateTime::parse_from_str(&captures[1], CAPTURE_TIME_FORMAT).ok()?;
        let hardware_time_ns = captures[3].parse().ok()?;

        Some(FrameMetadata {
            captured_at,
            hardware_time_valid: &captures[2] == "HW",
            hardware_time_ns,
        })
    }

    /// Build a sample from a file name, or `None` if it is not a latency file
    pub fn parse_sample(&self, file_name: &str) -> Option<LatencySample> {
        let latency_ms = self.extract_latency(file_name)?;
        Some(LatencySample {
            file_name: file_name.to_string(),
            latency_ms,
            metadata: self.parse_metadata(file_name),
        })
    }
}

/// Aggregate view over the metadata of a dataset's samples
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameMetadataSummary {
    /// Samples whose names follow the full capture layout
    pub frames_with_metadata: usize,
    /// Samples tagged `ERR` (no valid hardware timestamp)
    pub invalid_hardware_timestamps: usize,
    pub first_capture: Option<NaiveDateTime>,
    pub last_capture: Option<NaiveDateTime>,
}

impl FrameMetadataSummary {
    pub fn from_samples(samples: &[LatencySample]) -> Self {
        let mut summary = Self::default();

        for metadata in samples.iter().filter_map(|s| s.metadata.as_ref()) {
            summary.frames_with_metadata += 1;
            if !metadata.hardware_time_valid {
                summary.invalid_hardware_timestamps += 1;
            }

            let at = metadata.captured_at;
            summary.first_capture = Some(summary.first_capture.map_or(at, |first| first.min(at)));
            summary.last_capture = Some(summary.last_capture.map_or(at, |last| last.max(at)));
        }

        summary
    }

    /// Time between the first and last captured frame
    pub fn capture_span_secs(&self) -> Option<f64> {
        match (self.first_capture, self.last_capture) {
            (Some(first), Some(last)) => Some((last - first).num_milliseconds() as f64 / 1000.0),
            _ => None,
        }
    }
}
