//! Structured logging for the frame latency analyzer
//!
//! This module provides:
//! - Structured logging with levels and key/value fields
//! - Session correlation IDs shared by every logger of one run
//! - Stage timing for the scan / filter / render pipeline
//! - JSON structured output for integration with log aggregators
//!
//! All log output goes to stderr so that stdout carries only the report.

use crate::error::{AppError, Result};
use crate::models::Config;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{self, Write};
use std::str::FromStr;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Log level enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LogLevel {
    /// Per-stage detail, shown with --debug
    Debug = 0,
    /// Pipeline progress, shown with --verbose
    Info = 1,
    /// Skipped files and other recoverable problems
    Warn = 2,
}

impl LogLevel {
    /// Get log level name as string
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
        }
    }

    /// Get ANSI color code for console output
    pub fn color_code(&self) -> &'static str {
        match self {
            LogLevel::Debug => "\x1b[36m",    // Cyan
            LogLevel::Info => "\x1b[32m",     // Green
            LogLevel::Warn => "\x1b[33m",     // Yellow
        }
    }

    /// Reset ANSI color code
    pub fn reset_code() -> &'static str {
        "\x1b[0m"
    }
}

/// Log entry structure for structured logging
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// Timestamp when log entry was created
    pub timestamp: DateTime<Utc>,
    /// Log level
    pub level: LogLevel,
    /// Log message
    pub message: String,
    /// Logger name/component
    pub logger: String,
    /// Additional structured fields
    pub fields: HashMap<String, serde_json::Value>,
    /// File and line information
    pub location: Option<LogLocation>,
}

/// Source code location information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLocation {
    /// Source file name
    pub file: String,
    /// Line number
    pub line: u32,
    /// Module path
    pub module: Option<String>,
}

/// Log output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable console format
    #[default]
    Console,
    /// JSON format for structured logging
    Json,
    /// Compact single-line format
    Compact,
}

impl FromStr for LogFormat {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "console" => Ok(Self::Console),
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            other => Err(AppError::parse(format!(
                "Unknown log format '{}', expected console, json or compact",
                other
            ))),
        }
    }
}

/// Shared logging context
#[derive(Debug, Default)]
struct LogContext {
    /// Correlation ID for the whole run
    session_id: Option<String>,
}

/// Logger implementation with multiple output formats
#[derive(Clone)]
pub struct Logger {
    /// Minimum log level to output
    min_level: LogLevel,
    /// Whether to use colored output
    use_color: bool,
    /// Whether to include location information
    include_location: bool,
    /// Output format
    format: LogFormat,
    /// Logger name
    name: String,
    /// Shared context storage
    context: Arc<RwLock<LogContext>>,
}

impl Logger {
    /// Create a new logger
    pub fn new(name: String) -> Self {
        Self {
            min_level: LogLevel::Info,
            use_color: true,
            include_location: false,
            format: LogFormat::Console,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Create a logger with specific configuration
    pub fn with_config(name: String, config: &Config) -> Self {
        let min_level = if config.debug {
            LogLevel::Debug
        } else if config.verbose {
            LogLevel::Info
        } else {
            LogLevel::Warn
        };

        Self {
            min_level,
            use_color: config.enable_color,
            include_location: config.debug,
            format: config.log_format,
            name,
            context: Arc::new(RwLock::new(LogContext::default())),
        }
    }

    /// Set minimum log level
    pub fn set_level(&mut self, level: LogLevel) {
        self.min_level = level;
    }

    /// Set session correlation ID
    pub fn set_session_id(&self, session_id: String) {
        if let Ok(mut context) = self.context.write() {
            context.session_id = Some(session_id);
        }
    }

    /// Create a log entry builder
    pub fn log(&self, level: LogLevel, message: &str) -> LogEntryBuilder<'_> {
        LogEntryBuilder::new(self, level, message.to_string())
    }

    /// Convenience methods for different log levels
    pub fn debug(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Debug, message)
    }

    pub fn info(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Info, message)
    }

    pub fn warn(&self, message: &str) -> LogEntryBuilder<'_> {
        self.log(LogLevel::Warn, message)
    }

    /// Check if a log level would be output
    pub fn would_log(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    /// Write log entry to stderr
    fn write_entry(&self, mut entry: LogEntry) {
        if !self.would_log(entry.level) {
            return;
        }

        if let Ok(context) = self.context.read() {
            if let Some(session_id) = &context.session_id {
                entry.fields.insert("session_id".to_string(), serde_json::Value::String(session_id.clone()));
            }
        }

        let output = self.format_entry(&entry);
        let _ = writeln!(io::stderr(), "{}", output);
    }

    /// Render an entry in the configured format
    pub fn format_entry(&self, entry: &LogEntry) -> String {
        match self.format {
            LogFormat::Console => self.format_console(entry),
            LogFormat::Json => self.format_json(entry),
            LogFormat::Compact => self.format_compact(entry),
        }
    }

    /// Format log entry for console output
    fn format_console(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%Y-%m-%d %H:%M:%S%.3f");
        let level_str = entry.level.as_str();

        let formatted_level = if self.use_color {
            format!("{}{:>5}{}", entry.level.color_code(), level_str, LogLevel::reset_code())
        } else {
            format!("{:>5}", level_str)
        };

        let mut output = format!("{} {} [{}] {}",
            timestamp,
            formatted_level,
            entry.logger,
            entry.message
        );

        if !entry.fields.is_empty() {
            // Sorted so repeated runs produce comparable lines
            let mut fields: Vec<(&String, &serde_json::Value)> = entry.fields.iter().collect();
            fields.sort_by(|a, b| a.0.cmp(b.0));
            let fields_str: Vec<String> = fields.iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            output.push_str(&format!(" {{{}}}", fields_str.join(", ")));
        }

        if self.include_location {
            if let Some(location) = &entry.location {
                output.push_str(&format!(" @ {}:{}", location.file, location.line));
            }
        }

        output
    }

    /// Format log entry as JSON
    fn format_json(&self, entry: &LogEntry) -> String {
        match serde_json::to_string(entry) {
            Ok(json) => json,
            Err(_) => format!("{{\"error\": \"Failed to serialize log entry\", \"message\": \"{}\"}}", entry.message),
        }
    }

    /// Format log entry in compact format
    fn format_compact(&self, entry: &LogEntry) -> String {
        let timestamp = entry.timestamp.format("%H:%M:%S");
        format!("{} {} {}: {}",
            timestamp,
            entry.level.as_str().chars().next().unwrap_or('?'),
            entry.logger,
            entry.message
        )
    }
}

/// Builder pattern for creating log entries
pub struct LogEntryBuilder<'a> {
    logger: &'a Logger,
    entry: LogEntry,
}

impl<'a> LogEntryBuilder<'a> {
    fn new(logger: &'a Logger, level: LogLevel, message: String) -> Self {
        Self {
            logger,
            entry: LogEntry {
                timestamp: Utc::now(),
                level,
                message,
                logger: logger.name.clone(),
                fields: HashMap::new(),
                location: None,
            },
        }
    }

    /// Add a structured field
    pub fn field<T: Serialize>(mut self, key: &str, value: T) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.entry.fields.insert(key.to_string(), json_value);
        }
        self
    }

    /// Add location information
    pub fn location(mut self, file: &str, line: u32, module: Option<&str>) -> Self {
        self.entry.location = Some(LogLocation {
            file: file.to_string(),
            line,
            module: module.map(String::from),
        });
        self
    }

    /// Finalize and write the log entry
    pub fn log(self) {
        self.logger.write_entry(self.entry);
    }

    #[cfg(test)]
    fn build(self) -> LogEntry {
        self.entry
    }
}

/// Stage timing logger for the analysis pipeline
pub struct PerformanceLogger {
    logger: Logger,
    start_times: HashMap<String, DateTime<Utc>>,
}

impl PerformanceLogger {
    /// Create a new performance logger
    pub fn new(config: &Config) -> Self {
        Self {
            logger: Logger::with_config("PERF".to_string(), config),
            start_times: HashMap::new(),
        }
    }

    /// Start timing a named stage
    pub fn start_timing(&mut self, operation: &str) {
        self.start_times.insert(operation.to_string(), Utc::now());
    }

    /// Stop timing a named stage and log its duration
    pub fn end_timing(&mut self, operation: &str) -> Option<chrono::Duration> {
        let start = self.start_times.remove(operation)?;
        let duration = Utc::now() - start;

        self.logger.debug(&format!("Completed {}", operation))
            .field("operation", operation)
            .field("duration_ms", duration.num_milliseconds())
            .log();

        Some(duration)
    }
}

/// Creates loggers that share one session ID
pub struct LoggerFactory {
    config: Config,
    session_id: String,
}

impl LoggerFactory {
    /// Create a new logger factory
    pub fn new(config: Config) -> Self {
        Self {
            config,
            session_id: Uuid::new_v4().to_string(),
        }
    }

    /// Create a logger with a specific name
    pub fn create_logger(&self, name: &str) -> Logger {
        let logger = Logger::with_config(name.to_string(), &self.config);
        logger.set_session_id(self.session_id.clone());
        logger
    }

    /// Create a performance logger
    pub fn create_performance_logger(&self) -> PerformanceLogger {
        let mut perf = PerformanceLogger::new(&self.config);
        perf.logger.set_session_id(self.session_id.clone());
        perf
    }

    /// Get session ID
    pub fn session_id(&self) -> &str {
        &self.session_id
    }
}

/// Debug-level entry tagged with the calling file and line
#[macro_export]
macro_rules! log_debug {
    ($logger:expr, $($arg:tt)*) => {
        $logger.debug(&format!($($arg)*))
            .location(file!(), line!(), Some(module_path!()))
            .log()
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_ordering() {
        assert!(LogLevel::Debug < LogLevel::Info);
        assert!(LogLevel::Info < LogLevel::Warn);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("JSON".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!(" compact ".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("console".parse::<LogFormat>().unwrap(), LogFormat::Console);
        assert_eq!("xml".parse::<LogFormat>().unwrap_err().category(), "PARSE");
    }

    #[test]
    fn test_logger_creation() {
        let logger = Logger::new("TEST".to_string());
        assert_eq!(logger.name, "TEST");
        assert_eq!(logger.min_level, LogLevel::Info);
        assert_eq!(logger.format, LogFormat::Console);
        assert!(logger.use_color);
    }

    #[test]
    fn test_logger_with_config_levels() {
        let debug = Config { debug: true, enable_color: false, ..Default::default() };
        let logger = Logger::with_config("TEST".to_string(), &debug);
        assert_eq!(logger.min_level, LogLevel::Debug);
        assert!(!logger.use_color);
        assert!(logger.include_location);

        let verbose = Config { verbose: true, ..Default::default() };
        assert_eq!(Logger::with_config("T".to_string(), &verbose).min_level, LogLevel::Info);

        let quiet = Config::default();
        assert_eq!(Logger::with_config("T".to_string(), &quiet).min_level, LogLevel::Warn);
    }

    #[test]
    fn test_would_log() {
        let mut logger = Logger::new("TEST".to_string());
        logger.set_level(LogLevel::Warn);

        assert!(!logger.would_log(LogLevel::Debug));
        assert!(!logger.would_log(LogLevel::Info));
        assert!(logger.would_log(LogLevel::Warn));
    }

    #[test]
    fn test_session_id() {
        let logger = Logger::new("TEST".to_string());
        logger.set_session_id("test-session".to_string());

        let context = logger.context.read().unwrap();
        assert_eq!(context.session_id.as_deref(), Some("test-session"));
    }

    #[test]
    fn test_console_format_sorts_fields() {
        let config = Config { enable_color: false, ..Default::default() };
        let logger = Logger::with_config("SCAN".to_string(), &config);
        let entry = logger.info("Scanned directory")
            .field("samples", 12)
            .field("directory", "test_results/v1_vis0")
            .build();

        let line = logger.format_entry(&entry);
        assert!(line.contains(" INFO [SCAN] Scanned directory"));
        assert!(line.ends_with("{directory=\"test_results/v1_vis0\", samples=12}"));
    }

    #[test]
    fn test_console_format_location_in_debug() {
        let config = Config { debug: true, enable_color: false, ..Default::default() };
        let logger = Logger::with_config("APP".to_string(), &config);
        let entry = logger.debug("Analysing").location("src/app.rs", 42, None).build();

        assert!(logger.format_entry(&entry).ends_with("Analysing @ src/app.rs:42"));
    }

    #[test]
    fn test_json_and_compact_formats_from_config() {
        let json_config = Config { log_format: LogFormat::Json, ..Default::default() };
        let logger = Logger::with_config("STATS".to_string(), &json_config);
        let entry = logger.warn("Outliers removed").field("count", 3).build();

        let json: serde_json::Value = serde_json::from_str(&logger.format_entry(&entry)).unwrap();
        assert_eq!(json["level"], "Warn");
        assert_eq!(json["logger"], "STATS");
        assert_eq!(json["fields"]["count"], 3);

        let compact_config = Config { log_format: LogFormat::Compact, ..Default::default() };
        let logger = Logger::with_config("STATS".to_string(), &compact_config);
        assert!(logger.format_entry(&entry).ends_with("W STATS: Outliers removed"));
    }

    #[test]
    fn test_performance_timing() {
        let mut perf = PerformanceLogger::new(&Config::default());
        perf.start_timing("render");

        let duration = perf.end_timing("render").unwrap();
        assert!(duration.num_milliseconds() >= 0);
        assert!(perf.end_timing("render").is_none());
    }

    #[test]
    fn test_logger_factory_shares_session() {
        let factory = LoggerFactory::new(Config::default());
        let a = factory.create_logger("A");
        let b = factory.create_logger("B");

        let a_session = a.context.read().unwrap().session_id.clone();
        let b_session = b.context.read().unwrap().session_id.clone();
        assert_eq!(a_session.as_deref(), Some(factory.session_id()));
        assert_eq!(a_session, b_session);
    }

    #[test]
    fn test_log_debug_macro() {
        let logger = Logger::new("MACRO".to_string());
        crate::log_debug!(logger, "debug {}", 1);
    }
}
