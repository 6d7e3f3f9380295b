//! Unified logging system
//!
//! Structured logging over `tracing` with configurable output format.

use crate::error::{ErrorContext, EstateError, EstateResult};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
    /// Output format (json, pretty, compact)
    pub format: LogFormat,
    /// Whether to include file and line information
    pub include_location: bool,
    /// Whether to include thread information
    pub include_thread: bool,
    /// Whether to log to file
    pub log_to_file: bool,
    /// Log file path (if log_to_file is true)
    pub log_file_path: Option<String>,
    /// Custom filter directives
    pub filter_directives: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    Json,
    Pretty,
    Compact,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
            include_location: true,
            include_thread: false,
            log_to_file: false,
            log_file_path: None,
            filter_directives: vec![
                "estate_core=debug".to_string(),
                "estate_access=debug".to_string(),
            ],
        }
    }
}

/// Initialize the logging system
pub fn init_logging(config: &LoggingConfig) -> EstateResult<()> {
    let mut filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    // Add custom filter directives
    for directive in &config.filter_directives {
        filter = filter.add_directive(directive.parse().map_err(|e| EstateError::Config {
            message: format!("invalid filter directive: {}", directive),
            source: Some(Box::new(e)),
            context: ErrorContext::new("logging").with_operation("parse_directive"),
        })?);
    }

    let registry = tracing_subscriber::registry().with(filter);

    match config.format {
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.include_thread)
                .with_thread_names(config.include_thread);

            match log_file(config)? {
                Some(file) => registry.with(fmt_layer.with_writer(file)).init(),
                None => registry.with(fmt_layer.with_writer(io::stdout)).init(),
            }
        }
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.include_thread)
                .with_thread_names(config.include_thread);

            match log_file(config)? {
                Some(file) => registry.with(fmt_layer.with_writer(file)).init(),
                None => registry.with(fmt_layer.with_writer(io::stdout)).init(),
            }
        }
        LogFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_file(config.include_location)
                .with_line_number(config.include_location)
                .with_thread_ids(config.include_thread)
                .with_thread_names(config.include_thread);

            match log_file(config)? {
                Some(file) => registry.with(fmt_layer.with_writer(file)).init(),
                None => registry.with(fmt_layer.with_writer(io::stdout)).init(),
            }
        }
    }

    Ok(())
}

/// Open the configured log file, if file logging is enabled.
fn log_file(config: &LoggingConfig) -> EstateResult<Option<Arc<std::fs::File>>> {
    if !config.log_to_file {
        return Ok(None);
    }

    let path = config
        .log_file_path
        .as_ref()
        .ok_or_else(|| EstateError::Config {
            message: "log_file_path must be specified when log_to_file is true".to_string(),
            source: None,
            context: ErrorContext::new("logging").with_operation("open_log_file"),
        })?;

    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;

    Ok(Some(Arc::new(file)))
}
