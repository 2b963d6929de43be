//! Error types for the BIM assistant.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Request-level rejections of a row batch.
///
/// Individual unparseable rows are skipped, never reported here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CollectError {
    /// The batch is not a JSON array.
    #[error("rows must be a JSON array")]
    NotAList,

    /// The batch is an empty array.
    #[error("rows[] is required and must not be empty")]
    EmptyBatch,

    /// The batch exceeds the configured row ceiling.
    #[error("too many rows: {count} exceeds the limit of {max}")]
    TooManyRows { count: usize, max: usize },
}

/// The property database could not be handed out to a reader.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReadinessError {
    /// No model is loaded and none is loading.
    #[error("no model is loaded; load a model and try again")]
    NotLoaded,

    /// A model is loading but its properties were not ready in time.
    #[error("model properties are not ready yet (waited {}s); please try again shortly", .waited.as_secs())]
    Timeout { waited: Duration },
}

/// Errors raised while loading row batches or property databases from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Failed to read the input file from disk.
    #[error("failed to read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The file is not valid JSON.
    #[error("invalid JSON in '{path}': {source}")]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// The JSON does not have the expected shape.
    #[error("unexpected input shape: {message}")]
    UnexpectedShape { message: String },
}

/// Errors raised while loading settings.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the settings file.
    #[error("failed to read settings '{path}': {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The settings file is not valid JSON for [`crate::config::Settings`].
    #[error("invalid settings in '{path}': {source}")]
    InvalidJson {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// A fallback key pattern does not compile.
    #[error("invalid key pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Errors that can occur when exporting data.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Failed to create the output file.
    #[error("failed to create file '{path}': {source}")]
    FileCreate {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to write data to the file.
    #[error("failed to write data: {message}")]
    WriteError { message: String },

    /// Failed to serialize data to JSON.
    #[error("JSON serialization failed: {source}")]
    JsonSerialize {
        #[from]
        source: serde_json::Error,
    },

    /// Failed to write CSV data.
    #[error("CSV write failed: {source}")]
    CsvWrite {
        #[from]
        source: csv::Error,
    },
}
