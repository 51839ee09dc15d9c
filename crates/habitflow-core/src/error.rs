//! Core error types for habitflow-core.
//!
//! The analytics functions themselves are total and never fail; errors
//! here cover catalog validation, the versioned store, configuration,
//! and file persistence.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Core error type for habitflow-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Store-related errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Errors from the versioned ledger store and file persistence.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Optimistic-concurrency commit lost the race
    #[error("Revision conflict for {date}: expected {expected}, found {actual}")]
    RevisionConflict {
        date: NaiveDate,
        expected: u64,
        actual: u64,
    },

    /// Completions cannot be recorded for dates after today
    #[error("Cannot record completions for future date {0}")]
    FutureDate(NaiveDate),

    /// Failed to read a persisted document
    #[error("Failed to load {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to write a persisted document
    #[error("Failed to save {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Habit names must contain at least one non-whitespace character
    #[error("Habit name must not be empty")]
    EmptyName,

    /// Lookup by id found nothing
    #[error("Unknown habit id: {0}")]
    UnknownHabit(String),

    /// A date key did not parse as YYYY-MM-DD
    #[error("Invalid date key '{0}': expected YYYY-MM-DD")]
    InvalidDateKey(String),

    /// Calendar coordinates out of range
    #[error("Invalid calendar month: {year}-{month}")]
    InvalidMonth { year: i32, month: u32 },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
