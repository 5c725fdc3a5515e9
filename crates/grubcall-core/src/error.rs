//! Core error types for grubcall-core.
//!
//! The state machine signals illegal transitions to the caller instead of
//! panicking, and persistence problems are absorbed at the store boundary.
//! Nothing in this crate terminates the process.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for grubcall-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Operation illegal in the current window state
    #[error("Transition error: {0}")]
    Transition(#[from] TransitionError),

    /// Snapshot save/load errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

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

/// An operation that is not legal in the current window state.
///
/// These are signaled rejections, not faults: the window is left unchanged
/// and the caller decides how to report them.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    /// Submit or cancel attempted while no window is open
    #[error("orders are not being collected right now")]
    NotCollecting,

    /// Manual close attempted while already idle
    #[error("no active order collection to close")]
    AlreadyClosed,

    /// Cancel attempted for a participant with no current order
    #[error("no active order for participant '{participant_id}'")]
    NoSuchOrder { participant_id: String },

    /// Open attempted with a duration that would put the deadline in the past
    #[error("collection duration must be positive (got {minutes} minutes)")]
    NonPositiveDuration { minutes: i64 },
}

/// Snapshot persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to read the snapshot file
    #[error("Failed to read snapshot at {path}: {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write the snapshot file
    #[error("Failed to write snapshot at {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Snapshot exists but cannot be deserialized
    #[error("Malformed snapshot at {path}: {message}")]
    Malformed { path: PathBuf, message: String },

    /// Failed to serialize the window for writing
    #[error("Failed to encode snapshot: {0}")]
    Encode(#[source] serde_json::Error),

    /// Data directory could not be resolved or created
    #[error("Failed to prepare data directory {path}: {source}")]
    DataDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
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

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
