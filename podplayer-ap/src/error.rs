//! Error types for podplayer-ap
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use thiserror::Error;

/// Main error type for podplayer-ap
#[derive(Error, Debug)]
pub enum Error {
    /// Initialization requested without any audio files
    ///
    /// Also reported to the store as `Notification::ErrorMissingAudioFiles`.
    #[error("No audio files provided")]
    MissingAudioFiles,

    /// Configuration file loading errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Malformed request or script line
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Errors bubbled up from podplayer-common
    #[error(transparent)]
    Common(#[from] podplayer_common::Error),
}

/// Convenience Result type using podplayer-ap Error
pub type Result<T> = std::result::Result<T, Error>;
