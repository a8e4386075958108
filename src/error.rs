//! Error types for poly-keys

use thiserror::Error;

/// Result type alias for poly-keys operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in poly-keys
///
/// Out-of-order or unknown input is never an error; those events are
/// silently dropped by the arbitrator and the tracker.
#[derive(Debug, Error)]
pub enum Error {
    /// The audio backend could not be started
    #[error("Audio activation failed: {0}")]
    Activation(String),

    /// No default output device on this host
    #[error("No output device available")]
    NoOutputDevice,

    /// The output device reports a sample format we do not render
    #[error("Unsupported sample format: {0}")]
    UnsupportedSampleFormat(String),

    #[error("Output config error: {0}")]
    StreamConfig(#[from] cpal::DefaultStreamConfigError),

    #[error("Stream build error: {0}")]
    BuildStream(#[from] cpal::BuildStreamError),

    #[error("Stream play error: {0}")]
    PlayStream(#[from] cpal::PlayStreamError),

    /// A note name that does not parse, e.g. `H4`
    #[error("Invalid note name: {0}")]
    InvalidNote(String),

    /// A key layout that breaks the one-key-one-note rule
    #[error("Invalid key layout: {0}")]
    Layout(String),

    /// Configuration value out of range
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration JSON could not be parsed
    #[error("Configuration parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),
}
