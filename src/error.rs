//! Error types for the pitch recognition pipeline and sampling loop.

use std::fmt;

/// Errors that can occur while configuring or running the recognizer.
#[derive(Debug, Clone, PartialEq)]
pub enum RecognizerError {
    /// The input collaborator could not supply a frame (device denied,
    /// stream lost, ...). Recoverable: the loop keeps ticking and retries.
    InputUnavailable { reason: String },

    /// A frame was too short to analyze or did not match the configured
    /// analysis length. Fatal to that tick only; the tick is skipped.
    InvalidBuffer { expected: usize, actual: usize },

    /// The configuration was rejected before the loop started.
    InvalidConfig { reason: String },
}

impl fmt::Display for RecognizerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecognizerError::InputUnavailable { reason } => {
                write!(f, "input source unavailable: {}", reason)
            }
            RecognizerError::InvalidBuffer { expected, actual } => {
                if *actual <= 1 {
                    write!(f, "analysis buffer of {} samples is too short", actual)
                } else {
                    write!(
                        f,
                        "analysis buffer length mismatch: expected {}, got {}",
                        expected, actual
                    )
                }
            }
            RecognizerError::InvalidConfig { reason } => {
                write!(f, "invalid configuration: {}", reason)
            }
        }
    }
}

impl std::error::Error for RecognizerError {}
