//! # Configuration Module
//!
//! Runtime options for the recognizer: analysis frame length, sampling
//! interval, gating, and which transform implementation runs. Options can
//! be filled from a JSON file; absent fields fall back to the defaults and
//! unrecognized fields are ignored.

use crate::error::RecognizerError;
use crate::spectrum::TransformKind;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Options controlling the analysis pipeline and the sampling loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Analysis frame length in samples.
    pub buffer_size: usize,
    /// Sampling period of the loop in milliseconds.
    pub tick_interval_ms: u64,
    /// Magnitude floor for the noise gate.
    pub noise_gate_threshold: f32,
    /// Apply the Hann window before the transform.
    pub use_window: bool,
    /// Apply the noise gate after the transform.
    pub use_noise_gate: bool,
    /// Which transform implementation to run.
    pub transform: TransformKind,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            buffer_size: 2048,
            tick_interval_ms: 100,
            noise_gate_threshold: 2.0,
            use_window: true,
            use_noise_gate: true,
            transform: TransformKind::Direct,
        }
    }
}

impl RecognizerConfig {
    /// The sampling period as a [`Duration`].
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Checks that the options can drive the loop at all.
    ///
    /// # Returns
    /// * `Ok(())` - Options are usable
    /// * `Err(RecognizerError::InvalidConfig)` - Degenerate frame length,
    ///   zero interval, or a non-finite gate threshold
    pub fn validate(&self) -> Result<(), RecognizerError> {
        if self.buffer_size <= 1 {
            return Err(RecognizerError::InvalidConfig {
                reason: format!("buffer_size must be at least 2, got {}", self.buffer_size),
            });
        }
        if self.tick_interval_ms == 0 {
            return Err(RecognizerError::InvalidConfig {
                reason: "tick_interval_ms must be non-zero".to_string(),
            });
        }
        if !self.noise_gate_threshold.is_finite() {
            return Err(RecognizerError::InvalidConfig {
                reason: format!(
                    "noise_gate_threshold must be finite, got {}",
                    self.noise_gate_threshold
                ),
            });
        }
        Ok(())
    }

    /// Loads and validates options from a JSON file.
    ///
    /// # Arguments
    /// * `path` - Path to a JSON file; missing fields take their defaults
    pub fn load_from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&data)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        config.validate()?;
        log::info!(
            "loaded config from {}: {} samples every {} ms",
            path.display(),
            config.buffer_size,
            config.tick_interval_ms
        );
        Ok(config)
    }
}
