//! The core logic for live pitch recognition.
//! This crate turns frames of audio samples into pitch estimates: it
//! windows a buffer, takes a magnitude spectrum, gates out noise, picks the
//! peak bin, and names the pitch class. A sampling loop runs that pipeline
//! on a fixed interval against a pluggable input source and publishes the
//! latest estimate. It is completely headless and contains no device or
//! GUI code.

pub mod config;
pub mod error;
pub mod note;
pub mod pitch;
pub mod recognizer;
pub mod source;
pub mod spectrum;

pub use config::RecognizerConfig;
pub use error::RecognizerError;
pub use recognizer::PitchRecognizer;
pub use source::{SampleSource, SineSource};
pub use spectrum::TransformKind;

/// The result of analyzing one frame: the published unit of the loop.
///
/// The default value (0 Hz, no note, zero cents) doubles as the initial
/// estimate before any tick completes and as the "no pitch" result for
/// silent or gated-out frames.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PitchEstimate {
    /// Peak frequency in Hz; `0.0` when no pitch was found.
    pub frequency_hz: f32,
    /// Octave-free pitch-class label, `None` when no pitch was found.
    pub note_name: Option<&'static str>,
    /// Signed offset from the pitch-class center in cents, within ±50.
    pub cents_offset: f32,
}

impl PitchEstimate {
    /// Builds the estimate for a detected frequency.
    ///
    /// Frequencies that cannot carry a note (zero, negative, non-finite)
    /// produce the no-pitch estimate with the frequency passed through.
    pub fn from_frequency(frequency_hz: f32) -> Self {
        Self {
            frequency_hz,
            note_name: note::frequency_to_note(frequency_hz),
            cents_offset: note::cents_offset(frequency_hz).unwrap_or(0.0),
        }
    }
}

/// Runs the full analysis pipeline over one frame.
///
/// The frame is validated against the configured analysis length, then
/// windowed (optional), transformed to a full-length magnitude spectrum,
/// noise-gated (optional), and reduced to the peak frequency and its
/// pitch-class label.
///
/// # Arguments
/// * `frame` - Time-domain samples, exactly `config.buffer_size` long
/// * `sample_rate` - Sample rate of the frame in Hz
/// * `config` - Pipeline options
///
/// # Returns
/// * `Ok(PitchEstimate)` - Estimate for this frame (possibly "no pitch")
/// * `Err(RecognizerError::InvalidBuffer)` - Frame too short or mismatched
pub fn estimate_pitch(
    frame: &[f32],
    sample_rate: u32,
    config: &RecognizerConfig,
) -> Result<PitchEstimate, RecognizerError> {
    if frame.len() <= 1 || frame.len() != config.buffer_size {
        return Err(RecognizerError::InvalidBuffer {
            expected: config.buffer_size,
            actual: frame.len(),
        });
    }

    let windowed = if config.use_window {
        spectrum::apply_window(frame)
    } else {
        frame.to_vec()
    };

    let magnitudes = match config.transform {
        TransformKind::Direct => spectrum::transform(&windowed),
        TransformKind::Fft => spectrum::transform_fft(&windowed),
    };

    let gated = if config.use_noise_gate {
        pitch::gate(&magnitudes, config.noise_gate_threshold)
    } else {
        magnitudes
    };

    let frequency = pitch::extract_peak(&gated, sample_rate, frame.len());
    Ok(PitchEstimate::from_frequency(frequency))
}
