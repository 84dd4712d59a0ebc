//! # Spectrum Module
//!
//! This module turns a time-domain sample buffer into a magnitude spectrum
//! for pitch analysis. It provides Hann windowing and two interchangeable
//! transform implementations over the full buffer length.
//!
//! ## Features
//! - Hann windowing for reduced spectral leakage
//! - Direct discrete Fourier transform (the reference implementation)
//! - RustFFT-backed fast transform as a verified drop-in
//! - Full-length magnitude output, mirror half included

use rustfft::{FftPlanner, num_complex::Complex};
use serde::{Deserialize, Serialize};

/// Selects which transform implementation the pipeline runs.
///
/// `Direct` is the reference evaluation of the DFT sums and the default.
/// `Fft` computes the identical magnitudes through RustFFT; the two are
/// interchangeable within floating-point tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Direct O(n^2) evaluation of the DFT sums.
    #[default]
    Direct,
    /// Fast transform via RustFFT.
    Fft,
}

/// Applies a Hann window to a sample buffer and returns the windowed copy.
///
/// Each sample is scaled by `0.5 * (1 - cos(2π·i / (n - 1)))`, tapering the
/// buffer to zero at both ends. Output length always equals input length,
/// and an all-zero buffer stays all zero.
///
/// Buffers of length 0 or 1 are returned unchanged; the window coefficient
/// is undefined for them, so they pass through as a plain copy. Rejecting
/// wrong-length frames is the sampling loop's job, not the window's.
///
/// # Arguments
/// * `samples` - Time-domain sample buffer
///
/// # Returns
/// * `Vec<f32>` - Windowed buffer of the same length
pub fn apply_window(samples: &[f32]) -> Vec<f32> {
    let n = samples.len();
    if n <= 1 {
        return samples.to_vec();
    }
    let n_minus_1 = (n - 1) as f32;
    samples
        .iter()
        .enumerate()
        .map(|(i, &sample)| {
            let multiplier =
                0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / n_minus_1).cos());
            sample * multiplier
        })
        .collect()
}

/// Computes the magnitude spectrum with a direct discrete Fourier transform.
///
/// For each bin `k` in `[0, n)`:
///
/// ```text
/// re[k] =  Σ_t samples[t] · cos(2π·t·k / n)
/// im[k] = -Σ_t samples[t] · sin(2π·t·k / n)
/// out[k] = sqrt(re[k]² + im[k]²)
/// ```
///
/// The sums are accumulated in `f64`, with `t·k` reduced modulo `n` before
/// the angle is formed so the argument never loses precision, and the final
/// magnitude is truncated to `f32`. The output covers the full length `n`;
/// bins above `n/2` are the mirror image of the lower half and are returned
/// as-is. This is O(n²) on purpose: it is the reference the fast transform
/// is checked against, and at analysis sizes of a few thousand samples it is
/// fast enough for a 100 ms tick.
///
/// # Arguments
/// * `samples` - Time-domain sample buffer
///
/// # Returns
/// * `Vec<f32>` - Non-negative magnitudes, one per input sample
pub fn transform(samples: &[f32]) -> Vec<f32> {
    let n = samples.len();
    let mut spectrum = Vec::with_capacity(n);
    for k in 0..n {
        let mut re = 0.0_f64;
        let mut im = 0.0_f64;
        for (t, &sample) in samples.iter().enumerate() {
            let angle =
                2.0 * std::f64::consts::PI * ((t * k) % n) as f64 / n as f64;
            re += sample as f64 * angle.cos();
            im -= sample as f64 * angle.sin();
        }
        spectrum.push((re * re + im * im).sqrt() as f32);
    }
    spectrum
}

/// Computes the same magnitude spectrum as [`transform`] using RustFFT.
///
/// The forward FFT of the real input is taken over the full buffer length
/// and every complex bin is reduced to its magnitude with `.norm()`, so the
/// output shape and mirror half match the direct transform exactly.
///
/// # Arguments
/// * `samples` - Time-domain sample buffer
///
/// # Returns
/// * `Vec<f32>` - Non-negative magnitudes, one per input sample
pub fn transform_fft(samples: &[f32]) -> Vec<f32> {
    if samples.len() <= 1 {
        return samples.iter().map(|s| s.abs()).collect();
    }

    let mut planner = FftPlanner::new();
    let fft = planner.plan_fft_forward(samples.len());

    let mut buffer: Vec<Complex<f32>> = samples
        .iter()
        .map(|&sample| Complex { re: sample, im: 0.0 })
        .collect();

    fft.process(&mut buffer);
    buffer.iter().map(|c| c.norm()).collect()
}
