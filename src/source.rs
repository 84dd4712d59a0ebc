//! # Sample Source Module
//!
//! This module defines the boundary between the recognizer and whatever
//! produces audio. Device access, permissions, and stream plumbing live on
//! the other side of the [`SampleSource`] trait: implementors acquire their
//! input in their constructor and hand frames over on demand. A synthetic
//! [`SineSource`] is included for development and tests, so the full loop
//! runs without any hardware attached.

use anyhow::Result;

/// A collaborator that supplies fixed-length sample buffers on demand.
///
/// The sample rate is constant for the lifetime of the source. A failed
/// `next_frame` is recoverable: the sampling loop reports it and asks again
/// on the next tick, so implementors should return an error rather than
/// block indefinitely when the underlying input is gone.
pub trait SampleSource: Send {
    /// Sample rate of the frames this source produces, in Hz.
    fn sample_rate(&self) -> u32;

    /// Produces the next frame of time-domain samples.
    fn next_frame(&mut self) -> Result<Vec<f32>>;
}

/// A phase-continuous sine generator implementing [`SampleSource`].
///
/// Frames continue the waveform where the previous frame ended, as a live
/// capture would. Useful as a stand-in input while developing against the
/// recognizer and as the signal source for the loop tests.
pub struct SineSource {
    sample_rate: u32,
    buffer_size: usize,
    phase: f32,
    step: f32,
}

impl SineSource {
    /// Creates a generator for a single tone.
    ///
    /// # Arguments
    /// * `frequency` - Tone frequency in Hz
    /// * `sample_rate` - Sample rate in Hz
    /// * `buffer_size` - Samples per frame
    pub fn new(frequency: f32, sample_rate: u32, buffer_size: usize) -> Self {
        Self {
            sample_rate,
            buffer_size,
            phase: 0.0,
            step: 2.0 * std::f32::consts::PI * frequency / sample_rate as f32,
        }
    }
}

impl SampleSource for SineSource {
    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    fn next_frame(&mut self) -> Result<Vec<f32>> {
        let mut frame = Vec::with_capacity(self.buffer_size);
        for _ in 0..self.buffer_size {
            frame.push(self.phase.sin());
            // Wrap to keep the accumulator small over long sessions.
            self.phase = (self.phase + self.step) % (2.0 * std::f32::consts::PI);
        }
        Ok(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_have_the_requested_length() {
        let mut source = SineSource::new(440.0, 44100, 512);
        let frame = source.next_frame().unwrap();
        assert_eq!(frame.len(), 512);
        assert_eq!(source.sample_rate(), 44100);
    }

    #[test]
    fn consecutive_frames_are_phase_continuous() {
        // 1 Hz at 8 Hz sampling: one cycle every 8 samples.
        let mut source = SineSource::new(1.0, 8, 4);
        let first = source.next_frame().unwrap();
        let second = source.next_frame().unwrap();

        let step = 2.0 * std::f32::consts::PI / 8.0;
        for (i, &sample) in first.iter().chain(second.iter()).enumerate() {
            let expected = (step * i as f32).sin();
            assert!(
                (sample - expected).abs() < 1e-5,
                "sample {} drifted: {} vs {}",
                i,
                sample,
                expected
            );
        }
    }
}
