//! # Sampling Loop Module
//!
//! This module runs the recognizer: a dedicated worker thread wakes on a
//! fixed interval, pulls one frame from the input source, runs the analysis
//! pipeline, and publishes the resulting estimate for any number of
//! readers.
//!
//! ## Architecture
//! - **Worker Thread**: one per recognizer, owns the source
//! - **Ticks**: `crossbeam_channel::tick` drives the sampling interval
//! - **Shutdown**: a bounded(1) channel, checked before every tick body
//! - **Publishing**: whole-estimate swap behind an `RwLock`, plus a
//!   monotone publish counter
//! - **Errors**: acquisition failures go to consumers over a bounded
//!   channel; per-tick analysis failures are logged and skipped locally

use crate::config::RecognizerConfig;
use crate::error::RecognizerError;
use crate::source::SampleSource;
use crate::{PitchEstimate, estimate_pitch};
use crossbeam_channel::{Receiver, Sender, bounded, tick};
use log::{debug, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use std::thread::{self, JoinHandle};

/// Capacity of the error-report channel. Reports beyond this are dropped
/// when no consumer is draining them.
const ERROR_CHANNEL_CAPACITY: usize = 32;

/// State shared between the worker thread and the readers.
#[derive(Debug, Default)]
struct SharedState {
    /// Latest published estimate; written only by the worker.
    latest: RwLock<PitchEstimate>,
    /// Number of publishes so far, advancing once per successful tick.
    published: AtomicU64,
}

/// A running pitch recognizer.
///
/// Created with [`PitchRecognizer::start`], which spawns the worker thread.
/// Readers call [`latest`](PitchRecognizer::latest) at any time; the value
/// is the whole estimate of one tick, never a mix of two. Dropping the
/// recognizer stops the worker.
#[derive(Debug)]
pub struct PitchRecognizer {
    shared: Arc<SharedState>,
    error_rx: Receiver<RecognizerError>,
    shutdown_tx: Sender<()>,
    worker: Option<JoinHandle<()>>,
}

impl PitchRecognizer {
    /// Validates the configuration and starts the sampling loop.
    ///
    /// Before the first publish, [`latest`](PitchRecognizer::latest)
    /// returns the no-pitch estimate (0 Hz, no note).
    ///
    /// # Arguments
    /// * `source` - Input collaborator supplying the frames
    /// * `config` - Pipeline and loop options
    ///
    /// # Returns
    /// * `Ok(recognizer)` - Loop is running
    /// * `Err(RecognizerError::InvalidConfig)` - Options were rejected
    pub fn start<S>(source: S, config: RecognizerConfig) -> Result<Self, RecognizerError>
    where
        S: SampleSource + 'static,
    {
        config.validate()?;

        let shared = Arc::new(SharedState::default());
        let (error_tx, error_rx) = bounded(ERROR_CHANNEL_CAPACITY);
        let (shutdown_tx, shutdown_rx) = bounded(1);

        let worker_shared = Arc::clone(&shared);
        let worker = thread::spawn(move || {
            run_sampling_loop(source, config, worker_shared, error_tx, shutdown_rx);
        });

        Ok(Self {
            shared,
            error_rx,
            shutdown_tx,
            worker: Some(worker),
        })
    }

    /// Returns the most recently published estimate.
    pub fn latest(&self) -> PitchEstimate {
        *self
            .shared
            .latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Number of estimates published since the loop started.
    pub fn published(&self) -> u64 {
        self.shared.published.load(Ordering::Acquire)
    }

    /// A receiver for acquisition failures.
    ///
    /// Each [`RecognizerError::InputUnavailable`] the loop encounters is
    /// offered here; when nobody drains the channel, reports are dropped
    /// rather than stalling the loop.
    pub fn errors(&self) -> Receiver<RecognizerError> {
        self.error_rx.clone()
    }

    /// Stops the loop and waits for the worker to finish.
    ///
    /// Idempotent: calling it again (or dropping after it) does nothing.
    /// Once this returns, no further estimate will be published.
    pub fn stop(&mut self) {
        let _ = self.shutdown_tx.try_send(());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("sampling worker panicked before shutdown");
            }
        }
    }
}

impl Drop for PitchRecognizer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_sampling_loop<S: SampleSource>(
    mut source: S,
    config: RecognizerConfig,
    shared: Arc<SharedState>,
    error_tx: Sender<RecognizerError>,
    shutdown_rx: Receiver<()>,
) {
    let sample_rate = source.sample_rate();
    let ticker = tick(config.tick_interval());
    info!(
        "sampling loop started: {} samples @ {} Hz every {} ms",
        config.buffer_size, sample_rate, config.tick_interval_ms
    );

    loop {
        crossbeam_channel::select! {
            recv(ticker) -> _ => {
                // A shutdown that raced this tick wins: no new tick body
                // may begin once cancellation is observable.
                if shutdown_rx.try_recv().is_ok() {
                    break;
                }
                run_tick(&mut source, sample_rate, &config, &shared, &error_tx);
            }
            recv(shutdown_rx) -> _ => break,
        }
    }

    info!("sampling loop stopped");
}

fn run_tick<S: SampleSource>(
    source: &mut S,
    sample_rate: u32,
    config: &RecognizerConfig,
    shared: &SharedState,
    error_tx: &Sender<RecognizerError>,
) {
    let frame = match source.next_frame() {
        Ok(frame) => frame,
        Err(e) => {
            warn!("input source unavailable, keeping previous estimate: {e:#}");
            let _ = error_tx.try_send(RecognizerError::InputUnavailable {
                reason: format!("{e:#}"),
            });
            return;
        }
    };

    match estimate_pitch(&frame, sample_rate, config) {
        Ok(estimate) => {
            debug!(
                "publishing {:.1} Hz ({})",
                estimate.frequency_hz,
                estimate.note_name.unwrap_or("no note")
            );
            publish(shared, estimate);
        }
        // Analysis failures are local to the tick; the previous estimate
        // stays published and the loop keeps going.
        Err(e) => warn!("skipping tick: {e}"),
    }
}

fn publish(shared: &SharedState, estimate: PitchEstimate) {
    {
        let mut latest = shared
            .latest
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        *latest = estimate;
    }
    shared.published.fetch_add(1, Ordering::Release);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::SineSource;
    use std::time::{Duration, Instant};

    fn init_logs() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn test_config() -> RecognizerConfig {
        RecognizerConfig {
            buffer_size: 256,
            tick_interval_ms: 10,
            ..RecognizerConfig::default()
        }
    }

    /// Polls until the condition holds or the timeout elapses.
    fn wait_until(timeout: Duration, mut ready: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if ready() {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        ready()
    }

    fn sine_frame(frequency: f32, sample_rate: u32, buffer_size: usize) -> Vec<f32> {
        (0..buffer_size)
            .map(|t| {
                (2.0 * std::f32::consts::PI * frequency * t as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    /// Supplies a number of good frames, then fails every request.
    struct FlakySource {
        good_frames: usize,
        sample_rate: u32,
        buffer_size: usize,
    }

    impl SampleSource for FlakySource {
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn next_frame(&mut self) -> anyhow::Result<Vec<f32>> {
            if self.good_frames == 0 {
                anyhow::bail!("microphone unplugged");
            }
            self.good_frames -= 1;
            Ok(sine_frame(440.0, self.sample_rate, self.buffer_size))
        }
    }

    /// Supplies a number of good frames, then frames that are too short.
    struct ShrinkingSource {
        good_frames: usize,
        sample_rate: u32,
        buffer_size: usize,
    }

    impl SampleSource for ShrinkingSource {
        fn sample_rate(&self) -> u32 {
            self.sample_rate
        }

        fn next_frame(&mut self) -> anyhow::Result<Vec<f32>> {
            if self.good_frames == 0 {
                return Ok(vec![0.0; 8]);
            }
            self.good_frames -= 1;
            Ok(sine_frame(440.0, self.sample_rate, self.buffer_size))
        }
    }

    #[test]
    fn recognizes_a_tone_and_goes_quiet_after_stop() {
        init_logs();
        let source = SineSource::new(440.0, 8192, 256);
        let mut recognizer = PitchRecognizer::start(source, test_config()).unwrap();

        assert!(
            wait_until(Duration::from_secs(2), || recognizer.published() >= 3),
            "loop never published"
        );
        let estimate = recognizer.latest();
        assert_eq!(estimate.note_name, Some("A"));
        assert!(
            (estimate.frequency_hz - 440.0).abs() <= 8192.0 / 256.0,
            "estimate off by more than a bin: {} Hz",
            estimate.frequency_hz
        );

        recognizer.stop();
        let frozen = recognizer.published();
        thread::sleep(Duration::from_millis(60));
        assert_eq!(
            recognizer.published(),
            frozen,
            "no publish may happen after stop() returns"
        );
        assert_eq!(recognizer.latest().note_name, Some("A"));

        // Second stop is a no-op.
        recognizer.stop();
        assert_eq!(recognizer.published(), frozen);
    }

    #[test]
    fn input_failure_keeps_the_last_estimate() {
        init_logs();
        let source = FlakySource {
            good_frames: 3,
            sample_rate: 8192,
            buffer_size: 256,
        };
        let recognizer = PitchRecognizer::start(source, test_config()).unwrap();
        let errors = recognizer.errors();

        assert!(
            wait_until(Duration::from_secs(2), || recognizer.published() == 3),
            "expected three publishes before the source failed"
        );
        let report = errors
            .recv_timeout(Duration::from_secs(2))
            .expect("failure should be reported");
        match report {
            RecognizerError::InputUnavailable { reason } => {
                assert!(reason.contains("microphone unplugged"), "reason: {}", reason);
            }
            other => panic!("unexpected report: {other:?}"),
        }

        let last = recognizer.latest();
        assert_eq!(last.note_name, Some("A"));
        thread::sleep(Duration::from_millis(60));
        assert_eq!(recognizer.published(), 3, "failed ticks must not publish");
        assert_eq!(recognizer.latest(), last, "estimate must survive failures");
    }

    #[test]
    fn short_frames_skip_ticks_without_reports() {
        init_logs();
        let source = ShrinkingSource {
            good_frames: 2,
            sample_rate: 8192,
            buffer_size: 256,
        };
        let recognizer = PitchRecognizer::start(source, test_config()).unwrap();

        assert!(
            wait_until(Duration::from_secs(2), || recognizer.published() == 2),
            "expected two publishes before the frames shrank"
        );
        thread::sleep(Duration::from_millis(60));
        assert_eq!(recognizer.published(), 2, "short frames must be skipped");
        assert_eq!(recognizer.latest().note_name, Some("A"));
        assert!(
            recognizer.errors().try_recv().is_err(),
            "length mismatches are handled locally, not reported"
        );
    }

    #[test]
    fn a_source_that_never_delivers_leaves_the_initial_estimate() {
        init_logs();
        let source = FlakySource {
            good_frames: 0,
            sample_rate: 8192,
            buffer_size: 256,
        };
        let recognizer = PitchRecognizer::start(source, test_config()).unwrap();

        recognizer
            .errors()
            .recv_timeout(Duration::from_secs(2))
            .expect("failure should be reported");
        assert_eq!(recognizer.published(), 0);
        assert_eq!(recognizer.latest(), PitchEstimate::default());
    }

    #[test]
    fn start_rejects_a_degenerate_config() {
        let config = RecognizerConfig {
            buffer_size: 1,
            ..test_config()
        };
        let result = PitchRecognizer::start(SineSource::new(440.0, 8192, 1), config);
        assert!(matches!(
            result,
            Err(RecognizerError::InvalidConfig { .. })
        ));
    }
}
