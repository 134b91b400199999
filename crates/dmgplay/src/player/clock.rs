//! Sample-accurate wall-clock pacing.
//!
//! VGM waits are expressed in samples at a fixed 44100 Hz. The clock keeps
//! one running sample total for the whole session and converts it into a
//! deadline measured from a single monotonic origin, so rounding never
//! accumulates across waits or loop iterations.
//!
//! Waiting is an explicit busy-poll of `Instant::now()`. OS sleeps and
//! timers overshoot by up to a scheduler tick, which is audible at these
//! rates, so the playback thread spins at full CPU while waiting.
use std::time::{Duration, Instant};

use super::Outcome;
use super::session::Interrupt;

/// Sample rate all VGM wait commands are expressed in.
pub const SAMPLE_RATE: u64 = 44_100;

/// Convert a sample count at `SAMPLE_RATE` into a wall-clock duration.
pub fn samples_to_duration(samples: u64) -> Duration {
    let secs = samples / SAMPLE_RATE;
    let rem = samples % SAMPLE_RATE;
    let nanos = rem * 1_000_000_000 / SAMPLE_RATE;
    Duration::new(secs, nanos as u32)
}

/// Logical playback time plus the monotonic origin it is measured from.
#[derive(Debug, Clone, Default)]
pub struct SampleClock {
    origin: Option<Instant>,
    samples: u64,
}

impl SampleClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture the origin and reset the sample total.
    pub fn start(&mut self) {
        self.origin = Some(Instant::now());
        self.samples = 0;
    }

    /// Origin of the session, if the clock has been started.
    pub fn origin(&self) -> Option<Instant> {
        self.origin
    }

    /// Total samples accumulated since `start`.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    pub(crate) fn advance(&mut self, samples: u32) {
        self.samples = self.samples.saturating_add(samples as u64);
    }

    /// Instant at which the accumulated sample total is due.
    ///
    /// Starts the clock if nothing has started it yet.
    pub fn deadline(&mut self) -> Instant {
        let origin = *self.origin.get_or_insert_with(Instant::now);
        origin + samples_to_duration(self.samples)
    }

    /// Spin until the accumulated sample total is due or an interruption
    /// is requested.
    pub(crate) fn wait_due(&mut self, interrupt: &Interrupt) -> Outcome {
        let deadline = self.deadline();
        loop {
            if interrupt.is_requested() {
                return Outcome::Interrupted;
            }
            if Instant::now() >= deadline {
                return Outcome::Completed;
            }
            std::hint::spin_loop();
        }
    }
}
