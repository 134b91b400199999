//! Real-time playback of a capture onto a DMG link.
//!
//! A run is one initial pass over the command stream followed by the loop
//! controller repeating the loop segment:
//!
//! ```text
//! data_start ........ loop_start ........ stream_end
//! |------------- initial pass -------------|
//!                     |---- loop pass -----| x N (or until interrupted)
//! ```
//!
//! All passes share one [`Session`], so the sample clock runs on across
//! loop boundaries and the link is muted exactly once at the end.
//!
//! ```no_run
//! use dmgplay::player::{self, Interrupt, LoopConfig, Session};
//! use dmgplay::vgm::Capture;
//!
//! let raw = std::fs::read("song.vgz")?;
//! let capture = Capture::load(raw)?;
//! let port = std::fs::OpenOptions::new().write(true).open("/dev/ttyACM0")?;
//! let mut session = Session::new(port, Interrupt::new());
//! player::run(&mut session, &capture, LoopConfig::new(2))?;
//! session.shutdown()?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
mod clock;
mod link;
mod scheduler;
mod session;

pub use clock::{SAMPLE_RATE, SampleClock, samples_to_duration};
pub use link::{Emitter, GB_DMG_WRITE, GbDmgWrite, MUTE};
pub use scheduler::play;
pub use session::{Interrupt, Session};

use std::io::Write;

use crate::error::Error;
use crate::vgm::Capture;

/// How a pass or a whole run ended.
#[must_use]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The stream (or every requested repeat) played to its end.
    Completed,
    /// The session's interrupt was observed.
    Interrupted,
}

/// Number of times the loop segment is replayed after the initial pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopConfig {
    repeats: u32,
}

impl Default for LoopConfig {
    fn default() -> Self {
        LoopConfig { repeats: 1 }
    }
}

impl LoopConfig {
    /// `repeats == 0` loops until interrupted.
    pub fn new(repeats: u32) -> Self {
        LoopConfig { repeats }
    }

    pub fn infinite() -> Self {
        LoopConfig { repeats: 0 }
    }

    pub fn repeats(&self) -> u32 {
        self.repeats
    }

    pub fn is_infinite(&self) -> bool {
        self.repeats == 0
    }

    /// Invoke `pass` once per repeat, with the zero-based iteration index.
    ///
    /// Stops early on the first error or `Outcome::Interrupted`. With an
    /// infinite configuration this only returns through one of those.
    pub fn drive<F>(&self, mut pass: F) -> Result<Outcome, Error>
    where
        F: FnMut(u32) -> Result<Outcome, Error>,
    {
        let mut i: u32 = 0;
        while self.is_infinite() || i < self.repeats {
            if pass(i)? == Outcome::Interrupted {
                return Ok(Outcome::Interrupted);
            }
            i = i.wrapping_add(1);
        }
        Ok(Outcome::Completed)
    }
}

/// Play `capture` from its data offset, then repeat its loop segment as
/// configured.
///
/// Starts the session clock. Does not shut the session down; the caller
/// decides when to mute and release the link.
pub fn run<W: Write>(
    session: &mut Session<W>,
    capture: &Capture,
    loops: LoopConfig,
) -> Result<Outcome, Error> {
    let bytes = capture.as_bytes();
    let offsets = capture.offsets();
    let stream_end = offsets.stream_end() as usize;

    session.start_clock();
    log::debug!(
        "initial pass 0x{:X}..0x{:X}",
        offsets.data_start,
        stream_end
    );
    if play(session, bytes, offsets.data_start as usize, stream_end)? == Outcome::Interrupted {
        return Ok(Outcome::Interrupted);
    }

    let Some(loop_start) = offsets.loop_start else {
        log::debug!("no loop segment");
        return Ok(Outcome::Completed);
    };

    loops.drive(|i| {
        log::info!(
            "loop {}{} (0x{:X}..0x{:X})",
            i + 1,
            if loops.is_infinite() {
                String::new()
            } else {
                format!("/{}", loops.repeats())
            },
            loop_start,
            stream_end
        );
        play(session, bytes, loop_start as usize, stream_end)
    })
}
