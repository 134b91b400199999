//! Playback session: the single owner of the link and the sample clock.
//!
//! Interruption is modelled as a flag on a shared [`Interrupt`] handle. An
//! asynchronous handler (a Ctrl-C hook, a test) only calls
//! [`Interrupt::request`]; it never touches the link. The scheduler polls
//! the flag while waiting, returns [`Outcome::Interrupted`], and the
//! session owner then runs [`Session::shutdown`].
//!
//! Shutdown (mute packet, flush, release of the link) runs at most once.
//! The latch is an atomic on the shared handle, so a second caller, whether
//! an explicit call, `Drop`, or another path holding the same handle, sees
//! it already claimed and does nothing.
use std::io::{self, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::Outcome;
use super::clock::SampleClock;
use super::link::{Emitter, GbDmgWrite, MUTE};
use crate::error::Error;

#[derive(Debug, Default)]
struct InterruptState {
    requested: AtomicBool,
    shutting_down: AtomicBool,
}

/// Cloneable cancellation handle shared between a session and the code
/// that may interrupt it.
#[derive(Debug, Clone, Default)]
pub struct Interrupt {
    state: Arc<InterruptState>,
}

impl Interrupt {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the playback path to stop at its next poll. Safe to call from
    /// any thread, any number of times; performs no allocation.
    pub fn request(&self) {
        self.state.requested.store(true, Ordering::Release);
    }

    pub fn is_requested(&self) -> bool {
        self.state.requested.load(Ordering::Acquire)
    }

    /// Whether the mute-and-release sequence has been claimed.
    pub fn is_shutting_down(&self) -> bool {
        self.state.shutting_down.load(Ordering::Acquire)
    }

    /// Claim the shutdown sequence. Returns `true` for exactly one caller.
    fn claim_shutdown(&self) -> bool {
        !self.state.shutting_down.swap(true, Ordering::AcqRel)
    }
}

/// Link, clock and interruption state of one playback run.
#[derive(Debug)]
pub struct Session<W: Write> {
    link: Option<Emitter<W>>,
    clock: SampleClock,
    interrupt: Interrupt,
}

impl<W: Write> Session<W> {
    pub fn new(link: W, interrupt: Interrupt) -> Self {
        Session {
            link: Some(Emitter::new(link)),
            clock: SampleClock::new(),
            interrupt,
        }
    }

    pub fn interrupt(&self) -> &Interrupt {
        &self.interrupt
    }

    pub fn clock(&self) -> &SampleClock {
        &self.clock
    }

    /// Capture the clock origin. Called immediately before the first pass.
    pub fn start_clock(&mut self) {
        self.clock.start();
    }

    /// Packets written to the link so far, or `None` once it is released.
    pub fn packets_sent(&self) -> Option<u64> {
        self.link.as_ref().map(Emitter::packets_sent)
    }

    pub fn is_shut_down(&self) -> bool {
        self.link.is_none()
    }

    pub(crate) fn emit(&mut self, write: GbDmgWrite) -> Result<(), Error> {
        match self.link.as_mut() {
            Some(link) => link.emit(write),
            None => Err(Error::LinkWrite(io::Error::new(
                io::ErrorKind::NotConnected,
                "link already released",
            ))),
        }
    }

    /// Accumulate `samples` and spin until they are due.
    pub(crate) fn wait(&mut self, samples: u32) -> Outcome {
        self.clock.advance(samples);
        self.clock.wait_due(&self.interrupt)
    }

    /// Mute the chip and release the link.
    ///
    /// Only the first call across every holder of this session's
    /// [`Interrupt`] does anything; later calls return `Ok(())` without
    /// writing. The link is released even when the mute packet fails.
    pub fn shutdown(&mut self) -> Result<(), Error> {
        if !self.interrupt.claim_shutdown() {
            return Ok(());
        }
        let Some(mut link) = self.link.take() else {
            return Ok(());
        };
        let muted = link.emit(MUTE);
        drop(link);
        match &muted {
            Ok(()) => log::info!("chip muted, link released"),
            Err(e) => log::warn!("mute packet failed, link released: {}", e),
        }
        muted
    }
}

impl<W: Write> Drop for Session<W> {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
