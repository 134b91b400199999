//! dmgplay: real-time VGM playback onto Game Boy DMG hardware
//!
//! `dmgplay` replays a VGM capture of DMG register writes onto a physical
//! Game Boy over a serial link, paced to the capture's sample timing.
//!
//! Key pieces:
//! - [`decode`]: gzip adapter turning `.vgz` input into a plain capture.
//! - [`vgm::Capture`]: header validation and offset resolution.
//! - [`meta::Gd3`]: zero-copy access to the GD3 tag strings.
//! - [`player`]: the scheduler, packet emitter, loop controller and the
//!   once-only mute-and-release shutdown.
//!
//! Example: loading a capture and reading its tags
//!
//! ```rust
//! use dmgplay::vgm::Capture;
//!
//! let mut bytes = vec![0u8; 0x104];
//! bytes[..3].copy_from_slice(b"Vgm");
//! bytes[0x04..0x08].copy_from_slice(&(0x104u32 - 4).to_le_bytes());
//! bytes[0x08..0x0C].copy_from_slice(&0x161u32.to_le_bytes());
//! bytes[0x34..0x38].copy_from_slice(&(0x100u32 - 0x34).to_le_bytes());
//! bytes[0x80..0x84].copy_from_slice(&4_194_304u32.to_le_bytes());
//! bytes[0x100] = 0x66;
//!
//! let capture = Capture::load(bytes).expect("valid capture");
//! assert_eq!(capture.offsets().data_start, 0x100);
//! assert!(capture.gd3().is_none());
//! ```
mod binutil;
pub mod decode;
pub mod error;
pub mod meta;
pub mod player;
pub mod vgm;

pub use error::{DecodeError, Error, FormatError};
pub use player::{Interrupt, LoopConfig, Outcome, Session};
pub use vgm::Capture;
