//! Loaded VGM captures.
//!
//! `Capture` owns the decoded bytes of a capture together with the offsets
//! resolved from its header. Construction performs all header validation,
//! so a `Capture` value always satisfies the loader's invariants: the
//! buffer holds at least the fixed header, starts with `"Vgm"`, targets the
//! DMG, and its declared length matches.
mod header;

pub use header::{HeaderField, HeaderOffsets, VGM_IDENT, VGM_MIN_FILE_SIZE, VGM_MIN_VERSION};

use crate::error::{Error, FormatError};
use crate::meta::Gd3;

/// A validated, immutable VGM capture.
#[derive(Debug, Clone)]
pub struct Capture {
    bytes: Vec<u8>,
    offsets: HeaderOffsets,
}

impl Capture {
    /// Validate `bytes` as an uncompressed DMG capture.
    pub fn from_vec(bytes: Vec<u8>) -> Result<Self, FormatError> {
        let offsets = HeaderOffsets::parse(&bytes)?;
        log::debug!(
            "capture: end=0x{:X} data=0x{:X} loop={:?} gd3={:?}",
            offsets.end,
            offsets.data_start,
            offsets.loop_start,
            offsets.tag_start
        );
        Ok(Capture { bytes, offsets })
    }

    /// Load a capture from raw file contents, inflating a gzip wrapper first
    /// when one is present.
    pub fn load(raw: Vec<u8>) -> Result<Self, Error> {
        let bytes = crate::decode::unwrap_capture(raw)?;
        Ok(Capture::from_vec(bytes)?)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn offsets(&self) -> &HeaderOffsets {
        &self.offsets
    }

    /// Extract the GD3 tag block, if the capture carries one.
    pub fn gd3(&self) -> Option<Gd3<'_>> {
        Gd3::extract(&self.bytes, &self.offsets)
    }
}

impl TryFrom<Vec<u8>> for Capture {
    type Error = Error;

    fn try_from(raw: Vec<u8>) -> Result<Self, Self::Error> {
        Capture::load(raw)
    }
}
