//! Error types shared by the loader, the decoder and the player.
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by `dmgplay` operations.
///
/// Every variant is terminal: callers report it and stop. Unknown command
/// opcodes and user interruption are not errors and never surface here.
#[derive(Debug, Error)]
pub enum Error {
    /// The gzip wrapper could not be decoded.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// The decoded capture failed header validation.
    #[error(transparent)]
    Format(#[from] FormatError),

    /// The serial device could not be opened for writing.
    #[error("failed to open device {path}: {source}")]
    DeviceOpen {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The capture file could not be read from storage.
    #[error("failed to read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A packet could not be written to the link in full.
    #[error("link write failed: {0}")]
    LinkWrite(#[source] io::Error),
}

/// Failures of the gzip decoder adapter.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The input is too short to hold a gzip header and length trailer.
    #[error("compressed input too short: {0} bytes")]
    TooShort(usize),

    /// The header, deflate stream or CRC32/ISIZE trailer did not verify.
    #[error("gzip stream error: {0}")]
    Stream(#[source] io::Error),

    /// The stream produced a different number of bytes than the trailer declares.
    #[error("decoded length mismatch: declared {declared}, got {actual}")]
    LengthMismatch { declared: usize, actual: usize },
}

/// Header validation failures of the format loader.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// The buffer is shorter than the fixed 256-byte header.
    #[error("invalid file size: {0} bytes")]
    TooShort(usize),

    /// The leading signature is not `"Vgm"`.
    #[error("this isn't a VGM file (ident {0:02X?})")]
    InvalidIdent([u8; 3]),

    /// The header version predates DMG support.
    #[error("unsupported VGM version 0x{0:08X} (need 0x00000161 or later)")]
    UnsupportedVersion(u32),

    /// The DMG clock field is zero: the capture does not target the DMG.
    #[error("this isn't a GameBoy DMG file")]
    UnsupportedChip,

    /// The end-of-file field disagrees with the actual buffer length.
    #[error("invalid file size: header declares {declared} bytes, buffer has {actual}")]
    SizeMismatch { declared: u64, actual: usize },

    /// A resolved offset falls outside the range its role requires.
    ///
    /// - `field` names the header field the offset came from.
    /// - `offset` is the resolved absolute position.
    /// - `limit` is the bound it violated.
    #[error("{field} offset 0x{offset:X} out of range (limit 0x{limit:X})")]
    OffsetOutOfRange {
        field: &'static str,
        offset: u64,
        limit: u64,
    },
}
