//! Gzip decoder adapter for `.vgz` captures.
//!
//! A `.vgz` file is a single gzip member whose 4-byte trailer holds the
//! uncompressed length (ISIZE). `inflate` reads at most one guard byte past
//! that length, and relies on
//! `flate2::read::GzDecoder` to verify the CRC32 and ISIZE trailer when the
//! stream reaches its end.
use std::io::Read;

use flate2::read::GzDecoder;

use crate::error::DecodeError;

/// Leading bytes of every gzip stream.
pub const GZIP_MAGIC: [u8; 2] = [0x1F, 0x8B];

/// Upper bound on the initial output reservation, as a multiple of the
/// compressed size.
const MAX_RESERVE_RATIO: usize = 16;

/// Return `true` when `bytes` starts with the gzip magic.
pub fn is_gzip(bytes: &[u8]) -> bool {
    bytes.starts_with(&GZIP_MAGIC)
}

/// Decompress a gzip-wrapped capture.
///
/// The returned buffer holds exactly the number of bytes declared by the
/// trailer. A stream that ends early, runs past the declared length, or
/// fails its checksum is rejected.
pub fn inflate(src: &[u8]) -> Result<Vec<u8>, DecodeError> {
    // 2 bytes of magic plus the 4-byte length trailer
    if src.len() < 6 {
        return Err(DecodeError::TooShort(src.len()));
    }

    let t = &src[src.len() - 4..];
    let declared = u32::from_le_bytes([t[0], t[1], t[2], t[3]]) as usize;

    // the trailer is untrusted; cap the up-front reservation and let the
    // buffer grow if the stream really is that large
    let reserve = declared.min(src.len().saturating_mul(MAX_RESERVE_RATIO));
    let mut out = Vec::with_capacity(reserve.saturating_add(1));
    let guard_limit = declared as u64 + 1;
    GzDecoder::new(src)
        .take(guard_limit)
        .read_to_end(&mut out)
        .map_err(DecodeError::Stream)?;

    if out.len() != declared {
        return Err(DecodeError::LengthMismatch {
            declared,
            actual: out.len(),
        });
    }

    Ok(out)
}

/// Return the capture bytes, inflating them first when they are gzip-wrapped.
pub fn unwrap_capture(bytes: Vec<u8>) -> Result<Vec<u8>, DecodeError> {
    if is_gzip(&bytes) {
        log::debug!("gzip wrapper detected ({} compressed bytes)", bytes.len());
        inflate(&bytes)
    } else {
        Ok(bytes)
    }
}
