//! Little-endian byte readers used by the loader, the tag extractor and the
//! scheduler.
//!
//! Every reader composes the value from individual bytes, so callers may
//! pass any sub-slice of a capture regardless of its alignment.
use crate::error::FormatError;

/// Read a 32-bit little-endian unsigned integer from `bytes` at `off`.
///
/// Returns `Err(FormatError::OffsetOutOfRange)` naming `field` when the four
/// bytes starting at `off` are not available.
pub(crate) fn read_u32_le_at(
    bytes: &[u8],
    off: usize,
    field: &'static str,
) -> Result<u32, FormatError> {
    match off.checked_add(4).and_then(|end| bytes.get(off..end)) {
        Some(b) => Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]])),
        None => Err(FormatError::OffsetOutOfRange {
            field,
            offset: off as u64,
            limit: bytes.len() as u64,
        }),
    }
}

/// Read a 16-bit little-endian unsigned integer from `bytes` at `off`.
///
/// Returns `None` when fewer than two bytes remain.
pub(crate) fn read_u16_le_at(bytes: &[u8], off: usize) -> Option<u16> {
    let b = bytes.get(off..off.checked_add(2)?)?;
    Some(u16::from_le_bytes([b[0], b[1]]))
}
