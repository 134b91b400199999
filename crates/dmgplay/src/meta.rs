//! Gd3 metadata extraction.
//!
//! The Gd3 chunk consists of a four-byte identifier (`"Gd3 "`), a 32-bit
//! version, a 32-bit length, and then eleven UTF-16LE nul-terminated
//! strings (track name, game name, author, ...), English and Japanese
//! variants interleaved.
//!
//! `Gd3::extract` borrows each field directly from the capture buffer
//! instead of copying it. Extraction is tolerant: the length field is
//! ignored, scanning stops at the end of the file, and truncated or
//! malformed data simply yields fewer fields.
use crate::binutil::read_u16_le_at;
use crate::vgm::HeaderOffsets;

/// Identifier checked at the start of the tag block.
pub const GD3_IDENT: &[u8; 3] = b"Gd3";

/// Distance from the identifier to the first string.
const GD3_DATA_OFFSET: usize = 12;

/// Number of string fields in a Gd3 block.
pub const GD3_FIELD_COUNT: usize = 11;

/// Tag fields borrowed from a capture buffer.
///
/// Each slot holds the raw UTF-16LE bytes of one field, without its
/// terminator. Empty and missing fields are `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Gd3<'a> {
    fields: [Option<&'a [u8]>; GD3_FIELD_COUNT],
}

impl<'a> Gd3<'a> {
    /// Locate and split the Gd3 block of a capture.
    ///
    /// Returns `None` when the header has no tag offset or the identifier
    /// at that offset does not match.
    pub fn extract(bytes: &'a [u8], offsets: &HeaderOffsets) -> Option<Self> {
        let start = offsets.tag_start? as usize;
        let end = (offsets.end as usize).min(bytes.len());
        if bytes.get(start..start.checked_add(GD3_IDENT.len())?)? != GD3_IDENT {
            return None;
        }
        Some(Self::split(bytes, start + GD3_DATA_OFFSET, end))
    }

    fn split(bytes: &'a [u8], mut pos: usize, end: usize) -> Self {
        let mut fields = [None; GD3_FIELD_COUNT];
        let mut slot = 0;
        let mut field_start = pos;

        while slot < GD3_FIELD_COUNT && pos + 2 <= end {
            if read_u16_le_at(bytes, pos) == Some(0) {
                if pos > field_start {
                    fields[slot] = Some(&bytes[field_start..pos]);
                }
                slot += 1;
                field_start = pos + 2;
            }
            pos += 2;
        }

        Gd3 { fields }
    }

    /// Raw UTF-16LE bytes of field `index`.
    pub fn raw_field(&self, index: usize) -> Option<&'a [u8]> {
        self.fields.get(index).copied().flatten()
    }

    /// Field `index` decoded as text. Unpaired surrogates are replaced.
    pub fn field(&self, index: usize) -> Option<String> {
        let raw = self.raw_field(index)?;
        let units: Vec<u16> = raw
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect();
        Some(String::from_utf16_lossy(&units))
    }

    /// Number of populated fields.
    pub fn len(&self) -> usize {
        self.fields.iter().filter(|f| f.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn track_name(&self) -> Option<String> {
        self.field(0)
    }

    pub fn track_name_jp(&self) -> Option<String> {
        self.field(1)
    }

    pub fn game_name(&self) -> Option<String> {
        self.field(2)
    }

    pub fn game_name_jp(&self) -> Option<String> {
        self.field(3)
    }

    pub fn system_name(&self) -> Option<String> {
        self.field(4)
    }

    pub fn system_name_jp(&self) -> Option<String> {
        self.field(5)
    }

    pub fn artist_name(&self) -> Option<String> {
        self.field(6)
    }

    pub fn artist_name_jp(&self) -> Option<String> {
        self.field(7)
    }

    pub fn release_date(&self) -> Option<String> {
        self.field(8)
    }

    /// Person who made the capture ("VGM creator" in the Gd3 layout).
    pub fn dumper(&self) -> Option<String> {
        self.field(9)
    }

    pub fn notes(&self) -> Option<String> {
        self.field(10)
    }
}
