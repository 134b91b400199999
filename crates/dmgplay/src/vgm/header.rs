//! VGM header fields and offset resolution.
//!
//! Only the handful of main-header fields the DMG player needs are
//! modelled. Relative offsets are stored on disk as "value measured from
//! the field's own position", so each absolute offset is the raw value plus
//! the field offset. A raw value of 0 means "none" for the GD3 and loop
//! fields.
use crate::binutil::read_u32_le_at;
use crate::error::FormatError;

/// Size of the fixed main header the loader insists on.
pub const VGM_MIN_FILE_SIZE: usize = 0x100;

/// Leading signature of every VGM file.
pub const VGM_IDENT: &[u8; 3] = b"Vgm";

/// First VGM version defining the DMG clock field.
pub const VGM_MIN_VERSION: u32 = 0x0000_0161;

/// Enum identifying the header fields the loader reads and their on-disk
/// offsets.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum HeaderField {
    Ident,
    EofOffset,
    Version,
    Gd3Offset,
    LoopOffset,
    DataOffset,
    GbDmgClock,
}

impl HeaderField {
    pub fn offset(self) -> usize {
        match self {
            HeaderField::Ident => 0x00,
            HeaderField::EofOffset => 0x04,
            HeaderField::Version => 0x08,
            HeaderField::Gd3Offset => 0x14,
            HeaderField::LoopOffset => 0x1C,
            HeaderField::DataOffset => 0x34,
            HeaderField::GbDmgClock => 0x80,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            HeaderField::Ident => "ident",
            HeaderField::EofOffset => "eof",
            HeaderField::Version => "version",
            HeaderField::Gd3Offset => "gd3",
            HeaderField::LoopOffset => "loop",
            HeaderField::DataOffset => "data",
            HeaderField::GbDmgClock => "gb_dmg_clock",
        }
    }

    fn read(self, bytes: &[u8]) -> Result<u32, FormatError> {
        read_u32_le_at(bytes, self.offset(), self.name())
    }

    /// Resolve a relative-offset field into an absolute offset.
    ///
    /// Returns the raw value alongside so callers can apply the
    /// "raw 0 means none" rule without comparing resolved offsets.
    fn resolve(self, bytes: &[u8]) -> Result<(u32, u32), FormatError> {
        let raw = self.read(bytes)?;
        let abs = raw
            .checked_add(self.offset() as u32)
            .ok_or(FormatError::OffsetOutOfRange {
                field: self.name(),
                offset: raw as u64 + self.offset() as u64,
                limit: u32::MAX as u64,
            })?;
        Ok((raw, abs))
    }
}

/// Absolute byte offsets resolved from a validated VGM header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderOffsets {
    /// End of file; always equal to the buffer length.
    pub end: u32,
    /// First byte of the loop segment, `None` when the file does not loop.
    pub loop_start: Option<u32>,
    /// First command byte.
    pub data_start: u32,
    /// Start of the GD3 block, `None` when the file carries no tags.
    pub tag_start: Option<u32>,
}

impl HeaderOffsets {
    /// Exclusive upper bound of the command stream: the GD3 block when
    /// present, otherwise the end of the file.
    pub fn stream_end(&self) -> u32 {
        self.tag_start.unwrap_or(self.end)
    }

    /// Validate the header in `bytes` and resolve its offsets.
    ///
    /// Checks run in a fixed order so that the first reported error matches
    /// the most fundamental problem: size, signature, version, DMG clock,
    /// declared length, then offset ranges.
    pub fn parse(bytes: &[u8]) -> Result<Self, FormatError> {
        if bytes.len() < VGM_MIN_FILE_SIZE {
            return Err(FormatError::TooShort(bytes.len()));
        }

        let ident = &bytes[..VGM_IDENT.len()];
        if ident != VGM_IDENT {
            return Err(FormatError::InvalidIdent([ident[0], ident[1], ident[2]]));
        }

        let version = HeaderField::Version.read(bytes)?;
        if version < VGM_MIN_VERSION {
            return Err(FormatError::UnsupportedVersion(version));
        }

        if HeaderField::GbDmgClock.read(bytes)? == 0 {
            return Err(FormatError::UnsupportedChip);
        }

        let eof_rel = HeaderField::EofOffset.read(bytes)? as u64;
        let declared = eof_rel + HeaderField::EofOffset.offset() as u64;
        if declared != bytes.len() as u64 {
            return Err(FormatError::SizeMismatch {
                declared,
                actual: bytes.len(),
            });
        }
        // all on-disk offsets are u32
        let end = u32::try_from(declared).map_err(|_| FormatError::OffsetOutOfRange {
            field: HeaderField::EofOffset.name(),
            offset: declared,
            limit: u32::MAX as u64,
        })?;

        let (loop_raw, loop_abs) = HeaderField::LoopOffset.resolve(bytes)?;
        let (_, data_start) = HeaderField::DataOffset.resolve(bytes)?;
        let (gd3_raw, gd3_abs) = HeaderField::Gd3Offset.resolve(bytes)?;

        let offsets = HeaderOffsets {
            end,
            loop_start: (loop_raw != 0).then_some(loop_abs),
            data_start,
            tag_start: (gd3_raw != 0).then_some(gd3_abs),
        };
        offsets.check_ranges()?;
        Ok(offsets)
    }

    fn check_ranges(&self) -> Result<(), FormatError> {
        if let Some(tag) = self.tag_start
            && (tag <= self.data_start || tag > self.end)
        {
            return Err(FormatError::OffsetOutOfRange {
                field: HeaderField::Gd3Offset.name(),
                offset: tag as u64,
                limit: self.end as u64,
            });
        }

        let stream_end = self.stream_end();
        if self.data_start >= stream_end {
            return Err(FormatError::OffsetOutOfRange {
                field: HeaderField::DataOffset.name(),
                offset: self.data_start as u64,
                limit: stream_end as u64,
            });
        }

        if let Some(lp) = self.loop_start
            && (lp < self.data_start || lp >= stream_end)
        {
            return Err(FormatError::OffsetOutOfRange {
                field: HeaderField::LoopOffset.name(),
                offset: lp as u64,
                limit: stream_end as u64,
            });
        }

        Ok(())
    }
}
