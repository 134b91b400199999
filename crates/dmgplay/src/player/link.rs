//! Serial packet emitter.
//!
//! The hardware accepts one packet format: `[0xB3, register, value]`, where
//! `register` 0x00 maps to DMG address 0xFF10. There is no acknowledgement
//! or flow control, so each packet is written in full and flushed before
//! the next command is processed.
use std::io::Write;

use crate::error::Error;

/// Opcode marking a DMG register write, both in VGM streams and on the link.
pub const GB_DMG_WRITE: u8 = 0xB3;

/// Register write silencing the chip: NR52 (0xFF26) cleared powers the APU
/// off.
pub const MUTE: GbDmgWrite = GbDmgWrite {
    register: 0x16,
    value: 0x00,
};

/// A single DMG register write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GbDmgWrite {
    pub register: u8,
    pub value: u8,
}

impl GbDmgWrite {
    /// Wire form of the write.
    pub fn to_bytes(self) -> [u8; 3] {
        [GB_DMG_WRITE, self.register, self.value]
    }
}

/// Unbuffered writer of DMG packets to a link.
#[derive(Debug)]
pub struct Emitter<W: Write> {
    link: W,
    sent: u64,
}

impl<W: Write> Emitter<W> {
    pub fn new(link: W) -> Self {
        Emitter { link, sent: 0 }
    }

    /// Write one packet and flush it to the link.
    pub fn emit(&mut self, write: GbDmgWrite) -> Result<(), Error> {
        self.link
            .write_all(&write.to_bytes())
            .and_then(|_| self.link.flush())
            .map_err(Error::LinkWrite)?;
        self.sent += 1;
        Ok(())
    }

    /// Number of packets written so far.
    pub fn packets_sent(&self) -> u64 {
        self.sent
    }

    pub fn get_ref(&self) -> &W {
        &self.link
    }

    pub fn into_inner(self) -> W {
        self.link
    }
}
