//! Command stream walker.
//!
//! `play` interprets the DMG subset of the VGM command set in file order:
//! register writes go straight to the link, wait commands advance the
//! session clock and block until it is due. Unknown opcodes are skipped
//! one byte at a time so captures containing newer commands still play.
use std::io::Write;

use super::Outcome;
use super::link::{GB_DMG_WRITE, GbDmgWrite};
use super::session::Session;
use crate::binutil::read_u16_le_at;
use crate::error::Error;

const WAIT_N_SAMPLES: u8 = 0x61;
const WAIT_735_SAMPLES: u8 = 0x62;
const WAIT_882_SAMPLES: u8 = 0x63;
const END_OF_DATA: u8 = 0x66;

/// Play the commands in `data[start..end]`.
///
/// Returns `Outcome::Completed` at an end-of-data command or when the range
/// is exhausted, including when the last command's operands would run past
/// `end`. Returns `Outcome::Interrupted` as soon as the session's interrupt
/// is observed, before the next command or during a wait.
pub fn play<W: Write>(
    session: &mut Session<W>,
    data: &[u8],
    start: usize,
    end: usize,
) -> Result<Outcome, Error> {
    let end = end.min(data.len());
    let mut pos = start;

    while pos < end {
        if session.interrupt().is_requested() {
            return Ok(Outcome::Interrupted);
        }

        let opcode = data[pos];
        let (samples, len) = match opcode {
            GB_DMG_WRITE => {
                if pos + 3 > end {
                    break;
                }
                session.emit(GbDmgWrite {
                    register: data[pos + 1],
                    value: data[pos + 2],
                })?;
                (0, 3)
            }
            WAIT_N_SAMPLES => {
                if pos + 3 > end {
                    break;
                }
                match read_u16_le_at(data, pos + 1) {
                    Some(n) => (n as u32, 3),
                    None => break,
                }
            }
            WAIT_735_SAMPLES => (735, 1),
            WAIT_882_SAMPLES => (882, 1),
            0x70..=0x7F => ((opcode & 0x0F) as u32 + 1, 1),
            END_OF_DATA => {
                log::debug!("end of data at 0x{:X}", pos);
                return Ok(Outcome::Completed);
            }
            _ => {
                log::trace!("skipping unknown opcode 0x{:02X} at 0x{:X}", opcode, pos);
                (0, 1)
            }
        };

        if samples > 0 && session.wait(samples) == Outcome::Interrupted {
            return Ok(Outcome::Interrupted);
        }
        pos += len;
    }

    Ok(Outcome::Completed)
}
