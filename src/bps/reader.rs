// Cursor over an in-memory BPS patch and command decoding.
//
// Every number read through the cursor honors the format's tail guard:
// a number may start on, but never advance past, the first byte of the
// trailing 12-byte checksum footer. The footer region itself can never
// contain command data.

use std::fmt;

use super::error::PatchError;
use super::header::FOOTER_LEN;
use super::varint::{self, VarintError};

// ---------------------------------------------------------------------------
// Commands
// ---------------------------------------------------------------------------

/// The four BPS instruction kinds, taken from the low two bits of a
/// command number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandTag {
    /// Copy bytes from the source at the current output offset.
    SourceRead,
    /// Copy literal bytes embedded in the patch.
    TargetRead,
    /// Copy bytes from the source at a relative offset.
    SourceCopy,
    /// Copy bytes from the output produced so far.
    TargetCopy,
}

impl fmt::Display for CommandTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CommandTag::SourceRead => "SourceRead",
            CommandTag::TargetRead => "TargetRead",
            CommandTag::SourceCopy => "SourceCopy",
            CommandTag::TargetCopy => "TargetCopy",
        };
        f.write_str(name)
    }
}

/// One decoded instruction. The length is always at least 1; the copy
/// kinds carry a signed relative offset decoded from a following number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SourceRead { length: u64 },
    TargetRead { length: u64 },
    SourceCopy { length: u64, offset: i64 },
    TargetCopy { length: u64, offset: i64 },
}

impl Command {
    pub fn tag(&self) -> CommandTag {
        match self {
            Command::SourceRead { .. } => CommandTag::SourceRead,
            Command::TargetRead { .. } => CommandTag::TargetRead,
            Command::SourceCopy { .. } => CommandTag::SourceCopy,
            Command::TargetCopy { .. } => CommandTag::TargetCopy,
        }
    }

    pub fn length(&self) -> u64 {
        match *self {
            Command::SourceRead { length }
            | Command::TargetRead { length }
            | Command::SourceCopy { length, .. }
            | Command::TargetCopy { length, .. } => length,
        }
    }
}

// ---------------------------------------------------------------------------
// Patch reader
// ---------------------------------------------------------------------------

/// Forward cursor over the patch slice. Positions are absolute byte
/// offsets into the patch, so they can be reported in errors verbatim.
pub(crate) struct PatchReader<'a> {
    patch: &'a [u8],
    /// Current read position.
    pub(crate) pos: usize,
    /// First byte of the checksum footer; the command region ends here.
    pub(crate) limit: usize,
}

impl<'a> PatchReader<'a> {
    /// The caller guarantees `patch.len() >= FOOTER_LEN`.
    pub(crate) fn new(patch: &'a [u8], pos: usize) -> Self {
        Self {
            patch,
            pos,
            limit: patch.len() - FOOTER_LEN,
        }
    }

    /// True while at least one command byte remains before the footer.
    pub(crate) fn has_commands(&self) -> bool {
        self.pos < self.limit
    }

    /// Decode one number, advancing the cursor.
    ///
    /// A number may occupy bytes up to and including the first footer
    /// byte, but no further; running past that bound is an underflow.
    pub(crate) fn read_number(&mut self) -> Result<u64, VarintError> {
        let hard_end = self.limit + 1;
        let window = self
            .patch
            .get(self.pos..hard_end)
            .ok_or(VarintError::Underflow)?;
        let (value, consumed) = varint::decode_u64(window)?;
        self.pos += consumed;
        Ok(value)
    }

    /// Decode one signed number: the low bit selects the sign, the
    /// remaining bits the magnitude.
    pub(crate) fn read_signed(&mut self) -> Result<i64, VarintError> {
        let raw = self.read_number()?;
        let magnitude = i64::try_from(raw >> 1).map_err(|_| VarintError::Overflow)?;
        Ok(if raw & 1 != 0 { -magnitude } else { magnitude })
    }

    /// Decode the next command, including the offset number for the two
    /// copy kinds. The literal payload of a TargetRead is left in place
    /// for the caller.
    pub(crate) fn next_command(&mut self) -> Result<Command, PatchError> {
        let start = self.pos;
        let data = self.read_number().map_err(|e| {
            PatchError::Format(format!("invalid command encoding at offset {start:#x}: {e}"))
        })?;
        let length = (data >> 2) + 1;
        let command = match data & 3 {
            0 => Command::SourceRead { length },
            1 => Command::TargetRead { length },
            tag => {
                let offset = self.read_signed().map_err(|e| {
                    PatchError::Format(format!(
                        "invalid copy offset at offset {start:#x}: {e}"
                    ))
                })?;
                if tag == 2 {
                    Command::SourceCopy { length, offset }
                } else {
                    Command::TargetCopy { length, offset }
                }
            }
        };
        Ok(command)
    }

    /// Take `len` bytes at the cursor. Only call once the range has been
    /// proven in-bounds by validation.
    pub(crate) fn take(&mut self, len: usize) -> &'a [u8] {
        let bytes = &self.patch[self.pos..self.pos + len];
        self.pos += len;
        bytes
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
