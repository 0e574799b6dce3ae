// Error taxonomy for BPS validation and application.
//
// Every failure is fatal to the call that raised it: a BPS patch is
// applied all-or-nothing, and no retry or partial result exists.

use thiserror::Error;

use super::header::MIN_PATCH_LEN;
use super::reader::CommandTag;

/// Errors surfaced by patch validation, inspection, and application.
#[derive(Debug, Error)]
pub enum PatchError {
    /// Bad magic marker, malformed number, or malformed header field.
    #[error("invalid patch: {0}")]
    Format(String),

    /// Patch shorter than the smallest possible valid BPS stream.
    #[error("patch too short: {len} bytes, minimum {}", MIN_PATCH_LEN)]
    Truncated { len: usize },

    /// A stored CRC-32 does not match the recomputed value.
    #[error("{subject} checksum mismatch: stored {stored:#010x}, computed {computed:#010x}")]
    Checksum {
        subject: &'static str,
        stored: u32,
        computed: u32,
    },

    /// A command would move a cursor outside its capacity.
    #[error(
        "{detail} ({tag} at patch offset {offset:#x}: length {length:#x}, \
         source position {source_position:#x}, target position {target_position:#x}, \
         outread position {outread_position:#x})"
    )]
    Bounds {
        detail: &'static str,
        tag: CommandTag,
        /// Byte offset of the command within the patch.
        offset: usize,
        length: u64,
        source_position: u64,
        target_position: u64,
        outread_position: u64,
    },

    /// The command stream did not produce exactly the declared target size.
    #[error("final target size incorrect: expected {expected}, actual {actual}")]
    SizeMismatch { expected: u64, actual: u64 },

    /// The supplied source is not the file the patch was built against.
    #[error("incompatible source: stored checksum {stored:#010x}, computed {computed:#010x}")]
    IncompatibleSource { stored: u32, computed: u32 },
}
