// BPS patch format implementation.
//
// A BPS patch is a self-checksummed instruction stream that rebuilds a
// target byte sequence from a source byte sequence. Four instruction
// kinds exist: lockstep copy from the source, literal bytes from the
// patch, and two relative-offset copies (from the source, and from the
// output already produced).
//
// # Modules
//
// - `varint`   — Number encoding (bijective base-128, terminal bit set)
// - `reader`   — Patch cursor, tail guard, command decoding
// - `header`   — Magic, header numbers, metadata, checksum footer
// - `error`    — Error taxonomy for validation and application
// - `validate` — Full structural dry run over the command stream
// - `info`     — Header and stored-checksum inspection
// - `apply`    — Target reconstruction with checksum gates

pub mod apply;
pub mod error;
pub mod header;
pub mod info;
pub(crate) mod reader;
pub mod validate;
pub mod varint;

// Re-export key types for convenience.
pub use apply::apply_patch;
pub use error::PatchError;
pub use header::{BPS_MAGIC, PatchFooter, PatchHeader};
pub use info::{PatchInfo, patch_info};
pub use reader::{Command, CommandTag};
pub use validate::validate_patch;
