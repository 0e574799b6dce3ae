// Patch inspection: header fields and stored checksums, without
// applying anything.

use super::error::PatchError;
use super::header::{PatchFooter, PatchHeader};
use super::validate::validate_patch;

/// Header fields and stored checksums of a valid patch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchInfo {
    /// Declared size of the source the patch expects.
    pub source_size: u64,
    /// Declared size of the target the patch produces.
    pub target_size: u64,
    /// The opaque metadata blob (commonly empty or textual).
    pub metadata: Vec<u8>,
    /// Stored CRC-32 of the expected source.
    pub source_checksum: u32,
    /// Stored CRC-32 of the produced target.
    pub target_checksum: u32,
}

/// Read the header fields and stored checksums of `patch`.
///
/// The patch is fully validated first, so the returned values are
/// trustworthy: an invalid patch yields the validation error rather
/// than half-parsed fields.
pub fn patch_info(patch: &[u8]) -> Result<PatchInfo, PatchError> {
    validate_patch(patch)?;
    let header = PatchHeader::parse(patch)?;
    let footer = PatchFooter::parse(patch)?;
    Ok(PatchInfo {
        source_size: header.source_size,
        target_size: header.target_size,
        metadata: header.metadata(patch).to_vec(),
        source_checksum: footer.source_crc32,
        target_checksum: footer.target_crc32,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
