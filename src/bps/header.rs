// BPS file header and checksum footer.
//
// Physical layout of a patch:
//   magic "BPS1" | source size | target size | metadata size | metadata
//   | command stream | source CRC-32 | target CRC-32 | patch CRC-32
// The three sizes are numbers (see `varint`); the three checksums are
// little-endian 32-bit values. The patch's own checksum covers every
// byte before it, including the other two stored checksums.

use log::debug;

use super::error::PatchError;
use super::reader::PatchReader;

/// Leading magic marker.
pub const BPS_MAGIC: [u8; 4] = *b"BPS1";

/// The trailing checksum region: three little-endian CRC-32 values.
pub const FOOTER_LEN: usize = 12;

/// 4 magic bytes + one byte for each of the three header numbers + footer.
pub const MIN_PATCH_LEN: usize = 19;

// ---------------------------------------------------------------------------
// Header
// ---------------------------------------------------------------------------

/// Parsed fixed header of a patch: declared sizes plus the location of
/// the metadata blob and of the first command byte.
#[derive(Debug, Clone)]
pub struct PatchHeader {
    /// Declared size of the source the patch was built against.
    pub source_size: u64,
    /// Declared size of the target the patch produces.
    pub target_size: u64,
    /// Byte offset of the metadata blob within the patch.
    pub metadata_offset: usize,
    /// Length of the metadata blob.
    pub metadata_len: usize,
    /// Byte offset of the first command.
    pub commands_start: usize,
}

impl PatchHeader {
    /// Parse the magic marker and the three header numbers, and locate
    /// the metadata blob. Shared by validation, inspection, and
    /// application, which each make their own pass over the header.
    pub fn parse(patch: &[u8]) -> Result<Self, PatchError> {
        if patch.len() < BPS_MAGIC.len() || patch[..BPS_MAGIC.len()] != BPS_MAGIC {
            return Err(PatchError::Format("invalid file format marker".into()));
        }
        if patch.len() < MIN_PATCH_LEN {
            return Err(PatchError::Truncated { len: patch.len() });
        }

        let mut reader = PatchReader::new(patch, BPS_MAGIC.len());
        let mut number = |what: &str| {
            reader
                .read_number()
                .map_err(|e| PatchError::Format(format!("failed to decode {what}: {e}")))
        };
        let source_size = number("source size")?;
        let target_size = number("target size")?;
        let metadata_size = number("metadata size")?;
        debug!("source size: {source_size:#x}");
        debug!("target size: {target_size:#x}");
        debug!("metadata size: {metadata_size:#x}");

        let metadata_offset = reader.pos;
        let limit = patch.len() - FOOTER_LEN;
        // The metadata blob may not overlap the checksum footer.
        let commands_start = (metadata_offset as u64)
            .checked_add(metadata_size)
            .filter(|&end| end <= limit as u64)
            .ok_or_else(|| PatchError::Format("metadata size too large".into()))?;

        Ok(Self {
            source_size,
            target_size,
            metadata_offset,
            metadata_len: metadata_size as usize,
            commands_start: commands_start as usize,
        })
    }

    /// The opaque metadata bytes within `patch`.
    pub fn metadata<'a>(&self, patch: &'a [u8]) -> &'a [u8] {
        &patch[self.metadata_offset..self.metadata_offset + self.metadata_len]
    }
}

// ---------------------------------------------------------------------------
// Footer
// ---------------------------------------------------------------------------

/// The three stored checksums from the trailing 12 bytes, in their
/// physical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatchFooter {
    /// CRC-32 of the source the patch expects.
    pub source_crc32: u32,
    /// CRC-32 of the target the patch produces.
    pub target_crc32: u32,
    /// CRC-32 of the patch itself, over every byte preceding this field.
    pub patch_crc32: u32,
}

impl PatchFooter {
    pub fn parse(patch: &[u8]) -> Result<Self, PatchError> {
        if patch.len() < MIN_PATCH_LEN {
            return Err(PatchError::Truncated { len: patch.len() });
        }
        let base = patch.len() - FOOTER_LEN;
        Ok(Self {
            source_crc32: read_u32_le(patch, base),
            target_crc32: read_u32_le(patch, base + 4),
            patch_crc32: read_u32_le(patch, base + 8),
        })
    }
}

pub(crate) fn read_u32_le(buf: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
