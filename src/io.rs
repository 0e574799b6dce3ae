// File-level helpers wrapping the in-memory BPS core.
//
// Patches and sources are read fully into memory: a BPS patch must be
// random-access for its checksum footer anyway, and sources are
// typically ROM-sized. The core itself stays filesystem-free.

use std::io;
use std::path::Path;

use thiserror::Error;

use crate::bps::{self, PatchError, PatchInfo};

// ---------------------------------------------------------------------------
// Stats
// ---------------------------------------------------------------------------

/// Statistics returned by `apply_file()`.
#[derive(Debug, Clone)]
pub struct ApplyStats {
    /// Source file size in bytes.
    pub source_size: u64,
    /// Patch file size in bytes.
    pub patch_size: u64,
    /// Reconstructed output size in bytes.
    pub output_size: u64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for file-level operations.
#[derive(Debug, Error)]
pub enum IoError {
    /// I/O error (file open, read, write).
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// Patch validation or application error.
    #[error(transparent)]
    Patch(#[from] PatchError),
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Validate the BPS patch at `patch_path`.
pub fn validate_file(patch_path: &Path) -> Result<(), IoError> {
    let patch = std::fs::read(patch_path)?;
    bps::validate_patch(&patch)?;
    Ok(())
}

/// Read header fields and stored checksums of the patch at `patch_path`.
pub fn info_file(patch_path: &Path) -> Result<PatchInfo, IoError> {
    let patch = std::fs::read(patch_path)?;
    Ok(bps::patch_info(&patch)?)
}

/// Apply the patch at `patch_path` to the file at `source_path`,
/// writing the reconstructed target to `output_path`.
///
/// The output file is only written after both checksum gates pass; a
/// failing application leaves no partial output behind.
pub fn apply_file(
    source_path: &Path,
    patch_path: &Path,
    output_path: &Path,
) -> Result<ApplyStats, IoError> {
    let source = std::fs::read(source_path)?;
    let patch = std::fs::read(patch_path)?;

    let output = bps::apply_patch(&source, &patch)?;
    std::fs::write(output_path, &output)?;

    Ok(ApplyStats {
        source_size: source.len() as u64,
        patch_size: patch.len() as u64,
        output_size: output.len() as u64,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
