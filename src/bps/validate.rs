// BPS patch validation: a full structural pass without producing output.
//
// The pass mirrors application exactly: it decodes every command and
// tracks the three cursors (source, target, outread), failing on the
// first violated bound. Check order is part of the format contract:
// magic marker, minimum length, patch self-checksum, header numbers,
// metadata bound, command loop, final size equality. Every read is
// preceded by a bounds check; arbitrary input can never index outside
// the patch slice.

use log::debug;

use super::error::PatchError;
use super::header::{BPS_MAGIC, FOOTER_LEN, MIN_PATCH_LEN, PatchHeader, read_u32_le};
use super::reader::{Command, PatchReader};

/// Verify that `patch` is a structurally valid BPS patch.
///
/// Succeeds only if every command keeps its cursors within the declared
/// sizes and the command stream produces exactly the declared target
/// size. The source itself is not consulted; compatibility with a
/// concrete source is checked at application time.
pub fn validate_patch(patch: &[u8]) -> Result<(), PatchError> {
    if patch.len() < BPS_MAGIC.len() || patch[..BPS_MAGIC.len()] != BPS_MAGIC {
        return Err(PatchError::Format("invalid file format marker".into()));
    }
    if patch.len() < MIN_PATCH_LEN {
        return Err(PatchError::Truncated { len: patch.len() });
    }

    // The patch's own checksum covers everything before its last 4 bytes,
    // including the two other stored checksums.
    let self_crc_at = patch.len() - 4;
    let computed = crc32fast::hash(&patch[..self_crc_at]);
    let stored = read_u32_le(patch, self_crc_at);
    if computed != stored {
        return Err(PatchError::Checksum {
            subject: "patch",
            stored,
            computed,
        });
    }

    let header = PatchHeader::parse(patch)?;

    let mut reader = PatchReader::new(patch, header.commands_start);
    let mut source_position: u64 = 0;
    let mut target_position: u64 = 0;
    let mut outread_position: u64 = 0;

    while reader.has_commands() {
        let offset = reader.pos;
        let command = reader.next_command()?;

        // Cursor values at command entry, as reported on failure.
        let tag = command.tag();
        let length = command.length();
        let fail = move |detail: &'static str| PatchError::Bounds {
            detail,
            tag,
            offset,
            length,
            source_position,
            target_position,
            outread_position,
        };

        match command {
            Command::SourceRead { length } => {
                // Source and target advance in lockstep from offset zero.
                target_position = target_position
                    .checked_add(length)
                    .ok_or_else(|| fail("attempted to read beyond end of source"))?;
                if target_position > header.source_size {
                    return Err(fail("attempted to read beyond end of source"));
                }
                if target_position > header.target_size {
                    return Err(fail("attempted to write beyond end of target"));
                }
            }
            Command::TargetRead { length } => {
                target_position = target_position
                    .checked_add(length)
                    .ok_or_else(|| fail("attempted to write beyond end of target"))?;
                if target_position > header.target_size {
                    return Err(fail("attempted to write beyond end of target"));
                }
                // The literal payload follows the command; it may not run
                // into the checksum footer.
                let after = (reader.pos as u64)
                    .checked_add(length)
                    .filter(|&p| p <= reader.limit as u64)
                    .ok_or_else(|| fail("TargetRead length too large"))?;
                reader.pos = after as usize;
            }
            Command::SourceCopy { length, offset: rel } => {
                if rel < 0 && rel.unsigned_abs() > source_position {
                    return Err(fail("attempted to read beyond beginning of source"));
                }
                let anchored = if rel < 0 {
                    source_position - rel.unsigned_abs()
                } else {
                    source_position
                        .checked_add(rel as u64)
                        .ok_or_else(|| fail("attempted to read beyond end of source"))?
                };
                source_position = anchored
                    .checked_add(length)
                    .ok_or_else(|| fail("attempted to read beyond end of source"))?;
                if source_position > header.source_size {
                    return Err(fail("attempted to read beyond end of source"));
                }
                target_position = target_position
                    .checked_add(length)
                    .ok_or_else(|| fail("attempted to write beyond end of target"))?;
                if target_position > header.target_size {
                    return Err(fail("attempted to write beyond end of target"));
                }
            }
            Command::TargetCopy { length, offset: rel } => {
                if rel < 0 && rel.unsigned_abs() > outread_position {
                    return Err(fail("attempted to read beyond beginning of target"));
                }
                outread_position = if rel < 0 {
                    outread_position - rel.unsigned_abs()
                } else {
                    outread_position
                        .checked_add(rel as u64)
                        .ok_or_else(|| fail("attempted to read beyond end of target"))?
                };
                // The read cursor must start strictly behind the write
                // cursor; it may overtake it while the command runs, which
                // is what makes repeat-fill runs work.
                if outread_position >= target_position {
                    return Err(fail("attempted to read beyond end of target"));
                }
                target_position = target_position
                    .checked_add(length)
                    .ok_or_else(|| fail("attempted to write beyond end of target"))?;
                if target_position > header.target_size {
                    return Err(fail("attempted to write beyond end of target"));
                }
                outread_position += length;
            }
        }
    }

    if target_position != header.target_size {
        return Err(PatchError::SizeMismatch {
            expected: header.target_size,
            actual: target_position,
        });
    }

    debug!(
        "patch validated: {} command bytes, target size {:#x}",
        patch.len() - FOOTER_LEN - header.commands_start,
        header.target_size
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
