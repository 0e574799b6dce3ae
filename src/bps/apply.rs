// BPS patch application: rebuild the target from a source and a patch.
//
// Application is a second forward pass over an already-validated
// command stream. Validation proved every range against the declared
// sizes, so patch and output indexing is direct; reads from the
// supplied source stay guarded, since its real length is only seen
// here. The remaining gates are the source CRC-32 up front and the
// target CRC-32 at the end.

use log::debug;

use super::error::PatchError;
use super::header::{PatchFooter, PatchHeader};
use super::reader::{Command, PatchReader};
use super::validate::validate_patch;

/// Apply `patch` to `source`, returning the reconstructed target.
///
/// The patch is validated first; any structural failure propagates
/// unchanged. The source must hash to the patch's stored source
/// checksum, and the output must hash to the stored target checksum.
pub fn apply_patch(source: &[u8], patch: &[u8]) -> Result<Vec<u8>, PatchError> {
    validate_patch(patch)?;

    let footer = PatchFooter::parse(patch)?;
    let computed = crc32fast::hash(source);
    if computed != footer.source_crc32 {
        return Err(PatchError::IncompatibleSource {
            stored: footer.source_crc32,
            computed,
        });
    }

    let header = PatchHeader::parse(patch)?;
    let mut output: Vec<u8> = Vec::with_capacity(header.target_size as usize);
    let mut reader = PatchReader::new(patch, header.commands_start);
    let mut source_position: usize = 0;
    let mut outread_position: usize = 0;

    while reader.has_commands() {
        match reader.next_command()? {
            Command::SourceRead { length } => {
                // Source offset tracks the output write position.
                let at = output.len();
                let chunk = source
                    .get(at..at + length as usize)
                    .ok_or_else(|| source_underflow(at, length, source.len()))?;
                output.extend_from_slice(chunk);
            }
            Command::TargetRead { length } => {
                output.extend_from_slice(reader.take(length as usize));
            }
            Command::SourceCopy { length, offset } => {
                source_position = shift(source_position, offset);
                let end = source_position + length as usize;
                let chunk = source
                    .get(source_position..end)
                    .ok_or_else(|| source_underflow(source_position, length, source.len()))?;
                output.extend_from_slice(chunk);
                source_position = end;
            }
            Command::TargetCopy { length, offset } => {
                outread_position = shift(outread_position, offset);
                let length = length as usize;
                if outread_position + length <= output.len() {
                    // The whole run lies behind the write cursor.
                    output.extend_from_within(outread_position..outread_position + length);
                } else {
                    // Overlapping run: the write cursor catches up to the
                    // read cursor mid-command, and each newly written byte
                    // must be visible to the reads that follow it. This is
                    // the repeat-fill path, so copy one byte at a time.
                    for i in 0..length {
                        let byte = output[outread_position + i];
                        output.push(byte);
                    }
                }
                outread_position += length;
            }
        }
    }

    let computed = crc32fast::hash(&output);
    if computed != footer.target_crc32 {
        return Err(PatchError::Checksum {
            subject: "target",
            stored: footer.target_crc32,
            computed,
        });
    }

    debug!("patch applied: {} bytes written", output.len());
    Ok(output)
}

/// Move a cursor by a validated relative offset.
fn shift(position: usize, offset: i64) -> usize {
    if offset < 0 {
        position - offset.unsigned_abs() as usize
    } else {
        position + offset as usize
    }
}

/// Validation bounds source copies against the *declared* source size;
/// the supplied source can still be shorter when the header lies about
/// it. Any copy that would run off the real source fails here.
fn source_underflow(offset: usize, length: u64, source_len: usize) -> PatchError {
    PatchError::Format(format!(
        "source underflow: requested {length} bytes at offset {offset}, source is {source_len} bytes"
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
