// BPS variable-length integer encoding.
//
// Bijective base-128, least-significant group first. Each byte carries
// 7 data bits; the high bit is SET on the final byte of a number (the
// opposite of the usual continuation convention). After every
// non-terminal byte the accumulator is biased by the next shift step,
// so every value has exactly one encoding.

use std::io::{self, Write};

/// Maximum encoded length for a 64-bit value.
const MAX_VARINT_LEN: usize = 10;

// ---------------------------------------------------------------------------
// Encoding
// ---------------------------------------------------------------------------

/// Encode a `u64` as a BPS variable-length integer into `buf`.
/// Returns the number of bytes written (1..=10).
#[inline]
pub fn encode_u64(mut num: u64, buf: &mut [u8; MAX_VARINT_LEN]) -> usize {
    let mut i = 0;
    loop {
        let x = (num & 0x7F) as u8;
        num >>= 7;
        if num == 0 {
            buf[i] = 0x80 | x;
            return i + 1;
        }
        buf[i] = x;
        i += 1;
        num -= 1; // bias: shorter encodings never re-appear at longer lengths
    }
}

/// Encode a `u64` and write it to a `Write` sink.
pub fn write_u64<W: Write>(w: &mut W, num: u64) -> io::Result<()> {
    let mut buf = [0u8; MAX_VARINT_LEN];
    let len = encode_u64(num, &mut buf);
    w.write_all(&buf[..len])
}

/// Encode a `usize` and write it to a `Write` sink.
pub fn write_usize<W: Write>(w: &mut W, num: usize) -> io::Result<()> {
    write_u64(w, num as u64)
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

/// Decode a `u64` from the start of a byte slice.
/// Returns `(value, bytes_consumed)` or an error.
///
/// The slice is expected to be pre-bounded by the caller: running out of
/// bytes before the terminal (high-bit-set) byte is an underflow.
pub fn decode_u64(data: &[u8]) -> Result<(u64, usize), VarintError> {
    let mut value: u64 = 0;
    let mut shift: u64 = 1;
    for (i, &byte) in data.iter().enumerate() {
        let digit = u64::from(byte & 0x7F);
        value = digit
            .checked_mul(shift)
            .and_then(|d| value.checked_add(d))
            .ok_or(VarintError::Overflow)?;
        if byte & 0x80 != 0 {
            return Ok((value, i + 1));
        }
        shift = shift.checked_mul(128).ok_or(VarintError::Overflow)?;
        value = value.checked_add(shift).ok_or(VarintError::Overflow)?;
    }
    Err(VarintError::Underflow)
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarintError {
    /// The input ended (or hit the caller's bound) before the terminal byte.
    Underflow,
    /// Value would overflow a 64-bit integer.
    Overflow,
}

impl std::fmt::Display for VarintError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VarintError::Underflow => write!(f, "number runs past its bound"),
            VarintError::Overflow => write!(f, "number overflows 64 bits"),
        }
    }
}

impl std::error::Error for VarintError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
