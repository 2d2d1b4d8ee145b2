//! UVLQ64 variable-length integers, used for chunk length prefixes.
//!
//! A value is split into 7-bit groups, most significant group first, and
//! every byte except the last carries a set high bit. Unlike LEB128 the
//! group order is big-endian: decoders accumulate with shift-left-7 as each
//! byte arrives. The encoding is minimal, so a value has exactly one byte
//! image and `byte_size` predicts its length.

use super::DecodeError;

/// Number of bytes `write` will produce for `value` (1 through 10).
pub fn byte_size(value: u64) -> usize {
    let mut size = 1;
    let mut remaining = value >> 7;
    while remaining != 0 {
        size += 1;
        remaining >>= 7;
    }
    size
}

/// Appends the UVLQ64 encoding of `value` to `buf`.
pub fn write(buf: &mut Vec<u8>, value: u64) {
    let size = byte_size(value);
    for group in (0..size).rev() {
        let mut byte = ((value >> (group * 7)) & 0x7f) as u8;
        if group != 0 {
            byte |= 0x80;
        }
        buf.push(byte);
    }
}

/// Reads one UVLQ64 value from the front of `buf`.
///
/// Returns the value and the unconsumed remainder. Fails with
/// [`DecodeError::UnexpectedEndOfBuffer`] when the buffer runs out before a
/// byte with a clear high bit terminates the sequence.
pub fn read(buf: &[u8]) -> Result<(u64, &[u8]), DecodeError> {
    let mut value = 0u64;
    for (i, &byte) in buf.iter().enumerate() {
        value = (value << 7) | u64::from(byte & 0x7f);
        if byte & 0x80 == 0 {
            return Ok((value, &buf[i + 1..]));
        }
    }
    Err(DecodeError::UnexpectedEndOfBuffer)
}
