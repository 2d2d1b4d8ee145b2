//! Binary Wexpr encoding as length-prefixed chunks.
//!
//! Every chunk is a UVLQ64 payload size (see [`uvlq`]), a one-byte type tag,
//! and the payload itself:
//!
//! ```text
//! size: uvlq64 | tag: u8 | payload: byte*
//! ```
//!
//! Null chunks carry no payload. Value chunks hold UTF-8 text. Array and map
//! chunks nest child chunks inside their payload, a map alternating value
//! chunks for keys with arbitrary chunks for values. Binary data leads with a
//! compression method byte; only uncompressed data (`0x00`) is supported.
//! There is no magic number or trailing framing, and [`decode`] rejects
//! buffers with bytes left over after the root chunk.
//!
//! # Example
//!
//! ```
//! use wexpr::Expression;
//! use wexpr::chunk;
//!
//! let expr = Expression::Array(vec![Expression::value("1"), Expression::value("2")]);
//! let bytes = chunk::encode(&expr);
//! assert_eq!(chunk::decode(&bytes), Ok(expr));
//! ```

use thiserror::Error;

use crate::expr::Expression;

pub mod uvlq;

// Chunk type tags. 0x05 through 0xfe are unassigned and 0xff is reserved;
// all of them fail decoding with `UnknownChunkType`.
const TAG_NULL: u8 = 0x00;
const TAG_VALUE: u8 = 0x01;
const TAG_ARRAY: u8 = 0x02;
const TAG_MAP: u8 = 0x03;
const TAG_BINARY_DATA: u8 = 0x04;

/// Compression method byte for an uncompressed binary data payload.
const COMPRESSION_RAW: u8 = 0x00;

/// Containers beyond this depth fail with [`DecodeError::NestingTooDeep`].
const MAX_DEPTH: usize = 128;

/// Errors that can occur while decoding binary chunks.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The buffer ended before the chunk it declares.
    #[error("chunk is too small to be valid")]
    ChunkTooSmall,
    /// The chunk type tag is not one this decoder understands.
    #[error("unknown chunk type {0:#04x}")]
    UnknownChunkType(u8),
    /// A binary data chunk uses a compression method other than raw.
    #[error("unknown compression method {0:#04x}")]
    UnknownCompressionMethod(u8),
    /// A UVLQ64 size ran past the end of the buffer.
    #[error("unexpected end of buffer")]
    UnexpectedEndOfBuffer,
    /// A value chunk payload is not valid UTF-8.
    #[error("value chunk is not valid utf-8")]
    InvalidUtf8,
    /// A map payload pairs something other than a value chunk as a key.
    #[error("map key must be a value chunk")]
    MapKeyMustBeAValue,
    /// Bytes remain in the buffer after the root chunk.
    #[error("extra data after the root chunk")]
    ExtraDataAfterRoot,
    /// Containers nest deeper than the decoder allows.
    #[error("chunks nested too deeply")]
    NestingTooDeep,
}

/// Encodes an [`Expression`] as a binary chunk buffer.
///
/// The inverse of [`decode`]. Encoding cannot fail; the result always decodes
/// back to an equal expression.
pub fn encode(expr: &Expression) -> Vec<u8> {
    let mut buf = Vec::new();
    write_chunk(&mut buf, expr);
    buf
}

/// Decodes a binary chunk buffer into an [`Expression`].
///
/// The buffer must hold exactly one root chunk; trailing bytes fail with
/// [`DecodeError::ExtraDataAfterRoot`].
pub fn decode(buf: &[u8]) -> Result<Expression, DecodeError> {
    let (expr, rest) = read_chunk(buf, 0)?;
    if !rest.is_empty() {
        return Err(DecodeError::ExtraDataAfterRoot);
    }
    Ok(expr)
}

fn write_chunk(buf: &mut Vec<u8>, expr: &Expression) {
    match expr {
        Expression::Null => {
            uvlq::write(buf, 0);
            buf.push(TAG_NULL);
        }
        Expression::Value(text) => write_value_chunk(buf, text),
        Expression::Array(items) => {
            let mut payload = Vec::new();
            for item in items {
                write_chunk(&mut payload, item);
            }
            emit_chunk(buf, TAG_ARRAY, &payload);
        }
        Expression::Map(pairs) => {
            let mut payload = Vec::new();
            for (key, value) in pairs {
                write_value_chunk(&mut payload, key);
                write_chunk(&mut payload, value);
            }
            emit_chunk(buf, TAG_MAP, &payload);
        }
        Expression::BinaryData(bytes) => {
            uvlq::write(buf, bytes.len() as u64 + 1);
            buf.push(TAG_BINARY_DATA);
            buf.push(COMPRESSION_RAW);
            buf.extend_from_slice(bytes);
        }
    }
}

/// Map keys are encoded as value chunks, so this is shared between the
/// `Value` and `Map` arms of [`write_chunk`].
fn write_value_chunk(buf: &mut Vec<u8>, text: &str) {
    let bytes = text.as_bytes();
    uvlq::write(buf, bytes.len() as u64);
    buf.push(TAG_VALUE);
    buf.extend_from_slice(bytes);
}

fn emit_chunk(buf: &mut Vec<u8>, tag: u8, payload: &[u8]) {
    uvlq::write(buf, payload.len() as u64);
    buf.push(tag);
    buf.extend_from_slice(payload);
}

/// Reads one chunk from the front of `buf`, returning the decoded expression
/// and the unconsumed remainder.
fn read_chunk(buf: &[u8], depth: usize) -> Result<(Expression, &[u8]), DecodeError> {
    if depth >= MAX_DEPTH {
        return Err(DecodeError::NestingTooDeep);
    }
    // The smallest possible chunk is a one-byte size plus the tag.
    if buf.len() < 2 {
        return Err(DecodeError::ChunkTooSmall);
    }

    let (size, rest) = uvlq::read(buf)?;
    let (&tag, rest) = rest.split_first().ok_or(DecodeError::ChunkTooSmall)?;
    if (rest.len() as u64) < size {
        return Err(DecodeError::ChunkTooSmall);
    }
    let (payload, rest) = rest.split_at(size as usize);

    let expr = match tag {
        // A null chunk's payload, if it declares one, carries no meaning.
        TAG_NULL => Expression::Null,
        TAG_VALUE => {
            let text = std::str::from_utf8(payload).map_err(|_| DecodeError::InvalidUtf8)?;
            Expression::Value(text.to_owned())
        }
        TAG_ARRAY => {
            let mut items = Vec::new();
            let mut remaining = payload;
            while !remaining.is_empty() {
                let (item, after) = read_chunk(remaining, depth + 1)?;
                items.push(item);
                remaining = after;
            }
            Expression::Array(items)
        }
        TAG_MAP => {
            let mut map = Expression::Map(Vec::new());
            let mut remaining = payload;
            while !remaining.is_empty() {
                let (key, after_key) = read_chunk(remaining, depth + 1)?;
                let key = match key {
                    Expression::Value(text) => text,
                    _ => return Err(DecodeError::MapKeyMustBeAValue),
                };
                let (value, after_value) = read_chunk(after_key, depth + 1)?;
                map.map_insert(key, value);
                remaining = after_value;
            }
            map
        }
        TAG_BINARY_DATA => {
            let (&method, data) = payload.split_first().ok_or(DecodeError::ChunkTooSmall)?;
            if method != COMPRESSION_RAW {
                return Err(DecodeError::UnknownCompressionMethod(method));
            }
            Expression::BinaryData(data.to_vec())
        }
        _ => return Err(DecodeError::UnknownChunkType(tag)),
    };
    Ok((expr, rest))
}
