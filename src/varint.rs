//! Wire-level primitives: the varint, fixed-width, and byte codecs.
//!
//! Everything in this module operates either on raw byte slices (the
//! `decode_*` functions, which never read past the end of the slice) or on
//! the `Bytes`/`BytesMut` buffer types used throughout the crate (the
//! `put_*`/`get_*` functions). The higher-level `Encoder`/`Decoder` impls in
//! [`crate::core`] are all built from these.
//!
//! Varints store 7 value bits per byte, least-significant group first, with
//! the high bit of each byte set on every byte except the last. Encoding is
//! always minimal: no value is ever padded with trailing zero groups.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::{DecodeError, Result};

/// Longest possible varint encoding of a 32-bit value.
pub const MAX_VARINT32_LEN: usize = 5;
/// Longest possible varint encoding of a 64-bit value.
pub const MAX_VARINT64_LEN: usize = 10;

/// Returns the exact number of bytes the varint encoding of `v` occupies.
///
/// Always between 1 and [`MAX_VARINT64_LEN`].
pub fn varint_len(v: u64) -> usize {
    let mut len = 1;
    let mut v = v >> 7;
    while v != 0 {
        len += 1;
        v >>= 7;
    }
    len
}

/// Appends the varint encoding of `v` to `dst`.
pub fn put_varint32(dst: &mut BytesMut, mut v: u32) {
    while v >= 0x80 {
        dst.put_u8((v as u8 & 0x7f) | 0x80);
        v >>= 7;
    }
    dst.put_u8(v as u8);
}

/// Appends the varint encoding of `v` to `dst`.
pub fn put_varint64(dst: &mut BytesMut, mut v: u64) {
    while v >= 0x80 {
        dst.put_u8((v as u8 & 0x7f) | 0x80);
        v >>= 7;
    }
    dst.put_u8(v as u8);
}

/// Decodes a 32-bit varint from the front of `data`.
///
/// Returns the value and the number of bytes consumed, or `None` if the
/// encoding does not terminate within `data` or within
/// [`MAX_VARINT32_LEN`] bytes. Never reads past the end of the slice.
///
/// Dispatches between two implementations of the same algorithm: a single
/// terminal byte is decoded inline (the common case for small values), an
/// unrolled path handles longer encodings when the full maximum length is
/// available, and a bounded loop covers short buffers. All paths decode
/// identical values wherever more than one applies.
pub fn decode_varint32(data: &[u8]) -> Option<(u32, usize)> {
    match data.first() {
        Some(&first) if first < 0x80 => Some((first as u32, 1)),
        Some(_) if data.len() >= MAX_VARINT32_LEN => decode_varint32_unrolled(data),
        _ => decode_varint32_fallback(data),
    }
}

// Caller guarantees data.len() >= MAX_VARINT32_LEN.
fn decode_varint32_unrolled(data: &[u8]) -> Option<(u32, usize)> {
    let mut result = (data[0] & 0x7f) as u32;
    if data[0] < 0x80 {
        return Some((result, 1));
    }
    result |= ((data[1] & 0x7f) as u32) << 7;
    if data[1] < 0x80 {
        return Some((result, 2));
    }
    result |= ((data[2] & 0x7f) as u32) << 14;
    if data[2] < 0x80 {
        return Some((result, 3));
    }
    result |= ((data[3] & 0x7f) as u32) << 21;
    if data[3] < 0x80 {
        return Some((result, 4));
    }
    // Groups past bit 31 are discarded; minimality is an encoder guarantee.
    result |= ((data[4] & 0x7f) as u32) << 28;
    if data[4] < 0x80 {
        return Some((result, 5));
    }
    None
}

/// Plain byte-at-a-time decode, bounded by the slice end.
///
/// Exposed so tests can assert it agrees with [`decode_varint32`] on every
/// input where both apply.
pub fn decode_varint32_fallback(data: &[u8]) -> Option<(u32, usize)> {
    let mut result: u32 = 0;
    for (i, &byte) in data.iter().enumerate().take(MAX_VARINT32_LEN) {
        result |= ((byte & 0x7f) as u32) << (7 * i);
        if byte < 0x80 {
            return Some((result, i + 1));
        }
    }
    None
}

/// Decodes a 64-bit varint from the front of `data`.
///
/// Same contract as [`decode_varint32`], with a maximum encoded length of
/// [`MAX_VARINT64_LEN`] bytes.
pub fn decode_varint64(data: &[u8]) -> Option<(u64, usize)> {
    match data.first() {
        Some(&first) if first < 0x80 => Some((first as u64, 1)),
        Some(_) if data.len() >= MAX_VARINT64_LEN => decode_varint64_unrolled(data),
        _ => decode_varint64_fallback(data),
    }
}

// Caller guarantees data.len() >= MAX_VARINT64_LEN.
fn decode_varint64_unrolled(data: &[u8]) -> Option<(u64, usize)> {
    let mut result = (data[0] & 0x7f) as u64;
    if data[0] < 0x80 {
        return Some((result, 1));
    }
    result |= ((data[1] & 0x7f) as u64) << 7;
    if data[1] < 0x80 {
        return Some((result, 2));
    }
    result |= ((data[2] & 0x7f) as u64) << 14;
    if data[2] < 0x80 {
        return Some((result, 3));
    }
    result |= ((data[3] & 0x7f) as u64) << 21;
    if data[3] < 0x80 {
        return Some((result, 4));
    }
    result |= ((data[4] & 0x7f) as u64) << 28;
    if data[4] < 0x80 {
        return Some((result, 5));
    }
    result |= ((data[5] & 0x7f) as u64) << 35;
    if data[5] < 0x80 {
        return Some((result, 6));
    }
    result |= ((data[6] & 0x7f) as u64) << 42;
    if data[6] < 0x80 {
        return Some((result, 7));
    }
    result |= ((data[7] & 0x7f) as u64) << 49;
    if data[7] < 0x80 {
        return Some((result, 8));
    }
    result |= ((data[8] & 0x7f) as u64) << 56;
    if data[8] < 0x80 {
        return Some((result, 9));
    }
    result |= ((data[9] & 0x7f) as u64) << 63;
    if data[9] < 0x80 {
        return Some((result, 10));
    }
    None
}

/// Bounded-loop counterpart of [`decode_varint64`]; see
/// [`decode_varint32_fallback`].
pub fn decode_varint64_fallback(data: &[u8]) -> Option<(u64, usize)> {
    let mut result: u64 = 0;
    for (i, &byte) in data.iter().enumerate().take(MAX_VARINT64_LEN) {
        result |= ((byte & 0x7f) as u64) << (7 * i);
        if byte < 0x80 {
            return Some((result, i + 1));
        }
    }
    None
}

/// Reads a 32-bit varint from the cursor, advancing it by the bytes consumed.
///
/// On failure the cursor is left untouched, but callers must still treat the
/// whole decode attempt as unrecoverable.
pub fn get_varint32(input: &mut Bytes) -> Result<u32> {
    match decode_varint32(input.chunk()) {
        Some((v, consumed)) => {
            input.advance(consumed);
            Ok(v)
        }
        None if input.remaining() >= MAX_VARINT32_LEN => Err(DecodeError::MalformedVarint),
        None => Err(DecodeError::InsufficientData),
    }
}

/// Reads a 64-bit varint from the cursor, advancing it by the bytes consumed.
pub fn get_varint64(input: &mut Bytes) -> Result<u64> {
    match decode_varint64(input.chunk()) {
        Some((v, consumed)) => {
            input.advance(consumed);
            Ok(v)
        }
        None if input.remaining() >= MAX_VARINT64_LEN => Err(DecodeError::MalformedVarint),
        None => Err(DecodeError::InsufficientData),
    }
}

/// Appends `v` as 4 little-endian bytes.
pub fn put_fixed32(dst: &mut BytesMut, v: u32) {
    dst.put_u32_le(v);
}

/// Appends `v` as 8 little-endian bytes.
pub fn put_fixed64(dst: &mut BytesMut, v: u64) {
    dst.put_u64_le(v);
}

/// Reads a 32-bit little-endian value without advancing the cursor.
///
/// The caller advances by the value width after a successful read; the
/// float decoders in [`crate::core`] rely on this.
pub fn get_fixed32(input: &Bytes) -> Result<u32> {
    let data = input.chunk();
    if data.len() < 4 {
        return Err(DecodeError::InsufficientData);
    }
    let mut raw = [0u8; 4];
    raw.copy_from_slice(&data[..4]);
    Ok(u32::from_le_bytes(raw))
}

/// Reads a 64-bit little-endian value without advancing the cursor.
pub fn get_fixed64(input: &Bytes) -> Result<u64> {
    let data = input.chunk();
    if data.len() < 8 {
        return Err(DecodeError::InsufficientData);
    }
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&data[..8]);
    Ok(u64::from_le_bytes(raw))
}

/// Appends one raw byte.
pub fn put_byte(dst: &mut BytesMut, v: u8) {
    dst.put_u8(v);
}

/// Reads one raw byte, advancing the cursor by one.
pub fn get_byte(input: &mut Bytes) -> Result<u8> {
    if input.remaining() == 0 {
        return Err(DecodeError::InsufficientData);
    }
    Ok(input.get_u8())
}
