//! `Encoder`/`Decoder` implementations for primitives and containers.
//!
//! This is the closed dispatch table of the format: every supported type
//! maps to exactly one wire encoding, resolved at compile time. Integers go
//! through the varint codec (8-bit types are raw bytes), floats through the
//! fixed-width codec by bit pattern, and strings/sequences/mappings are
//! varint32-count-prefixed wrappers that recurse into their element types.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::varint::{
    get_byte, get_fixed32, get_fixed64, get_varint32, get_varint64, put_byte, put_fixed32,
    put_fixed64, put_varint32, put_varint64,
};
use crate::{DecodeError, Decoder, Encoder, Result};

/// Appends a container length as a varint32. Counts are 32-bit on the wire.
pub(crate) fn put_length(writer: &mut BytesMut, len: usize) {
    put_varint32(writer, len as u32);
}

/// Reads a varint32 container length.
pub(crate) fn get_length(reader: &mut Bytes) -> Result<usize> {
    Ok(get_varint32(reader)? as usize)
}

// --- bool ---
/// Encodes a `bool` as one raw byte, 0 for `false` and 1 for `true`.
impl Encoder for bool {
    fn encode(&self, writer: &mut BytesMut) {
        put_byte(writer, *self as u8);
    }
}
/// Decodes a `bool` from one raw byte; any nonzero value reads as `true`.
impl Decoder for bool {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(get_byte(reader)? != 0)
    }
}

// --- 8-bit integers (byte codec) ---
impl Encoder for u8 {
    fn encode(&self, writer: &mut BytesMut) {
        put_byte(writer, *self);
    }
}
impl Decoder for u8 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        get_byte(reader)
    }
}
/// `i8` travels as its raw bit pattern, one byte.
impl Encoder for i8 {
    fn encode(&self, writer: &mut BytesMut) {
        put_byte(writer, *self as u8);
    }
}
impl Decoder for i8 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(get_byte(reader)? as i8)
    }
}

// --- 16-bit integers ---
/// Encodes a `u16` as a varint32, zero-extended.
impl Encoder for u16 {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint32(writer, *self as u32);
    }
}
/// Decodes a `u16` by truncating the varint32 value to 16 bits.
impl Decoder for u16 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(get_varint32(reader)? as u16)
    }
}
/// Encodes an `i16` as a varint32 of its sign-extended bit pattern, so
/// negative values occupy the full five bytes. No zig-zag is applied.
impl Encoder for i16 {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint32(writer, *self as u32);
    }
}
/// Decodes an `i16` by truncating the varint32 value to 16 bits of bit
/// pattern. Values outside the `i16` range are not rejected.
impl Decoder for i16 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(get_varint32(reader)? as i16)
    }
}

// --- 32-bit integers ---
impl Encoder for u32 {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint32(writer, *self);
    }
}
impl Decoder for u32 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        get_varint32(reader)
    }
}
/// `i32` travels as the varint32 of its bit pattern.
impl Encoder for i32 {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint32(writer, *self as u32);
    }
}
impl Decoder for i32 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(get_varint32(reader)? as i32)
    }
}

// --- 64-bit integers ---
impl Encoder for u64 {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint64(writer, *self);
    }
}
impl Decoder for u64 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        get_varint64(reader)
    }
}
/// `i64` travels as the varint64 of its bit pattern.
impl Encoder for i64 {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint64(writer, *self as u64);
    }
}
impl Decoder for i64 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(get_varint64(reader)? as i64)
    }
}

// --- Platform-width integers ---
/// `usize` always travels as a varint64 so 32- and 64-bit hosts agree on
/// the wire width.
impl Encoder for usize {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint64(writer, *self as u64);
    }
}
impl Decoder for usize {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(get_varint64(reader)? as usize)
    }
}
impl Encoder for isize {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint64(writer, *self as i64 as u64);
    }
}
impl Decoder for isize {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(get_varint64(reader)? as i64 as isize)
    }
}

// --- char ---
/// Encodes a `char` as the varint32 of its Unicode scalar value.
impl Encoder for char {
    fn encode(&self, writer: &mut BytesMut) {
        put_varint32(writer, *self as u32);
    }
}
/// Decodes a `char`, rejecting values that are not valid scalar values.
impl Decoder for char {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let v = get_varint32(reader)?;
        char::from_u32(v)
            .ok_or_else(|| DecodeError::Decode(format!("Invalid char scalar value: {}", v)))
    }
}

// --- f32/f64 ---
/// Encodes an `f32` as its IEEE 754 bit pattern, 4 little-endian bytes.
/// The fixed-width codec is the only bit-exact path in the format.
impl Encoder for f32 {
    fn encode(&self, writer: &mut BytesMut) {
        put_fixed32(writer, self.to_bits());
    }
}
impl Decoder for f32 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let bits = get_fixed32(reader)?;
        // get_fixed32 peeks; the value width is consumed here.
        reader.advance(4);
        Ok(f32::from_bits(bits))
    }
}
/// Encodes an `f64` as its IEEE 754 bit pattern, 8 little-endian bytes.
impl Encoder for f64 {
    fn encode(&self, writer: &mut BytesMut) {
        put_fixed64(writer, self.to_bits());
    }
}
impl Decoder for f64 {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let bits = get_fixed64(reader)?;
        reader.advance(8);
        Ok(f64::from_bits(bits))
    }
}

// --- Strings ---
/// Encodes string data as a varint32 byte length followed by the UTF-8
/// bytes, with no terminator.
impl Encoder for str {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        writer.put_slice(self.as_bytes());
    }
}
impl Encoder for String {
    fn encode(&self, writer: &mut BytesMut) {
        self.as_str().encode(writer);
    }
}
/// Decodes a `String`, validating UTF-8.
impl Decoder for String {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        if reader.remaining() < len {
            return Err(DecodeError::InsufficientData);
        }
        let mut bytes = vec![0u8; len];
        if len > 0 {
            reader.copy_to_slice(&mut bytes);
        }
        String::from_utf8(bytes).map_err(|e| DecodeError::Decode(e.to_string()))
    }
}

// --- Bytes ---
/// Raw byte payloads use the same layout as strings: varint32 length plus
/// the bytes. `Vec<u8>` through the generic sequence path produces the
/// identical encoding, this impl just copies in bulk.
impl Encoder for Bytes {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        writer.put_slice(self);
    }
}
impl Decoder for Bytes {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        if reader.remaining() < len {
            return Err(DecodeError::InsufficientData);
        }
        Ok(reader.split_to(len))
    }
}

// --- Vec<T> ---
/// Encodes a `Vec<T>` as a varint32 count followed by each element.
impl<T: Encoder> Encoder for Vec<T> {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        for item in self {
            item.encode(writer);
        }
    }
}
impl<T: Decoder> Decoder for Vec<T> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        // A declared count can't exceed one element per remaining byte.
        let mut vec = Vec::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            vec.push(T::decode(reader)?);
        }
        Ok(vec)
    }
}

// --- Arrays ---
/// Fixed-size arrays use the sequence layout; the decoded count must equal
/// the array length.
impl<T: Encoder, const N: usize> Encoder for [T; N] {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, N);
        for item in self {
            item.encode(writer);
        }
    }
}
impl<T: Decoder, const N: usize> Decoder for [T; N] {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        if len != N {
            return Err(DecodeError::Decode(format!(
                "Array length mismatch: expected {}, got {}",
                N, len
            )));
        }
        let mut items = Vec::with_capacity(N);
        for _ in 0..N {
            items.push(T::decode(reader)?);
        }
        items
            .try_into()
            .map_err(|_| DecodeError::Decode("Failed to convert Vec to array".to_string()))
    }
}

// --- Sets ---
/// Sets use the sequence layout in the set's iteration order. `HashSet`
/// order is not stable across runs; use `BTreeSet` for reproducible bytes.
impl<T: Encoder> Encoder for HashSet<T> {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        for item in self {
            item.encode(writer);
        }
    }
}
impl<T: Decoder + Eq + std::hash::Hash> Decoder for HashSet<T> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        let mut set = HashSet::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            set.insert(T::decode(reader)?);
        }
        Ok(set)
    }
}
impl<T: Encoder> Encoder for BTreeSet<T> {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        for item in self {
            item.encode(writer);
        }
    }
}
impl<T: Decoder + Ord> Decoder for BTreeSet<T> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        let mut set = BTreeSet::new();
        for _ in 0..len {
            set.insert(T::decode(reader)?);
        }
        Ok(set)
    }
}

// --- Maps ---
/// Encodes a map as a varint32 count followed by each key then its value,
/// in the map's iteration order at encode time. No canonical pair order is
/// imposed or reproduced on decode: `HashMap` bytes can differ between runs
/// for equal maps. `BTreeMap` (sorted keys) or the `indexmap` feature
/// (insertion order) give deterministic output.
impl<K: Encoder, V: Encoder> Encoder for HashMap<K, V> {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        for (k, v) in self {
            k.encode(writer);
            v.encode(writer);
        }
    }
}
impl<K: Decoder + Eq + std::hash::Hash, V: Decoder> Decoder for HashMap<K, V> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        let mut map = HashMap::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            let k = K::decode(reader)?;
            let v = V::decode(reader)?;
            map.insert(k, v);
        }
        Ok(map)
    }
}
impl<K: Encoder, V: Encoder> Encoder for BTreeMap<K, V> {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        for (k, v) in self {
            k.encode(writer);
            v.encode(writer);
        }
    }
}
impl<K: Decoder + Ord, V: Decoder> Decoder for BTreeMap<K, V> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        let mut map = BTreeMap::new();
        for _ in 0..len {
            let k = K::decode(reader)?;
            let v = V::decode(reader)?;
            map.insert(k, v);
        }
        Ok(map)
    }
}

// --- Option ---
/// Encodes an `Option<T>` as a presence byte (0 or 1) followed by the value
/// when present.
impl<T: Encoder> Encoder for Option<T> {
    fn encode(&self, writer: &mut BytesMut) {
        match self {
            Some(value) => {
                put_byte(writer, 1);
                value.encode(writer);
            }
            None => put_byte(writer, 0),
        }
    }
}
impl<T: Decoder> Decoder for Option<T> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        match get_byte(reader)? {
            0 => Ok(None),
            1 => Ok(Some(T::decode(reader)?)),
            other => Err(DecodeError::Decode(format!(
                "Expected Option flag (0 or 1), got {}",
                other
            ))),
        }
    }
}

// --- Tuples ---
/// Tuples encode as their elements in order with no prefix, like a
/// composite with no ancestor.
macro_rules! impl_tuple {
    () => {
        impl Encoder for () {
            fn encode(&self, _writer: &mut BytesMut) {}
        }
        impl Decoder for () {
            fn decode(_reader: &mut Bytes) -> Result<Self> {
                Ok(())
            }
        }
    };
    ($($T:ident : $idx:tt),+) => {
        impl<$($T: Encoder),+> Encoder for ($($T,)+) {
            fn encode(&self, writer: &mut BytesMut) {
                $(
                    self.$idx.encode(writer);
                )+
            }
        }
        impl<$($T: Decoder),+> Decoder for ($($T,)+) {
            fn decode(reader: &mut Bytes) -> Result<Self> {
                Ok(($(
                    $T::decode(reader)?,
                )+))
            }
        }
    };
}

impl_tuple!();
impl_tuple!(T0: 0);
impl_tuple!(T0: 0, T1: 1);
impl_tuple!(T0: 0, T1: 1, T2: 2);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7, T8: 8);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7, T8: 8, T9: 9);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7, T8: 8, T9: 9, T10: 10);
impl_tuple!(T0: 0, T1: 1, T2: 2, T3: 3, T4: 4, T5: 5, T6: 6, T7: 7, T8: 8, T9: 9, T10: 10, T11: 11);

// --- References and smart pointers ---
/// References delegate to the referenced value.
impl<T: Encoder + ?Sized> Encoder for &T {
    fn encode(&self, writer: &mut BytesMut) {
        (*self).encode(writer);
    }
}
impl<T: Encoder> Encoder for Box<T> {
    fn encode(&self, writer: &mut BytesMut) {
        (**self).encode(writer);
    }
}
impl<T: Decoder> Decoder for Box<T> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(Box::new(T::decode(reader)?))
    }
}
impl<T: Encoder> Encoder for Arc<T> {
    fn encode(&self, writer: &mut BytesMut) {
        (**self).encode(writer);
    }
}
impl<T: Decoder> Decoder for Arc<T> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        Ok(Arc::new(T::decode(reader)?))
    }
}
