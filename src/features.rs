//! Feature-gated implementations for optional external crates.

#![allow(unused_imports)]

#[cfg(feature = "indexmap")]
use indexmap::{IndexMap, IndexSet};

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::core::{get_length, put_length};
use crate::{Decoder, Encoder, Result};

// --- IndexSet ---
/// Sequence layout in insertion order, so re-encoding an unchanged set is
/// byte-stable.
#[cfg(feature = "indexmap")]
impl<T: Encoder> Encoder for IndexSet<T> {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        for v in self {
            v.encode(writer);
        }
    }
}
#[cfg(feature = "indexmap")]
impl<T: Decoder + Eq + std::hash::Hash> Decoder for IndexSet<T> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        let mut set = IndexSet::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            set.insert(T::decode(reader)?);
        }
        Ok(set)
    }
}

// --- IndexMap ---
/// Mapping layout in insertion order; the insertion-ordered answer to
/// `HashMap`'s unstable pair order.
#[cfg(feature = "indexmap")]
impl<K: Encoder, V: Encoder> Encoder for IndexMap<K, V> {
    fn encode(&self, writer: &mut BytesMut) {
        put_length(writer, self.len());
        for (k, v) in self {
            k.encode(writer);
            v.encode(writer);
        }
    }
}
#[cfg(feature = "indexmap")]
impl<K: Decoder + Eq + std::hash::Hash, V: Decoder> Decoder for IndexMap<K, V> {
    fn decode(reader: &mut Bytes) -> Result<Self> {
        let len = get_length(reader)?;
        let mut map = IndexMap::with_capacity(len.min(reader.remaining()));
        for _ in 0..len {
            let k = K::decode(reader)?;
            let v = V::decode(reader)?;
            map.insert(k, v);
        }
        Ok(map)
    }
}
