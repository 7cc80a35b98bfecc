//! # wirepack
//!
//! A compact, positional binary serialization library for Rust.
//!
//! - Varint encoding for integers (7 value bits per byte, continuation flag
//!   in the high bit), fixed-width little-endian encoding for floats
//! - Length-prefixed strings, sequences, and mappings that recurse into the
//!   element codecs
//! - Custom derive macros for struct and fieldless-enum serialization
//! - No tags, no field IDs, no framing: the wire layout is defined entirely
//!   by declaration order, and encoder and decoder must agree on the schema
//!
//! The format is deliberately not self-describing and not
//! schema-evolution-friendly; in exchange it is small and byte-stable.
//!
//! ## Composite types
//!
//! `#[derive(Encode, Decode)]` serializes a struct's fields in declaration
//! order with nothing between them. A field marked `#[wirepack(ancestor)]`
//! is serialized before all other fields regardless of where it is declared,
//! which is how a type prefixes its wire layout with a parent type's:
//!
//! ```rust
//! use wirepack::{encode, decode, Encode, Decode};
//!
//! #[derive(Encode, Decode, PartialEq, Debug)]
//! struct Header {
//!     version: u16,
//!     flags: u32,
//! }
//!
//! #[derive(Encode, Decode, PartialEq, Debug)]
//! struct Record {
//!     #[wirepack(ancestor)]
//!     header: Header,
//!     name: String,
//!     values: Vec<u64>,
//! }
//!
//! let record = Record {
//!     header: Header { version: 1, flags: 0 },
//!     name: "sensor".to_string(),
//!     values: vec![300, 7],
//! };
//! let mut buf = encode(&record);
//! let decoded: Record = decode(&mut buf).unwrap();
//! assert_eq!(record, decoded);
//! ```
//!
//! ## Feature flags
//!
//! - `indexmap` — Enables encoding/decoding of `IndexMap` and `IndexSet`.
//!   Their insertion-ordered iteration makes mapping output reproducible,
//!   which plain `HashMap` does not guarantee.

pub mod core;
mod features;
pub mod varint;

/// Re-exported so derive-generated code (and manual impls) can name the
/// buffer types without a separate `bytes` dependency.
pub use bytes;

use bytes::{Bytes, BytesMut};
pub use wirepack_derive::{Decode, Encode};

/// Errors that can occur while decoding.
///
/// Encoding appends to a growable buffer and cannot fail.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// The buffer did not contain enough data to complete the operation.
    #[error("Insufficient data in buffer")]
    InsufficientData,
    /// A varint had its continuation bit set through the maximum encodable
    /// length without terminating.
    #[error("Malformed varint")]
    MalformedVarint,
    /// The bytes were readable but the value was invalid (bad UTF-8, an
    /// unknown enum value, a count mismatch, ...).
    #[error("Decode error: {0}")]
    Decode(String),
}

/// The result type used throughout this crate for decode operations.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Trait for types that can be encoded into the wirepack binary format.
///
/// Most users should use `#[derive(Encode)]` instead of implementing this
/// manually. Encoding only ever appends to `writer` and cannot fail.
pub trait Encoder {
    /// Encode the value into the given buffer.
    fn encode(&self, writer: &mut BytesMut);
}

/// Trait for types that can be decoded from the wirepack binary format.
///
/// Most users should use `#[derive(Decode)]` instead of implementing this
/// manually.
///
/// # Errors
/// Returns [`DecodeError`] if the buffer runs out, a varint is malformed, or
/// a value is invalid for the target type. After an error the cursor
/// position is unspecified and the whole decode attempt must be discarded.
pub trait Decoder: Sized {
    /// Decode a value from the given cursor, advancing it by exactly the
    /// bytes consumed on success.
    fn decode(reader: &mut Bytes) -> Result<Self>;
}

/// Convenience function to encode a value to bytes.
///
/// # Example
/// ```rust
/// use wirepack::{encode, decode, Encode, Decode};
///
/// #[derive(Encode, Decode, PartialEq, Debug)]
/// struct MyStruct {
///     id: u32,
///     name: String,
/// }
///
/// let value = MyStruct { id: 42, name: "hello".to_string() };
/// let mut buf = encode(&value);
/// let decoded: MyStruct = decode(&mut buf).unwrap();
/// assert_eq!(value, decoded);
/// ```
pub fn encode<T: Encoder + ?Sized>(value: &T) -> Bytes {
    let mut writer = BytesMut::new();
    value.encode(&mut writer);
    writer.freeze()
}

/// Convenience function to decode a value from bytes.
///
/// Equivalent to `T::decode(reader)`. The cursor is advanced by exactly the
/// bytes consumed; trailing data is left in place for subsequent decodes.
pub fn decode<T: Decoder>(reader: &mut Bytes) -> Result<T> {
    T::decode(reader)
}
