//! Binary VDF codec.
//!
//! Steam stores `shortcuts.vdf` as a nested key/value tree where every
//! value is preceded by a one-byte type tag and a NUL-terminated key:
//!
//! ```text
//! dict  := (tag key value)* END
//! key   := utf8 bytes, 0x00
//! END   := 0x08            (0x0B is accepted on read, never written)
//! ```
//!
//! The codec knows nothing about shortcuts. [`decode`] followed by
//! [`encode`] reproduces the input bytes exactly.

mod reader;
mod value;
mod writer;

pub use reader::decode;
pub use value::{TaggedDict, Value};
pub use writer::{encode, encode_into};

/// Nested dictionary.
pub const TYPE_DICT: u8 = 0x00;
/// NUL-terminated UTF-8 string.
pub const TYPE_STRING: u8 = 0x01;
/// Little-endian `i32`.
pub const TYPE_INT32: u8 = 0x02;
/// Little-endian `f32`.
pub const TYPE_FLOAT32: u8 = 0x03;
/// Opaque 32-bit pointer, stored like `i32`.
pub const TYPE_POINTER: u8 = 0x04;
/// UTF-16LE string terminated by a zero code unit.
pub const TYPE_WIDE_STRING: u8 = 0x05;
/// 32-bit color, stored like `i32`.
pub const TYPE_COLOR: u8 = 0x06;
/// Little-endian `u64`.
pub const TYPE_UINT64: u8 = 0x07;
/// End of the current dictionary.
pub const TYPE_END: u8 = 0x08;
/// Little-endian `i64`.
pub const TYPE_INT64: u8 = 0x0A;
/// Alternate end marker seen in some files. Read only.
pub const TYPE_END_ALT: u8 = 0x0B;

/// Maximum dictionary nesting accepted by the decoder.
pub const MAX_DEPTH: usize = 64;

/// Errors produced while decoding or encoding binary VDF.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VdfError {
    #[error("unknown type tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("unexpected end of data at offset {offset}")]
    UnexpectedEof { offset: usize },

    #[error("invalid UTF-8 text at offset {offset}")]
    InvalidUtf8 { offset: usize },

    #[error("invalid UTF-16 text at offset {offset}")]
    InvalidUtf16 { offset: usize },

    #[error("{count} trailing bytes after root dictionary at offset {offset}")]
    TrailingData { offset: usize, count: usize },

    #[error("dictionary nesting exceeds {} levels at offset {offset}", MAX_DEPTH)]
    TooDeep { offset: usize },

    #[error("key or string contains a NUL character: {0:?}")]
    EmbeddedNul(String),
}
