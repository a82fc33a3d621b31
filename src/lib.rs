//! nbt2json decodes NBT (Named Binary Tag) data, the binary format used by
//! *Minecraft* for world data, player files and the like, into a tree that
//! serializes to JSON.
//!
//! Every node keeps its tag type, its name and its value, so the JSON output
//! captures all of the information in the original NBT:
//!
//! ```txt
//! { "tagType": 10, "name": "", "value": [
//!     { "tagType": 3, "name": "DataVersion", "value": 3465 }
//! ] }
//! ```
//!
//! * For decoding into the tree see [`from_bytes`] and [`from_reader`].
//! * For the tree itself see [`NbtTag`] and [`Payload`].
//! * For going straight to JSON see [`nbt_to_json`].
//!
//! # Byte order
//!
//! *Java Edition* writes NBT big-endian, *Bedrock Edition* writes it
//! little-endian. The decoder does not guess: the byte order is part of
//! [`DeOpts`] and applies to the whole document.
//!
//! # Compression
//!
//! Most NBT on disk is compressed with GZip or Zlib. This crate does not do
//! decompression, so decompress the data first, for example with `flate2`.
//!
//! # Quick example
//!
//! ```
//! use nbt2json::{from_bytes, to_json, DeOpts};
//!
//! # fn main() -> nbt2json::error::Result<()> {
//! // A Byte tag called "a" with the value 7.
//! let data = [0x01, 0x00, 0x01, b'a', 0x07];
//! let tag = from_bytes(&data, DeOpts::new())?;
//!
//! assert_eq!(to_json(&tag)?, r#"{"tagType":1,"name":"a","value":7}"#);
//! # Ok(())
//! # }
//! ```

pub mod de;
pub mod error;
pub mod input;

mod value;

pub use de::Decoder;
pub use value::*;

#[cfg(test)]
mod test;

use std::fmt::Display;
use std::io::Read;
use std::str::FromStr;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::Serialize;

use crate::error::{Error, Result};

/// An NBT tag type. This does not carry the value or the name of the data.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash, TryFromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum TagType {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other objects, all of the same type.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
}

impl TagType {
    /// The fewest bytes a payload of this type can occupy. Used to reject
    /// declared lengths that the remaining input could never satisfy.
    pub(crate) fn min_payload_size(self) -> usize {
        match self {
            TagType::End => 0,
            TagType::Byte => 1,
            TagType::Short => 2,
            TagType::Int => 4,
            TagType::Long => 8,
            TagType::Float => 4,
            TagType::Double => 8,
            TagType::ByteArray => 4,
            TagType::String => 2,
            TagType::List => 5,
            TagType::Compound => 1,
            TagType::IntArray => 4,
        }
    }
}

impl Serialize for TagType {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(u8::from(*self))
    }
}

impl Display for TagType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TagType::End => "TAG_End",
            TagType::Byte => "TAG_Byte",
            TagType::Short => "TAG_Short",
            TagType::Int => "TAG_Int",
            TagType::Long => "TAG_Long",
            TagType::Float => "TAG_Float",
            TagType::Double => "TAG_Double",
            TagType::ByteArray => "TAG_Byte_Array",
            TagType::String => "TAG_String",
            TagType::List => "TAG_List",
            TagType::Compound => "TAG_Compound",
            TagType::IntArray => "TAG_Int_Array",
        };
        f.write_str(name)
    }
}

/// Byte order of every multi-byte number in a document.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub enum Endian {
    /// Used by *Java Edition*.
    #[default]
    Big,
    /// Used by *Bedrock Edition*.
    Little,
}

impl FromStr for Endian {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "big" | "be" | "big-endian" | "bigendian" => Ok(Endian::Big),
            "little" | "le" | "little-endian" | "littleendian" => Ok(Endian::Little),
            _ => Err(Error::unsupported_byte_order(s)),
        }
    }
}

impl Display for Endian {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Endian::Big => f.write_str("big-endian"),
            Endian::Little => f.write_str("little-endian"),
        }
    }
}

/// Options for customizing decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeOpts {
    pub(crate) endian: Endian,
    pub(crate) max_depth: usize,
    pub(crate) max_seq_len: usize,
}

impl DeOpts {
    /// Create new options. This object follows a builder pattern.
    ///
    /// Defaults to big-endian, a nesting limit of 128 and no limit on
    /// sequence lengths beyond what the format can express.
    pub fn new() -> Self {
        Self {
            endian: Endian::Big,
            max_depth: 128,
            max_seq_len: i32::MAX as usize,
        }
    }

    /// Options for the little-endian NBT written by *Bedrock Edition*.
    pub fn bedrock() -> Self {
        Self::new().endian(Endian::Little)
    }

    /// Byte order of the document.
    pub fn endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Maximum number of Lists and Compounds that may be nested inside each
    /// other. Deeper documents fail with [`ErrorKind::DepthLimit`].
    ///
    /// [`ErrorKind::DepthLimit`]: error::ErrorKind::DepthLimit
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    /// Maximum number of elements a List or array may declare.
    pub fn max_seq_len(mut self, value: usize) -> Self {
        self.max_seq_len = value;
        self
    }
}

impl Default for DeOpts {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a single top-level tag from the start of `input`. Any bytes after
/// the tag are ignored.
pub fn from_bytes(input: &[u8], opts: DeOpts) -> Result<NbtTag> {
    log::debug!("decoding {} bytes of {} NBT", input.len(), opts.endian);

    let mut decoder = Decoder::from_bytes(input, opts);
    let tag = decoder.decode_tag()?;

    let trailing = decoder.into_inner().remaining_len();
    if trailing > 0 {
        log::debug!("ignoring {} trailing bytes after top-level tag", trailing);
    }

    Ok(tag)
}

/// Decode a single top-level tag from a reader. The reader is buffered
/// internally, so bytes past the end of the tag may be consumed from it.
pub fn from_reader<R: Read>(reader: R, opts: DeOpts) -> Result<NbtTag> {
    log::debug!("decoding {} NBT from reader", opts.endian);

    let mut decoder = Decoder::from_reader(std::io::BufReader::new(reader), opts);
    decoder.decode_tag()
}

/// Serialize a decoded tag to compact JSON.
pub fn to_json(tag: &NbtTag) -> Result<String> {
    Ok(serde_json::to_string(tag)?)
}

/// Serialize a decoded tag to JSON indented with two spaces.
pub fn to_json_pretty(tag: &NbtTag) -> Result<String> {
    Ok(serde_json::to_string_pretty(tag)?)
}

/// Decode the NBT in `input` and render it as indented JSON. No JSON is
/// produced if any part of the decode fails.
pub fn nbt_to_json(input: &[u8], opts: DeOpts) -> Result<String> {
    let tag = from_bytes(input, opts)?;
    to_json_pretty(&tag)
}
