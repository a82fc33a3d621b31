//! The NBT decoder.
//!
//! Decoding is a depth-first descent over a single [`Input`]. A tag is a type
//! byte, a name (for anything but End) and a payload. The payload of a
//! Compound is a run of further tags closed by an End byte, the payload of a
//! List is a run of bare payloads of a single type.
//!
//! ```txt
//! tag      = type:u8 [name:str] payload
//! str      = len:u16 bytes
//! compound = tag* 0x00
//! list     = element_type:u8 len:i32 payload*
//! ```
//!
//! Every failure is wrapped with what was being read at each level, so an
//! error names the exact field the input ran out in:
//!
//! ```
//! use nbt2json::{from_bytes, DeOpts};
//!
//! // A Byte tag whose name claims to be 4 bytes long but is cut short.
//! let data = [0x01, 0x00, 0x04, b'a'];
//! let err = from_bytes(&data, DeOpts::new()).unwrap_err();
//!
//! assert_eq!(err.to_string(), "Reading Name: unexpected end of input");
//! ```

use std::io::BufRead;

use crate::error::{Context, Error, Result};
use crate::input::{read_f32, read_f64, read_int, Input, Reader, Slice};
use crate::{DeOpts, NbtTag, Payload, TagList, TagType};

/// Upper bound on up-front allocation when the input cannot say how much data
/// is left.
const PREALLOC_LIMIT: usize = 4096;

const LIST_ITEM: &str = "Reading list tag item";

/// Decoder for NBT data. See the [`de`](self) module for more information.
pub struct Decoder<I: Input> {
    input: I,
    opts: DeOpts,
    depth: usize,
}

impl<'de> Decoder<Slice<'de>> {
    pub fn from_bytes(input: &'de [u8], opts: DeOpts) -> Self {
        Self::new(Slice::new(input), opts)
    }
}

impl<R: BufRead> Decoder<Reader<R>> {
    pub fn from_reader(reader: R, opts: DeOpts) -> Self {
        Self::new(Reader::new(reader), opts)
    }
}

impl<I: Input> Decoder<I> {
    pub fn new(input: I, opts: DeOpts) -> Self {
        Self {
            input,
            opts,
            depth: 0,
        }
    }

    /// Consumes this decoder, returning the underlying input.
    pub fn into_inner(self) -> I {
        self.input
    }

    /// Decode one complete tag: type, name and payload.
    ///
    /// End tags are decoded as just their type byte. This is also how each
    /// child of a compound is decoded.
    pub fn decode_tag(&mut self) -> Result<NbtTag> {
        let code = self.input.consume_byte().context("Reading TagType")?;

        // End tags have no name or value.
        let name = if code != u8::from(TagType::End) {
            Some(self.decode_name()?)
        } else {
            None
        };

        log::trace!("tag {} named {:?} at depth {}", code, name, self.depth);

        let value = self.decode_payload(code)?;

        Ok(NbtTag {
            tag_type: value.tag_type(),
            name,
            value,
        })
    }

    /// Decode the payload of a tag of type `code`. Nothing but the payload
    /// is consumed; the caller has already dealt with any header.
    pub fn decode_payload(&mut self, code: u8) -> Result<Payload> {
        let tag_type = TagType::try_from(code)
            .map_err(|_| Error::invalid_tag(code).context("TagType not recognized"))?;

        // Only lists and compounds recurse. Everything else is decoded out of
        // line so each level of nesting costs as little stack as possible.
        match tag_type {
            TagType::List => Ok(Payload::List(self.decode_list()?)),
            TagType::Compound => Ok(Payload::Compound(self.decode_compound()?)),
            _ => self.decode_leaf(tag_type),
        }
    }

    #[inline(never)]
    fn decode_leaf(&mut self, tag_type: TagType) -> Result<Payload> {
        let endian = self.opts.endian;

        Ok(match tag_type {
            TagType::End => Payload::End,
            TagType::Byte => {
                Payload::Byte(read_int(&mut self.input, 1, endian).context("Reading int8")? as i8)
            }
            TagType::Short => Payload::Short(
                read_int(&mut self.input, 2, endian).context("Reading int16")? as i16,
            ),
            TagType::Int => {
                Payload::Int(read_int(&mut self.input, 4, endian).context("Reading int32")? as i32)
            }
            TagType::Long => {
                Payload::Long(read_int(&mut self.input, 8, endian).context("Reading int64")?)
            }
            TagType::Float => {
                Payload::Float(read_f32(&mut self.input, endian).context("Reading float32")?)
            }
            TagType::Double => {
                Payload::Double(read_f64(&mut self.input, endian).context("Reading float64")?)
            }
            TagType::ByteArray => {
                const ITEM: &str = "Reading byte in byte array tag";
                let len = self.decode_len(TagType::Byte, "Reading byte array tag length", ITEM)?;

                let mut bytes = Vec::with_capacity(self.capacity(len));
                for _ in 0..len {
                    bytes.push(self.input.consume_byte().context(ITEM)? as i8);
                }
                Payload::ByteArray(bytes)
            }
            TagType::String => Payload::String(self.decode_str(
                "Reading string tag length",
                "Reading string tag data",
            )?),
            TagType::IntArray => {
                const ITEM: &str = "Reading int in int array tag";
                let len = self.decode_len(TagType::Int, "Reading int array tag length", ITEM)?;

                let mut ints = Vec::with_capacity(self.capacity(len));
                for _ in 0..len {
                    ints.push(read_int(&mut self.input, 4, endian).context(ITEM)? as i32);
                }
                Payload::IntArray(ints)
            }
            TagType::List | TagType::Compound => {
                return Err(Error::bespoke(format!("{} is not a leaf tag", tag_type)))
            }
        })
    }

    fn decode_name(&mut self) -> Result<String> {
        self.decode_str("Reading Name length", "Reading Name")
    }

    fn decode_str(&mut self, len_context: &str, data_context: &str) -> Result<String> {
        // Lengths of strings are unsigned.
        let len = read_int(&mut self.input, 2, self.opts.endian).context(len_context)? as u16;
        let bytes = self.input.consume_bytes(len.into()).context(data_context)?;

        // Java writes strings as modified UTF-8. Anything that is not, such
        // as plain UTF-8 outside the BMP, is kept as whatever UTF-8 makes of it.
        Ok(match cesu8::from_java_cesu8(&bytes) {
            Ok(s) => s.into_owned(),
            Err(_) => String::from_utf8_lossy(&bytes).into_owned(),
        })
    }

    fn decode_list(&mut self) -> Result<TagList> {
        let code = self.input.consume_byte().context("Reading list tag type")?;
        let element_type = TagType::try_from(code)
            .map_err(|_| Error::invalid_tag(code).context("Reading list tag type"))?;
        let len = self.decode_len(element_type, "Reading list tag length", LIST_ITEM)?;

        // End payloads take up no input, so a long list of them would be an
        // easy way to use up memory. Some old chunks store empty lists as a
        // list of End, so a length of zero is fine.
        if element_type == TagType::End && len != 0 {
            return Err(Error::invalid_size(format!(
                "unexpected list of {} End elements",
                len
            ))
            .context("Reading list tag length"));
        }

        log::trace!("list of {} x {}", len, element_type);

        self.enter()?;
        let elements = self.decode_list_items(code, len);
        self.leave();

        Ok(TagList {
            element_type,
            elements: elements?,
        })
    }

    fn decode_list_items(&mut self, code: u8, len: usize) -> Result<Vec<Payload>> {
        let mut elements = Vec::with_capacity(self.capacity(len));
        for _ in 0..len {
            elements.push(self.decode_payload(code).context(LIST_ITEM)?);
        }
        Ok(elements)
    }

    fn decode_compound(&mut self) -> Result<Vec<NbtTag>> {
        const NEXT: &str = "compound: reading next tag type";

        log::trace!("compound at depth {}", self.depth);

        self.enter()?;
        let mut children = vec![];
        let res = loop {
            // The type byte is only looked at here. If it is not an End the
            // child tag decode reads it again as part of its header.
            match self.input.peek_byte().context(NEXT) {
                Ok(0) => break self.input.consume_byte().context(NEXT).map(|_| ()),
                Ok(_) => match self.decode_tag().context("compound: reading a child tag") {
                    Ok(child) => children.push(child),
                    Err(e) => break Err(e),
                },
                Err(e) => break Err(e),
            }
        };
        self.leave();
        res?;

        Ok(children)
    }

    /// Read a 32-bit length prefix for `len` elements of `element_type`.
    /// Lengths that could never be satisfied by the remaining input fail
    /// here, under the context of reading the elements.
    fn decode_len(
        &mut self,
        element_type: TagType,
        len_context: &str,
        item_context: &str,
    ) -> Result<usize> {
        let len = read_int(&mut self.input, 4, self.opts.endian).context(len_context)?;
        let len = usize::try_from(len).map_err(|_| {
            Error::invalid_size(format!("length was negative: {}", len)).context(len_context)
        })?;

        if len > self.opts.max_seq_len {
            return Err(Error::invalid_size(format!(
                "length ({}) greater than max sequence length ({})",
                len, self.opts.max_seq_len,
            ))
            .context(len_context));
        }

        if let Some(remaining) = self.input.remaining() {
            if len.saturating_mul(element_type.min_payload_size()) > remaining {
                return Err(Error::unexpected_eof().context(item_context));
            }
        }

        Ok(len)
    }

    fn capacity(&self, len: usize) -> usize {
        match self.input.remaining() {
            // Already checked against the remaining input.
            Some(_) => len,
            None => len.min(PREALLOC_LIMIT),
        }
    }

    fn enter(&mut self) -> Result<()> {
        if self.depth >= self.opts.max_depth {
            return Err(Error::depth_limit(self.opts.max_depth));
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}
