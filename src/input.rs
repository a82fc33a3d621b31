//! Byte cursors the decoder reads from, and the primitive number readers
//! shared by every tag type.

use std::io::BufRead;

use byteorder::{BigEndian, ByteOrder, LittleEndian, ReadBytesExt};

use crate::{
    error::{Context, Error, Result},
    Endian,
};

mod private {
    // Only this crate can implement this trait. Other traits can inherit from
    // Sealed in order to prevent other crates from creating implementations.
    pub trait Sealed {}
}

/// A forward-only cursor over NBT data that can look at the next byte without
/// consuming it.
pub trait Input: private::Sealed {
    fn consume_byte(&mut self) -> Result<u8>;

    /// Return the next byte, leaving it in the input.
    fn peek_byte(&mut self) -> Result<u8>;

    /// Fill `buf` completely, or fail with an EOF error.
    fn consume_exact(&mut self, buf: &mut [u8]) -> Result<()>;

    /// Number of bytes left, if the input knows it.
    fn remaining(&self) -> Option<usize>;

    fn consume_bytes(&mut self, n: usize) -> Result<Vec<u8>> {
        if let Some(remaining) = self.remaining() {
            if n > remaining {
                return Err(Error::unexpected_eof());
            }
        }

        let mut buf = vec![0; n];
        self.consume_exact(&mut buf)?;
        Ok(buf)
    }
}

/// Input over an in-memory byte slice.
pub struct Slice<'de> {
    data: &'de [u8],
    pos: usize,
}

impl<'de> Slice<'de> {
    pub fn new(data: &'de [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining_len(&self) -> usize {
        self.data.len() - self.pos
    }

    fn consume(&mut self, n: usize) -> Result<&'de [u8]> {
        if n <= self.remaining_len() {
            let ret = &self.data[self.pos..self.pos + n];
            self.pos += n;
            Ok(ret)
        } else {
            Err(Error::unexpected_eof())
        }
    }
}

impl<'de> private::Sealed for Slice<'de> {}

impl<'de> Input for Slice<'de> {
    fn consume_byte(&mut self) -> Result<u8> {
        Ok(self.consume(1)?[0])
    }

    fn peek_byte(&mut self) -> Result<u8> {
        self.data
            .get(self.pos)
            .copied()
            .ok_or_else(Error::unexpected_eof)
    }

    fn consume_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        buf.copy_from_slice(self.consume(buf.len())?);
        Ok(())
    }

    fn remaining(&self) -> Option<usize> {
        Some(self.remaining_len())
    }
}

/// Input over any buffered reader. The buffer is what allows peeking.
pub struct Reader<R: BufRead> {
    reader: R,
}

impl<R: BufRead> Reader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

impl<R: BufRead> private::Sealed for Reader<R> {}

impl<R: BufRead> Input for Reader<R> {
    fn consume_byte(&mut self) -> Result<u8> {
        Ok(self.reader.read_u8()?)
    }

    fn peek_byte(&mut self) -> Result<u8> {
        let buf = self.reader.fill_buf()?;
        buf.first().copied().ok_or_else(Error::unexpected_eof)
    }

    fn consume_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        Ok(self.reader.read_exact(buf)?)
    }

    fn remaining(&self) -> Option<usize> {
        None
    }
}

/// Read a `width` byte signed integer and widen it to an `i64`.
///
/// `width` must be 1, 2, 4 or 8. Every integer tag type goes through here, as
/// do the lengths of arrays and lists.
pub fn read_int<I: Input + ?Sized>(input: &mut I, width: usize, endian: Endian) -> Result<i64> {
    if !matches!(width, 1 | 2 | 4 | 8) {
        return Err(Error::config(format!(
            "unsupported integer width: {}",
            width
        )));
    }

    let mut raw = [0u8; 8];
    input
        .consume_exact(&mut raw[..width])
        .context(&format!("Reading {} bytes for integer", width))?;

    Ok(widen(&raw[..width], endian))
}

/// Sign-extend `raw` to eight bytes by padding the most significant end, then
/// reinterpret it in the same byte order. `raw` must hold 1 to 8 bytes.
pub(crate) fn widen(raw: &[u8], endian: Endian) -> i64 {
    let width = raw.len();
    let mut buf = [0u8; 8];

    match endian {
        Endian::Big => {
            let pad = sign_pad(raw[0]);
            buf[..8 - width].fill(pad);
            buf[8 - width..].copy_from_slice(raw);
            BigEndian::read_i64(&buf)
        }
        Endian::Little => {
            let pad = sign_pad(raw[width - 1]);
            buf[..width].copy_from_slice(raw);
            buf[width..].fill(pad);
            LittleEndian::read_i64(&buf)
        }
    }
}

fn sign_pad(most_significant: u8) -> u8 {
    if most_significant & 0x80 != 0 {
        0xff
    } else {
        0x00
    }
}

pub fn read_f32<I: Input + ?Sized>(input: &mut I, endian: Endian) -> Result<f32> {
    let mut raw = [0u8; 4];
    input.consume_exact(&mut raw)?;
    Ok(match endian {
        Endian::Big => BigEndian::read_f32(&raw),
        Endian::Little => LittleEndian::read_f32(&raw),
    })
}

pub fn read_f64<I: Input + ?Sized>(input: &mut I, endian: Endian) -> Result<f64> {
    let mut raw = [0u8; 8];
    input.consume_exact(&mut raw)?;
    Ok(match endian {
        Endian::Big => BigEndian::read_f64(&raw),
        Endian::Little => LittleEndian::read_f64(&raw),
    })
}
