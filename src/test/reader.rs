use std::io::{BufReader, Read};

use super::builder::Builder;
use crate::error::{ErrorKind, Result};
use crate::{from_bytes, from_reader, DeOpts, Decoder, Payload, TagType};

/// Reader that hands out at most one byte per call, so peeks have to refill
/// the buffer constantly.
struct Trickle<'a>(&'a [u8]);

impl<'a> Read for Trickle<'a> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        if self.0.is_empty() || buf.is_empty() {
            return Ok(0);
        }
        buf[0] = self.0[0];
        self.0 = &self.0[1..];
        Ok(1)
    }
}

fn sample() -> Vec<u8> {
    Builder::new()
        .start_compound("root")
        .byte_array("ba", &[-1, 0, 1])
        .start_list("list", TagType::Compound, 2)
        .start_anon_compound()
        .string("id", "a")
        .end_compound()
        .start_anon_compound()
        .end_compound()
        .int_array("ia", &[3, 4])
        .end_compound()
        .build()
}

#[test]
fn reader_matches_slice() -> Result<()> {
    let payload = sample();

    let from_slice = from_bytes(&payload, DeOpts::new())?;
    let from_read = from_reader(payload.as_slice(), DeOpts::new())?;

    assert_eq!(from_slice, from_read);
    Ok(())
}

#[test]
fn one_byte_at_a_time() -> Result<()> {
    let payload = sample();

    let tag = from_reader(Trickle(&payload), DeOpts::new())?;
    assert_eq!(tag, from_bytes(&payload, DeOpts::new())?);
    Ok(())
}

#[test]
fn reader_truncation_is_eof() {
    let payload = sample();

    for len in 0..payload.len() {
        let err = from_reader(Trickle(&payload[..len]), DeOpts::new()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::UnexpectedEof, "truncated at {}", len);
    }
}

#[test]
fn reader_huge_declared_length_does_not_preallocate() {
    let payload = Builder::new()
        .tag(TagType::IntArray)
        .name("a")
        .int_payload(i32::MAX)
        .int_payload(1)
        .build();

    let err = from_reader(payload.as_slice(), DeOpts::new()).unwrap_err();
    assert!(err.is_eof());
    assert_eq!(err.message(), "Reading int in int array tag");
}

#[test]
fn reader_decoder_leaves_rest_of_stream() -> Result<()> {
    let payload = Builder::new()
        .byte("a", 1)
        .byte("b", 2)
        .build();

    let mut decoder = Decoder::from_reader(BufReader::new(payload.as_slice()), DeOpts::new());
    assert_eq!(decoder.decode_tag()?.value, Payload::Byte(1));
    assert_eq!(decoder.decode_tag()?.name(), "b");
    Ok(())
}
