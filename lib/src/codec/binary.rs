//! Length-prefixed binary triple frames.
//!
//! Each triple is written as (all integers big-endian):
//!
//! ```text
//! u32 len  subject
//! u32 len  predicate
//! u8  kind              0 = resource, 1 = literal
//!   kind 0: u32 len  resource id
//!   kind 1: u32 len  literal type
//!           u32 len  literal value
//! ```
//!
//! Frames repeat until end of stream. A stream may only end right before a
//! subject length; ending anywhere else is a truncation error naming the
//! field that could not be read.

use std::io::{self, Read, Write};

use log::debug;

use crate::codec::{Decoder, Encoder};
use crate::errors::{Error, Field, PartialDecode, Result};
use crate::model::{Literal, Object, Triple};

const RESOURCE_KIND: u8 = 0;
const LITERAL_KIND: u8 = 1;

fn frame_len(len: usize, field: Field) -> Result<[u8; 4]> {
    u32::try_from(len)
        .map(u32::to_be_bytes)
        .map_err(|_| Error::FieldTooLong { field, len })
}

fn push_word(word: &str, field: Field, out: &mut Vec<u8>) -> Result<()> {
    out.extend_from_slice(&frame_len(word.len(), field)?);
    out.extend_from_slice(word.as_bytes());
    Ok(())
}

fn encode_triple(t: &Triple, out: &mut Vec<u8>) -> Result<()> {
    push_word(t.subject(), Field::Subject, out)?;
    push_word(t.predicate(), Field::Predicate, out)?;
    match t.object() {
        Object::Resource(id) => {
            out.push(RESOURCE_KIND);
            push_word(id, Field::Resource, out)
        }
        Object::Literal(lit) => {
            out.push(LITERAL_KIND);
            push_word(lit.datatype(), Field::LiteralType, out)?;
            push_word(lit.value(), Field::LiteralValue, out)
        }
    }
}

/// Writes triples as binary frames.
#[derive(Debug)]
pub struct BinaryEncoder<W> {
    w: W,
    buf: Vec<u8>,
}

impl<W: Write> BinaryEncoder<W> {
    pub fn new(w: W) -> Self {
        Self { w, buf: Vec::new() }
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}

impl<W: Write> Encoder for BinaryEncoder<W> {
    fn encode(&mut self, triples: &[Triple]) -> Result<()> {
        for t in triples {
            self.buf.clear();
            encode_triple(t, &mut self.buf)?;
            self.w.write_all(&self.buf)?;
        }
        Ok(())
    }
}

/// Reads binary frames until end of stream.
#[derive(Debug)]
pub struct BinaryDecoder<R> {
    r: R,
}

impl<R: Read> BinaryDecoder<R> {
    pub fn new(r: R) -> Self {
        Self { r }
    }

    /// Reads a u32 length, or `None` if the stream ends before its first byte.
    fn read_len_or_eof(&mut self, field: Field) -> Result<Option<u32>> {
        let mut len = [0u8; 4];
        let mut filled = 0;
        while filled < len.len() {
            match self.r.read(&mut len[filled..]) {
                Ok(0) if filled == 0 => return Ok(None),
                Ok(0) => {
                    return Err(Error::Truncated {
                        field,
                        source: io::ErrorKind::UnexpectedEof.into(),
                    })
                }
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::Truncated { field, source: e }),
            }
        }
        Ok(Some(u32::from_be_bytes(len)))
    }

    fn read_body(&mut self, len: u32, field: Field) -> Result<String> {
        // read through `take` so a corrupt length cannot force a huge allocation
        let mut bytes = Vec::new();
        let n = (&mut self.r)
            .take(u64::from(len))
            .read_to_end(&mut bytes)
            .map_err(|source| Error::Truncated { field, source })?;
        if n < len as usize {
            return Err(Error::Truncated {
                field,
                source: io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    format!("expected {} bytes, got {}", len, n),
                ),
            });
        }
        String::from_utf8(bytes).map_err(|_| Error::InvalidUtf8 { field })
    }

    fn read_word(&mut self, field: Field) -> Result<String> {
        match self.read_len_or_eof(field)? {
            Some(len) => self.read_body(len, field),
            None => Err(Error::Truncated {
                field,
                source: io::ErrorKind::UnexpectedEof.into(),
            }),
        }
    }

    fn read_kind(&mut self) -> Result<u8> {
        let mut kind = [0u8; 1];
        self.r
            .read_exact(&mut kind)
            .map_err(|source| Error::Truncated {
                field: Field::ObjectKind,
                source,
            })?;
        Ok(kind[0])
    }

    /// Decodes one frame; `Ok(None)` on a clean end of stream.
    fn decode_triple(&mut self) -> Result<Option<Triple>> {
        let Some(len) = self.read_len_or_eof(Field::Subject)? else {
            return Ok(None);
        };
        let subject = self.read_body(len, Field::Subject)?;
        let predicate = self.read_word(Field::Predicate)?;
        let object = match self.read_kind()? {
            RESOURCE_KIND => Object::Resource(self.read_word(Field::Resource)?),
            LITERAL_KIND => {
                let datatype = self.read_word(Field::LiteralType)?;
                let value = self.read_word(Field::LiteralValue)?;
                Object::Literal(Literal::new(datatype, value))
            }
            other => return Err(Error::UnknownObjectKind(other)),
        };
        Ok(Some(Triple::new(subject, predicate, object)))
    }
}

impl<R: Read> Decoder for BinaryDecoder<R> {
    fn decode(&mut self) -> std::result::Result<Vec<Triple>, PartialDecode> {
        let mut triples = Vec::new();
        loop {
            match self.decode_triple() {
                Ok(Some(t)) => triples.push(t),
                Ok(None) => break,
                Err(error) => {
                    debug!("binary decode failed after {} triples: {}", triples.len(), error);
                    return Err(PartialDecode { triples, error });
                }
            }
        }
        Ok(triples)
    }
}
