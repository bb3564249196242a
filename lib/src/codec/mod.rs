//! Encoder and decoder contracts, and the formats that implement them.
//!
//! Two wire formats exist: the framed [`binary`] format and N-Triples text
//! (see [`crate::ntriples`]). [`DatasetDecoder`] runs any decoder over many
//! streams at once.

pub mod binary;
pub mod dataset;

use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::errors::{PartialDecode, Result};
use crate::model::Triple;
use crate::ntriples::{NTriplesDecoder, NTriplesEncoder};

pub use binary::{BinaryDecoder, BinaryEncoder};
pub use dataset::DatasetDecoder;

/// Writes triples to an underlying sink.
pub trait Encoder {
    /// Writes each triple in order. On failure the sink may hold a partially
    /// written stream.
    fn encode(&mut self, triples: &[Triple]) -> Result<()>;
}

/// Reads triples from an underlying source until it is exhausted.
pub trait Decoder {
    /// Returns every triple in the stream, or the triples read before the
    /// first failure together with that failure.
    fn decode(&mut self) -> std::result::Result<Vec<Triple>, PartialDecode>;
}

impl<E: Encoder + ?Sized> Encoder for Box<E> {
    fn encode(&mut self, triples: &[Triple]) -> Result<()> {
        (**self).encode(triples)
    }
}

impl<D: Decoder + ?Sized> Decoder for Box<D> {
    fn decode(&mut self) -> std::result::Result<Vec<Triple>, PartialDecode> {
        (**self).decode()
    }
}

/// Serialization formats understood by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Binary,
    NTriples,
}

impl Format {
    /// Guesses the format from a file extension (`.nt`, `.bin`, ...).
    pub fn from_extension(path: &Path) -> Option<Format> {
        let ext = path.extension()?.to_str()?;
        match ext.to_ascii_lowercase().as_str() {
            "nt" | "ntriples" => Some(Format::NTriples),
            "bin" | "tri" | "triples" => Some(Format::Binary),
            _ => None,
        }
    }

    pub fn decoder<'a, R: Read + 'a>(self, reader: R) -> Box<dyn Decoder + 'a> {
        match self {
            Format::Binary => Box::new(BinaryDecoder::new(reader)),
            Format::NTriples => Box::new(NTriplesDecoder::new(reader)),
        }
    }

    pub fn encoder<'a, W: Write + 'a>(self, writer: W) -> Box<dyn Encoder + 'a> {
        match self {
            Format::Binary => Box::new(BinaryEncoder::new(writer)),
            Format::NTriples => Box::new(NTriplesEncoder::new(writer)),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Format::Binary => write!(f, "binary"),
            Format::NTriples => write!(f, "ntriples"),
        }
    }
}
