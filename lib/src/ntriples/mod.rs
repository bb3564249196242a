//! N-Triples text format: lexer, parser, encoder and a [`Decoder`] over any
//! reader.

pub mod encoder;
pub mod lexer;
pub mod parser;

use std::io::Read;

use log::debug;

use crate::codec::Decoder;
use crate::errors::{Error, PartialDecode};
use crate::model::Triple;

pub use encoder::NTriplesEncoder;
pub use parser::Parser;

/// Reads a whole N-Triples document and parses every statement.
///
/// Statements that fail to parse do not stop the decode; the first failure
/// is reported together with every triple that did parse.
#[derive(Debug)]
pub struct NTriplesDecoder<R> {
    r: R,
}

impl<R: Read> NTriplesDecoder<R> {
    pub fn new(r: R) -> Self {
        Self { r }
    }
}

impl<R: Read> Decoder for NTriplesDecoder<R> {
    fn decode(&mut self) -> Result<Vec<Triple>, PartialDecode> {
        let mut input = String::new();
        if let Err(e) = self.r.read_to_string(&mut input) {
            return Err(PartialDecode {
                triples: Vec::new(),
                error: Error::Io(e),
            });
        }

        let mut triples = Vec::new();
        let mut first_error = None;
        let mut n_errors = 0usize;
        for res in Parser::new(&input) {
            match res {
                Ok(t) => triples.push(t),
                Err(e) => {
                    n_errors += 1;
                    first_error.get_or_insert(e);
                }
            }
        }
        debug!(
            "parsed {} triples, {} malformed statements",
            triples.len(),
            n_errors
        );
        match first_error {
            None => Ok(triples),
            Some(error) => Err(PartialDecode { triples, error }),
        }
    }
}
