use std::io::Write;

use crate::codec::Encoder;
use crate::consts::{xsd_iri_for_tag, XSD_BOOLEAN, XSD_DATE_TIME, XSD_INTEGER};
use crate::errors::Result;
use crate::model::{Object, Triple};

/// Datatype IRI written after a literal of type `tag`, if any.
///
/// Only boolean, dateTime and integer literals are annotated. Strings are
/// written bare, and so is every other tag, custom ones included.
pub fn datatype_suffix(tag: &str) -> Option<&'static str> {
    match tag {
        XSD_BOOLEAN | XSD_DATE_TIME | XSD_INTEGER => xsd_iri_for_tag(tag),
        _ => None,
    }
}

fn encode_line(t: &Triple) -> String {
    let object = match t.object() {
        Object::Resource(id) => format!("<{}>", id),
        Object::Literal(lit) => match datatype_suffix(lit.datatype()) {
            Some(iri) => format!("\"{}\"^^<{}>", lit.value(), iri),
            None => format!("\"{}\"", lit.value()),
        },
    };
    format!("<{}> <{}> {} .\n", t.subject(), t.predicate(), object)
}

/// Writes triples as N-Triples, one statement per line.
#[derive(Debug)]
pub struct NTriplesEncoder<W> {
    w: W,
}

impl<W: Write> NTriplesEncoder<W> {
    pub fn new(w: W) -> Self {
        Self { w }
    }

    pub fn into_inner(self) -> W {
        self.w
    }
}

impl<W: Write> Encoder for NTriplesEncoder<W> {
    fn encode(&mut self, triples: &[Triple]) -> Result<()> {
        for t in triples {
            self.w.write_all(encode_line(t).as_bytes())?;
        }
        Ok(())
    }
}
