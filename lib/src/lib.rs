//! triplestore: an embeddable, in-memory RDF triple store.
//!
//! A [`Source`] accumulates triples from a single writer and hands out
//! immutable [`Snapshot`]s for querying. Triples move in and out through two
//! formats: a compact binary framing ([`BinaryEncoder`], [`BinaryDecoder`])
//! and N-Triples text ([`NTriplesEncoder`], [`NTriplesDecoder`]).
//! [`DatasetDecoder`] decodes many streams concurrently.
//!
//! Quick start
//!
//! ```
//! use triplestore::{BinaryDecoder, BinaryEncoder, Decoder, Encoder, Literal, Source, SubjPred};
//!
//! let triples = vec![
//!     SubjPred::new("a", "name").string_literal("bob"),
//!     SubjPred::new("b", "name").string_literal("bob"),
//!     SubjPred::new("a", "age").integer_literal(32),
//! ];
//!
//! let mut enc = BinaryEncoder::new(Vec::new());
//! enc.encode(&triples).unwrap();
//! let bytes = enc.into_inner();
//!
//! let mut src = Source::new();
//! src.add(BinaryDecoder::new(bytes.as_slice()).decode().unwrap());
//! let snap = src.snapshot();
//! assert_eq!(snap.with_pred_obj("name", &Literal::string("bob").into()).len(), 2);
//! ```

pub mod codec;
pub mod config;
pub mod consts;
pub mod errors;
pub mod model;
pub mod ntriples;
#[cfg(feature = "oxigraph")]
pub mod oxigraph_conv;
pub mod store;

pub use codec::{BinaryDecoder, BinaryEncoder, DatasetDecoder, Decoder, Encoder, Format};
pub use config::{DatasetConfig, SourceConfig};
pub use errors::{Error, PartialDecode, Result};
pub use model::{unordered_eq, Literal, Object, SubjPred, ToTriples, Triple};
pub use ntriples::{NTriplesDecoder, NTriplesEncoder};
pub use store::{Snapshot, Source};
