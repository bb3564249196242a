//! Concurrent decoding of many independent streams.
//!
//! [`DatasetDecoder`] runs one decoder per stream on its own scoped thread and
//! merges what comes back. Every successfully decoded triple is kept, even
//! when other streams fail; if any stream failed, exactly one of the errors is
//! reported alongside the merged triples.
//!
//! Results are merged in completion order, so neither the order of the merged
//! triples across streams nor which error gets reported is stable between
//! runs. Triples from a single stream stay in stream order. There is no
//! timeout: a stream that never ends keeps the whole decode waiting.

use std::io::Read;
use std::sync::mpsc;
use std::thread;

use log::{debug, warn};

use crate::codec::Decoder;
use crate::errors::{Error, PartialDecode};
use crate::model::Triple;

type Outcome = std::result::Result<Vec<Triple>, PartialDecode>;

/// Decodes several readers concurrently with decoders built by `new_decoder`.
///
/// ```
/// use triplestore::{BinaryDecoder, DatasetDecoder, Decoder};
///
/// let streams: Vec<&[u8]> = vec![&[][..], &[][..]];
/// let mut dec = DatasetDecoder::new(BinaryDecoder::new, streams);
/// assert!(dec.decode().unwrap().is_empty());
/// ```
pub struct DatasetDecoder<R, F> {
    new_decoder: F,
    readers: Vec<R>,
}

impl<R, F, D> DatasetDecoder<R, F>
where
    R: Read + Send,
    F: Fn(R) -> D + Sync,
    D: Decoder,
{
    pub fn new<I>(new_decoder: F, readers: I) -> Self
    where
        I: IntoIterator<Item = R>,
    {
        Self {
            new_decoder,
            readers: readers.into_iter().collect(),
        }
    }
}

impl<R, F, D> Decoder for DatasetDecoder<R, F>
where
    R: Read + Send,
    F: Fn(R) -> D + Sync,
    D: Decoder,
{
    /// Consumes the readers; a second call decodes nothing.
    fn decode(&mut self) -> std::result::Result<Vec<Triple>, PartialDecode> {
        let readers = std::mem::take(&mut self.readers);
        let n_streams = readers.len();
        let new_decoder = &self.new_decoder;
        let (tx, rx) = mpsc::channel::<(usize, Outcome)>();

        let mut all: Vec<Triple> = Vec::new();
        let mut first_error: Option<Error> = None;

        thread::scope(|scope| {
            let handles: Vec<_> = readers
                .into_iter()
                .enumerate()
                .map(|(idx, reader)| {
                    let tx = tx.clone();
                    scope.spawn(move || {
                        let outcome = new_decoder(reader).decode();
                        // the receiver outlives every worker
                        let _ = tx.send((idx, outcome));
                    })
                })
                .collect();
            drop(tx);

            // barrier: every worker has finished or died
            for handle in handles {
                if handle.join().is_err() && first_error.is_none() {
                    first_error = Some(Error::Worker("decoder worker panicked".into()));
                }
            }
        });

        for (idx, outcome) in rx.try_iter() {
            match outcome {
                Ok(triples) => {
                    debug!("stream {} decoded {} triples", idx, triples.len());
                    all.extend(triples);
                }
                Err(PartialDecode { triples, error }) => {
                    warn!(
                        "stream {} failed after {} triples: {}",
                        idx,
                        triples.len(),
                        error
                    );
                    all.extend(triples);
                    if first_error.is_none() {
                        first_error = Some(error);
                    }
                }
            }
        }
        debug!(
            "decoded {} triples from {} streams",
            all.len(),
            n_streams
        );

        match first_error {
            None => Ok(all),
            Some(error) => Err(PartialDecode {
                triples: all,
                error,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{BinaryDecoder, BinaryEncoder, Encoder};
    use crate::model::{unordered_eq, SubjPred};
    use crate::ntriples::NTriplesDecoder;

    fn binary(triples: &[Triple]) -> Vec<u8> {
        let mut enc = BinaryEncoder::new(Vec::new());
        enc.encode(triples).unwrap();
        enc.into_inner()
    }

    #[test]
    fn merges_all_streams() {
        let a = vec![
            SubjPred::new("a", "p").resource("x"),
            SubjPred::new("a", "q").integer_literal(1),
        ];
        let b = vec![SubjPred::new("b", "p").boolean_literal(false)];
        let (ba, bb) = (binary(&a), binary(&b));
        let mut dec = DatasetDecoder::new(BinaryDecoder::new, vec![ba.as_slice(), bb.as_slice()]);
        let got = dec.decode().unwrap();
        let want: Vec<Triple> = a.iter().chain(b.iter()).cloned().collect();
        assert!(unordered_eq(&got, &want));

        // readers are consumed by the first call
        assert!(dec.decode().unwrap().is_empty());
    }

    #[test]
    fn keeps_valid_streams_when_one_is_truncated() {
        let good = vec![
            SubjPred::new("a", "p").resource("x"),
            SubjPred::new("b", "p").resource("y"),
        ];
        let ok = binary(&good);
        let mut broken = binary(&[SubjPred::new("c", "p").resource("z")]);
        broken.truncate(broken.len() - 1);

        let mut dec =
            DatasetDecoder::new(BinaryDecoder::new, vec![ok.as_slice(), broken.as_slice()]);
        let err = dec.decode().unwrap_err();
        assert!(matches!(err.error, Error::Truncated { .. }));
        assert_eq!(err.triples.len(), good.len());
        assert!(unordered_eq(&err.triples, &good));
    }

    #[test]
    fn reports_one_error_for_many_failures() {
        let streams: Vec<&[u8]> = vec![
            &b"<s> <p> ."[..],
            &b"<s> <p> <o> ."[..],
            &b"<s> \"x\" ."[..],
        ];
        let mut dec = DatasetDecoder::new(NTriplesDecoder::new, streams);
        let err = dec.decode().unwrap_err();
        assert!(matches!(err.error, Error::Syntax { .. }));
        assert_eq!(err.triples, vec![SubjPred::new("s", "p").resource("o")]);
    }

    #[test]
    fn no_streams_is_empty_success() {
        let streams: Vec<&[u8]> = Vec::new();
        let mut dec = DatasetDecoder::new(BinaryDecoder::new, streams);
        assert!(dec.decode().unwrap().is_empty());
    }
}
