//! In-memory triple store: a single-writer [`Source`] and immutable
//! [`Snapshot`] views of it.
//!
//! Triples live in segments. The `Source` owns one mutable tail segment and a
//! list of sealed segments behind `Arc`s. Taking a snapshot seals the tail and
//! clones the list of `Arc`s, which pins that generation: later writes go to a
//! fresh tail, and merging sealed segments builds new ones instead of touching
//! the ones a snapshot holds. No triple is copied by `snapshot()`.
//!
//! ```
//! use triplestore::{Literal, Source, SubjPred};
//!
//! let mut src = Source::new();
//! src.add([SubjPred::new("a", "name").string_literal("bob")]);
//! let snap = src.snapshot();
//! src.add([SubjPred::new("b", "name").string_literal("bob")]);
//!
//! assert_eq!(snap.count(), 1);
//! assert_eq!(src.snapshot().with_pred_obj("name", &Literal::string("bob").into()).len(), 2);
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;

use crate::model::{Object, Triple};

type Postings = Vec<usize>;

/// A run of triples with its own indexes. Positions in postings are offsets
/// into `triples`, ascending.
#[derive(Debug, Default)]
struct Segment {
    triples: Vec<Triple>,
    by_subject: HashMap<String, Postings>,
    by_predicate: HashMap<String, Postings>,
    by_subj_pred: HashMap<String, HashMap<String, Postings>>,
    by_pred_obj: HashMap<String, HashMap<Object, Postings>>,
}

impl Segment {
    fn len(&self) -> usize {
        self.triples.len()
    }

    fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    fn push(&mut self, t: Triple) {
        let pos = self.triples.len();
        self.by_subject
            .entry(t.subject().to_string())
            .or_default()
            .push(pos);
        self.by_predicate
            .entry(t.predicate().to_string())
            .or_default()
            .push(pos);
        self.by_subj_pred
            .entry(t.subject().to_string())
            .or_default()
            .entry(t.predicate().to_string())
            .or_default()
            .push(pos);
        self.by_pred_obj
            .entry(t.predicate().to_string())
            .or_default()
            .entry(t.object().clone())
            .or_default()
            .push(pos);
        self.triples.push(t);
    }

    /// Builds a new segment holding `older` followed by `newer`.
    fn merged(older: &Segment, newer: &Segment) -> Segment {
        let mut out = Segment::default();
        out.triples.reserve(older.len() + newer.len());
        for t in older.triples.iter().chain(newer.triples.iter()) {
            out.push(t.clone());
        }
        out
    }

    fn resolve<'a>(&'a self, postings: Option<&'a Postings>) -> impl Iterator<Item = &'a Triple> {
        postings
            .into_iter()
            .flatten()
            .map(move |&pos| &self.triples[pos])
    }

    fn subject(&self, s: &str) -> impl Iterator<Item = &Triple> {
        self.resolve(self.by_subject.get(s))
    }

    fn predicate(&self, p: &str) -> impl Iterator<Item = &Triple> {
        self.resolve(self.by_predicate.get(p))
    }

    fn subj_pred(&self, s: &str, p: &str) -> impl Iterator<Item = &Triple> {
        self.resolve(self.by_subj_pred.get(s).and_then(|m| m.get(p)))
    }

    fn pred_obj(&self, p: &str, o: &Object) -> impl Iterator<Item = &Triple> {
        self.resolve(self.by_pred_obj.get(p).and_then(|m| m.get(o)))
    }
}

/// The mutable accumulator. There is exactly one writer per `Source`;
/// readers work from [`Snapshot`]s.
#[derive(Debug, Default)]
pub struct Source {
    sealed: Vec<Arc<Segment>>,
    tail: Segment,
}

impl Source {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every triple and indexes it. Duplicates are kept.
    pub fn add<I>(&mut self, triples: I)
    where
        I: IntoIterator<Item = Triple>,
    {
        for t in triples {
            self.tail.push(t);
        }
    }

    /// Number of triples added so far.
    pub fn len(&self) -> usize {
        self.sealed.iter().map(|s| s.len()).sum::<usize>() + self.tail.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freezes the triples added so far into an immutable view.
    pub fn snapshot(&mut self) -> Snapshot {
        self.seal();
        let count = self.sealed.iter().map(|s| s.len()).sum();
        Snapshot {
            segments: self.sealed.clone(),
            count,
        }
    }

    fn seal(&mut self) {
        if self.tail.is_empty() {
            return;
        }
        let tail = std::mem::take(&mut self.tail);
        debug!("sealing segment of {} triples", tail.len());
        self.sealed.push(Arc::new(tail));
        // keep segment sizes decreasing so lookups touch O(log n) segments
        while self.sealed.len() >= 2 {
            let n = self.sealed.len();
            if self.sealed[n - 1].len() < self.sealed[n - 2].len() {
                break;
            }
            let (Some(newer), Some(older)) = (self.sealed.pop(), self.sealed.pop()) else {
                break;
            };
            debug!(
                "merging segments of {} and {} triples",
                older.len(),
                newer.len()
            );
            self.sealed.push(Arc::new(Segment::merged(&older, &newer)));
        }
    }
}

impl Extend<Triple> for Source {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.add(iter)
    }
}

/// An immutable, point-in-time view of a [`Source`].
///
/// Query results are in insertion order and never change, whatever the
/// source does afterwards. Cloning is cheap and clones can be handed to
/// other threads.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    segments: Vec<Arc<Segment>>,
    count: usize,
}

impl Snapshot {
    /// Total number of triples in the view.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Every triple, in insertion order.
    pub fn triples(&self) -> impl Iterator<Item = &Triple> {
        self.segments.iter().flat_map(|s| s.triples.iter())
    }

    /// Triples whose predicate is `predicate` and whose object equals `object`.
    pub fn with_pred_obj(&self, predicate: &str, object: &Object) -> Vec<&Triple> {
        self.segments
            .iter()
            .flat_map(|s| s.pred_obj(predicate, object))
            .collect()
    }

    pub fn with_subject(&self, subject: &str) -> Vec<&Triple> {
        self.segments
            .iter()
            .flat_map(|s| s.subject(subject))
            .collect()
    }

    pub fn with_predicate(&self, predicate: &str) -> Vec<&Triple> {
        self.segments
            .iter()
            .flat_map(|s| s.predicate(predicate))
            .collect()
    }

    pub fn with_subj_pred(&self, subject: &str, predicate: &str) -> Vec<&Triple> {
        self.segments
            .iter()
            .flat_map(|s| s.subj_pred(subject, predicate))
            .collect()
    }
}
