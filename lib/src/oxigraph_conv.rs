//! Conversions to and from `oxigraph` triples (feature `oxigraph`).
//!
//! Subjects, predicates and resource ids must be absolute IRIs, or `_:label`
//! blank nodes in subject and object position. Short XSD tags are expanded to
//! their IRIs; any other literal type must itself be an IRI. Language-tagged
//! literals have no counterpart here and are rejected.

use oxigraph::model::{
    BlankNode, Graph, Literal as OxLiteral, NamedNode, NamedOrBlankNode, NamedOrBlankNodeRef,
    Term, Triple as OxTriple, TripleRef,
};

use crate::consts::{xsd_iri_for_tag, xsd_tag_for_iri};
use crate::errors::{Error, Result};
use crate::model::{Literal, Object, Triple};
use crate::store::Snapshot;

fn named_node(iri: &str, what: &str) -> Result<NamedNode> {
    NamedNode::new(iri).map_err(|e| Error::Interop(format!("invalid {} IRI <{}>: {}", what, iri, e)))
}

fn named_or_blank(id: &str, what: &str) -> Result<NamedOrBlankNode> {
    match id.strip_prefix("_:") {
        Some(label) => BlankNode::new(label)
            .map(Into::into)
            .map_err(|e| Error::Interop(format!("invalid {} blank node {}: {}", what, id, e))),
        None => named_node(id, what).map(Into::into),
    }
}

fn blank_or_iri_str(node: NamedOrBlankNodeRef<'_>) -> String {
    match node {
        NamedOrBlankNodeRef::NamedNode(n) => n.as_str().to_string(),
        NamedOrBlankNodeRef::BlankNode(b) => format!("_:{}", b.as_str()),
    }
}

pub fn to_oxigraph_triple(t: &Triple) -> Result<OxTriple> {
    let subject = named_or_blank(t.subject(), "subject")?;
    let predicate = named_node(t.predicate(), "predicate")?;
    let object: Term = match t.object() {
        Object::Resource(id) => match named_or_blank(id, "object")? {
            NamedOrBlankNode::NamedNode(n) => n.into(),
            NamedOrBlankNode::BlankNode(b) => b.into(),
        },
        Object::Literal(lit) => {
            let dt = xsd_iri_for_tag(lit.datatype()).unwrap_or(lit.datatype());
            OxLiteral::new_typed_literal(lit.value(), named_node(dt, "datatype")?).into()
        }
    };
    Ok(OxTriple::new(subject, predicate, object))
}

pub fn from_oxigraph_triple(t: TripleRef<'_>) -> Result<Triple> {
    let object = match t.object {
        oxigraph::model::TermRef::NamedNode(n) => Object::Resource(n.as_str().to_string()),
        oxigraph::model::TermRef::BlankNode(b) => Object::Resource(format!("_:{}", b.as_str())),
        oxigraph::model::TermRef::Literal(lit) => {
            if let Some(lang) = lit.language() {
                return Err(Error::Interop(format!(
                    "language-tagged literal \"{}\"@{} has no literal type",
                    lit.value(),
                    lang
                )));
            }
            let dt = lit.datatype().as_str();
            Object::Literal(Literal::new(xsd_tag_for_iri(dt).unwrap_or(dt), lit.value()))
        }
        #[allow(unreachable_patterns)]
        other => {
            return Err(Error::Interop(format!(
                "unsupported object term {}",
                other
            )))
        }
    };
    Ok(Triple::new(
        blank_or_iri_str(t.subject),
        t.predicate.as_str(),
        object,
    ))
}

/// Copies every triple of `snap` into an oxigraph [`Graph`].
pub fn to_oxigraph_graph(snap: &Snapshot) -> Result<Graph> {
    let mut g = Graph::new();
    for t in snap.triples() {
        g.insert(&to_oxigraph_triple(t)?);
    }
    Ok(g)
}
