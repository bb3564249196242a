//! Literal type tags understood by the store and the XSD datatype IRIs they
//! correspond to in N-Triples.

pub const XSD_STRING: &str = "xsd:string";
pub const XSD_BOOLEAN: &str = "xsd:boolean";
pub const XSD_INTEGER: &str = "xsd:integer";
pub const XSD_DATE_TIME: &str = "xsd:dateTime";
pub const XSD_FLOAT: &str = "xsd:float";

pub const XSD_NAMESPACE: &str = "http://www.w3.org/2001/XMLSchema#";

// full datatype IRIs
pub const XSD_STRING_IRI: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const XSD_BOOLEAN_IRI: &str = "http://www.w3.org/2001/XMLSchema#boolean";
pub const XSD_INTEGER_IRI: &str = "http://www.w3.org/2001/XMLSchema#integer";
pub const XSD_DATE_TIME_IRI: &str = "http://www.w3.org/2001/XMLSchema#dateTime";
pub const XSD_FLOAT_IRI: &str = "http://www.w3.org/2001/XMLSchema#float";

const TAG_IRIS: [(&str, &str); 5] = [
    (XSD_STRING, XSD_STRING_IRI),
    (XSD_BOOLEAN, XSD_BOOLEAN_IRI),
    (XSD_INTEGER, XSD_INTEGER_IRI),
    (XSD_DATE_TIME, XSD_DATE_TIME_IRI),
    (XSD_FLOAT, XSD_FLOAT_IRI),
];

/// Returns the full XSD IRI for a known short tag such as `xsd:integer`.
pub fn xsd_iri_for_tag(tag: &str) -> Option<&'static str> {
    TAG_IRIS.iter().find(|(t, _)| *t == tag).map(|(_, iri)| *iri)
}

/// Returns the short tag for a known XSD IRI; the inverse of [`xsd_iri_for_tag`].
pub fn xsd_tag_for_iri(iri: &str) -> Option<&'static str> {
    TAG_IRIS.iter().find(|(_, i)| *i == iri).map(|(tag, _)| *tag)
}
