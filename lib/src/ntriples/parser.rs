//! Statement-level N-Triples parser.
//!
//! Grammar, one statement per triple:
//!
//! ```text
//! statement := IRI IRI (IRI | LITERAL [DATATYPE]) '.'
//! ```
//!
//! Whitespace and comments between tokens are ignored. The parser yields one
//! `Result` per statement; after a bad statement it skips to the next `.` or
//! the next line and carries on.

use log::warn;

use crate::consts::xsd_tag_for_iri;
use crate::errors::{Error, Expected, Result};
use crate::model::{Literal, Object, Triple};
use crate::ntriples::lexer::{Lexer, Spanned, Token};

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    peeked: Option<Spanned<'a>>,
}

/// Maps the canonical XSD IRIs back to short tags; any other datatype IRI is
/// kept as written.
fn literal_type(datatype: &str) -> &str {
    xsd_tag_for_iri(datatype).unwrap_or(datatype)
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            lexer: Lexer::new(input),
            peeked: None,
        }
    }

    /// Next token that is not whitespace or a comment.
    fn next_significant(&mut self) -> Spanned<'a> {
        if let Some(tok) = self.peeked.take() {
            return tok;
        }
        loop {
            let tok = self.lexer.next_token();
            match tok.token {
                Token::Whitespace | Token::Comment(_) => continue,
                _ => return tok,
            }
        }
    }

    fn statement(
        &mut self,
        first: Spanned<'a>,
    ) -> std::result::Result<Triple, (Expected, Spanned<'a>)> {
        let subject = match first.token {
            Token::Iri(s) => s,
            _ => return Err((Expected::Subject, first)),
        };
        let tok = self.next_significant();
        let predicate = match tok.token {
            Token::Iri(p) => p,
            _ => return Err((Expected::Predicate, tok)),
        };
        let tok = self.next_significant();
        let object = match tok.token {
            Token::Iri(o) => Object::Resource(o.to_string()),
            Token::Literal(value) => {
                let next = self.next_significant();
                match next.token {
                    Token::Datatype(dt) => Literal::new(literal_type(dt), value).into(),
                    _ => {
                        self.peeked = Some(next);
                        Literal::string(value).into()
                    }
                }
            }
            _ => return Err((Expected::Object, tok)),
        };
        let tok = self.next_significant();
        match tok.token {
            Token::FullStop => Ok(Triple::new(subject, predicate, object)),
            _ => Err((Expected::FullStop, tok)),
        }
    }

    /// Drops tokens up to the next `.` (consumed) or the first token on a
    /// line after `line` (kept).
    fn recover(&mut self, line: usize) {
        loop {
            let tok = self.next_significant();
            match tok.token {
                Token::FullStop => return,
                Token::End => {
                    self.peeked = Some(tok);
                    return;
                }
                _ if tok.position.line > line => {
                    self.peeked = Some(tok);
                    return;
                }
                _ => {}
            }
        }
    }
}

impl Iterator for Parser<'_> {
    type Item = Result<Triple>;

    fn next(&mut self) -> Option<Self::Item> {
        let first = self.next_significant();
        if first.token == Token::End {
            return None;
        }
        let start_line = first.position.line;
        match self.statement(first) {
            Ok(t) => Some(Ok(t)),
            Err((expected, offending)) => {
                let err = Error::Syntax {
                    expected,
                    found: offending.token.describe(),
                    position: offending.position,
                };
                warn!("skipping malformed statement: {}", err);
                match offending.token {
                    Token::FullStop => {}
                    Token::End => self.peeked = Some(offending),
                    _ if offending.position.line > start_line => self.peeked = Some(offending),
                    _ => self.recover(offending.position.line),
                }
                Some(Err(err))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::XSD_INTEGER;
    use crate::errors::Position;
    use crate::model::SubjPred;

    fn parse_all(input: &str) -> Vec<Result<Triple>> {
        Parser::new(input).collect()
    }

    fn parse_ok(input: &str) -> Vec<Triple> {
        Parser::new(input).collect::<Result<Vec<_>>>().unwrap()
    }

    #[test]
    fn resources_and_plain_literals() {
        let got = parse_ok("<sub> <pred> <lol> .\n<sub2> <pred2> \"lol2\" .");
        assert_eq!(
            got,
            vec![
                SubjPred::new("sub", "pred").resource("lol"),
                SubjPred::new("sub2", "pred2").string_literal("lol2"),
            ]
        );
    }

    #[test]
    fn custom_datatypes_are_kept() {
        let got = parse_ok("<sub> <pred> \"2\"^^<myinteger> .\n<sub2> <pred2> <lol2> .");
        assert_eq!(
            got,
            vec![
                SubjPred::new("sub", "pred").object(Literal::new("myinteger", "2").into()),
                SubjPred::new("sub2", "pred2").resource("lol2"),
            ]
        );
    }

    #[test]
    fn xsd_datatypes_map_to_tags() {
        let got = parse_ok(
            "<s> <p> \"3\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n\
             <s> <p> \"x\"^^<http://www.w3.org/2001/XMLSchema#string> .",
        );
        assert_eq!(got[0].object().literal().unwrap().datatype(), XSD_INTEGER);
        assert_eq!(got[1], SubjPred::new("s", "p").string_literal("x"));
    }

    #[test]
    fn comments_and_compact_spacing() {
        let got = parse_ok(
            "# header\n<s><p>\"lit\".#trailing\n\n   <s> <p> <o> . # done\n# footer",
        );
        assert_eq!(got.len(), 2);
        assert_eq!(got[0], SubjPred::new("s", "p").string_literal("lit"));
    }

    #[test]
    fn empty_and_comment_only_documents() {
        assert!(parse_all("").is_empty());
        assert!(parse_all("  \n# nothing here\n").is_empty());
    }

    #[test]
    fn missing_tokens_are_reported() {
        let cases = [
            ("\"s\" <p> <o> .", Expected::Subject),
            ("<s> \"p\" <o> .", Expected::Predicate),
            ("<s> <p> .", Expected::Object),
            ("<s> <p> <o>", Expected::FullStop),
            ("<s> <p> \"o\" <x> .", Expected::FullStop),
        ];
        for (input, want) in cases {
            let results = parse_all(input);
            match results.first() {
                Some(Err(Error::Syntax { expected, .. })) => {
                    assert_eq!(*expected, want, "input {input:?}")
                }
                other => panic!("input {input:?}: expected syntax error, got {other:?}"),
            }
        }
    }

    #[test]
    fn errors_carry_positions() {
        let results = parse_all("<a> <b> <c> .\n<d> <e> .");
        match &results[1] {
            Err(Error::Syntax {
                expected,
                found,
                position,
            }) => {
                assert_eq!(*expected, Expected::Object);
                assert_eq!(found, "'.'");
                assert_eq!(*position, Position { line: 2, column: 9 });
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn parsing_resumes_after_a_bad_statement() {
        let input = "<a> <b> <c> .\n\
                     <d> \"bad\" <f> .\n\
                     <g> <h> <i>\n\
                     <j> <k> <l> .";
        let results = parse_all(input);
        let oks: Vec<_> = results.iter().filter_map(|r| r.as_ref().ok()).collect();
        let errs = results.iter().filter(|r| r.is_err()).count();
        assert_eq!(errs, 2);
        assert_eq!(
            oks,
            vec![
                &SubjPred::new("a", "b").resource("c"),
                &SubjPred::new("j", "k").resource("l"),
            ]
        );
    }

    #[test]
    fn unterminated_tokens_fail() {
        let results = parse_all("<s> <p> \"never closed .");
        assert_eq!(results.len(), 1);
        match &results[0] {
            Err(Error::Syntax { expected, found, .. }) => {
                assert_eq!(*expected, Expected::Object);
                assert_eq!(found, "unterminated literal");
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }
}
