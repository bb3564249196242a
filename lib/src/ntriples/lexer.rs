//! Character-level tokenizer for N-Triples.
//!
//! IRIs and quoted literals are read by scanning for their closing character.
//! A backslash always takes the next character with it, uninterpreted. A
//! closing character only ends the token when the next non-whitespace
//! character is end of input or one of `.`, `<`, `"`, `^`; otherwise it is
//! part of the content. That lets `<sub>ject>` read as the IRI `sub>ject`.

use crate::errors::Position;

/// Characters that may follow a real closing `>` or `"`, after optional
/// whitespace.
const DELIMITERS: [char; 4] = ['.', '<', '"', '^'];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// Body of `<...>`, escapes left as written.
    Iri(&'a str),
    /// Body of `"..."`, escapes left as written.
    Literal(&'a str),
    /// IRI of a `^^<...>` annotation.
    Datatype(&'a str),
    /// A run of whitespace.
    Whitespace,
    FullStop,
    /// Text after `#` up to the end of the line.
    Comment(&'a str),
    /// Input that cannot start or finish a token.
    Illegal(String),
    End,
}

impl Token<'_> {
    /// Short description used in syntax errors.
    pub fn describe(&self) -> String {
        match self {
            Token::Iri(s) => format!("IRI <{}>", s),
            Token::Literal(s) => format!("literal \"{}\"", s),
            Token::Datatype(s) => format!("datatype ^^<{}>", s),
            Token::Whitespace => "whitespace".to_string(),
            Token::FullStop => "'.'".to_string(),
            Token::Comment(_) => "comment".to_string(),
            Token::Illegal(m) => m.clone(),
            Token::End => "end of input".to_string(),
        }
    }
}

/// A token and where it starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Spanned<'a> {
    pub token: Token<'a>,
    pub position: Position,
}

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    column: usize,
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r'
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn here(&self) -> Position {
        Position {
            line: self.line,
            column: self.column,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn delimiter_follows(&self) -> bool {
        match self.input[self.pos..].chars().find(|c| !c.is_whitespace()) {
            None => true,
            Some(c) => DELIMITERS.contains(&c),
        }
    }

    /// Scans up to a real `terminator`, returning the content before it.
    /// `None` when the input or the line runs out first; the line break is
    /// left unread.
    fn read_bounded(&mut self, terminator: char) -> Option<&'a str> {
        let input = self.input;
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_line_break(c) {
                return None;
            }
            self.bump();
            if c == '\\' {
                if !matches!(self.peek(), Some(n) if is_line_break(n)) {
                    self.bump();
                }
                continue;
            }
            if c == terminator && self.delimiter_follows() {
                let end = self.pos - terminator.len_utf8();
                return Some(&input[start..end]);
            }
        }
        None
    }

    /// Reads an IRI body; the opening `<` must already be consumed.
    pub(crate) fn read_iri(&mut self) -> Option<&'a str> {
        self.read_bounded('>')
    }

    /// Reads a literal body; the opening `"` must already be consumed.
    pub(crate) fn read_string_literal(&mut self) -> Option<&'a str> {
        self.read_bounded('"')
    }

    fn read_datatype(&mut self) -> Token<'a> {
        if self.peek() != Some('^') {
            return Token::Illegal("expected '^^'".to_string());
        }
        self.bump();
        if self.peek() != Some('<') {
            return Token::Illegal("expected '<' after '^^'".to_string());
        }
        self.bump();
        match self.read_iri() {
            Some(iri) => Token::Datatype(iri),
            None => Token::Illegal("unterminated datatype IRI".to_string()),
        }
    }

    pub fn next_token(&mut self) -> Spanned<'a> {
        let position = self.here();
        let input = self.input;
        let token = match self.peek() {
            None => Token::End,
            Some(c) if c.is_whitespace() => {
                while matches!(self.peek(), Some(c) if c.is_whitespace()) {
                    self.bump();
                }
                Token::Whitespace
            }
            Some(c) => {
                self.bump();
                match c {
                    '<' => match self.read_iri() {
                        Some(iri) => Token::Iri(iri),
                        None => Token::Illegal("unterminated IRI".to_string()),
                    },
                    '"' => match self.read_string_literal() {
                        Some(lit) => Token::Literal(lit),
                        None => Token::Illegal("unterminated literal".to_string()),
                    },
                    '^' => self.read_datatype(),
                    '.' => Token::FullStop,
                    '#' => {
                        let start = self.pos;
                        while matches!(self.peek(), Some(c) if c != '\n' && c != '\r') {
                            self.bump();
                        }
                        Token::Comment(&input[start..self.pos])
                    }
                    other => Token::Illegal(format!("unexpected character {:?}", other)),
                }
            }
        };
        Spanned { token, position }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Spanned<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let tok = self.next_token();
        if tok.token == Token::End {
            return None;
        }
        Some(tok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Token::*;

    fn tokens(input: &str) -> Vec<Token<'_>> {
        Lexer::new(input).map(|s| s.token).collect()
    }

    #[test]
    fn single_tokens() {
        assert_eq!(tokens("<node>"), vec![Iri("node")]);
        assert_eq!(tokens("# comment"), vec![Comment(" comment")]);
        assert_eq!(tokens("\"lit\""), vec![Literal("lit")]);
        assert_eq!(tokens("^^<xsd:float>"), vec![Datatype("xsd:float")]);
        assert_eq!(tokens(" "), vec![Whitespace]);
        assert_eq!(tokens(" \t\n "), vec![Whitespace]);
        assert_eq!(tokens("."), vec![FullStop]);
        assert!(tokens("").is_empty());
    }

    #[test]
    fn escaped_and_embedded_terminators() {
        assert_eq!(tokens("<no>de>"), vec![Iri("no>de")]);
        assert_eq!(tokens(r"<no\>de>"), vec![Iri(r"no\>de")]);
        assert_eq!(tokens(r"<node\\>"), vec![Iri(r"node\\")]);
        assert_eq!(tokens(r#""\\""#), vec![Literal(r"\\")]);
        assert_eq!(tokens(r#""quot"ed""#), vec![Literal(r#"quot"ed"#)]);
        assert_eq!(tokens(r#""quot\"ed""#), vec![Literal(r#"quot\"ed"#)]);
        assert_eq!(tokens("<sub>ject>"), vec![Iri("sub>ject")]);
    }

    #[test]
    fn whole_statements() {
        assert_eq!(
            tokens("<sub> <pred> \"3\"^^<xsd:integer> ."),
            vec![
                Iri("sub"),
                Whitespace,
                Iri("pred"),
                Whitespace,
                Literal("3"),
                Datatype("xsd:integer"),
                Whitespace,
                FullStop
            ]
        );
        assert_eq!(
            tokens("<sub><pred>\"3\"^^<xsd:integer>."),
            vec![
                Iri("sub"),
                Iri("pred"),
                Literal("3"),
                Datatype("xsd:integer"),
                FullStop
            ]
        );
        assert_eq!(
            tokens("<sub> <pred> \"lit\" . # commenting"),
            vec![
                Iri("sub"),
                Whitespace,
                Iri("pred"),
                Whitespace,
                Literal("lit"),
                Whitespace,
                FullStop,
                Whitespace,
                Comment(" commenting")
            ]
        );
        assert_eq!(
            tokens("<sub><pred>\"lit\".#commenting"),
            vec![
                Iri("sub"),
                Iri("pred"),
                Literal("lit"),
                FullStop,
                Comment("commenting")
            ]
        );
    }

    #[test]
    fn read_iri_bodies() {
        let cases = [
            ("<", None),
            (">", Some("")),
            ("", None),
            ("z", None),
            ("subject>", Some("subject")),
            ("s  ubject>", Some("s  ubject")),
            ("subject>   <", Some("subject")),
            ("    subject>   <", Some("    subject")),
            ("subject><", Some("subject")),
            ("subje   ct><", Some("subje   ct")),
            ("sub>ject>", Some("sub>ject")),
            ("sub > ject>", Some("sub > ject")),
            ("sub>ject>      ", Some("sub>ject")),
            ("subject", None),
            ("pred>   \"", Some("pred")),
            ("pred>\"", Some("pred")),
            ("resource>.", Some("resource")),
            ("resource> .", Some("resource")),
            ("resource>> .", Some("resource>")),
            ("resource>  .   ", Some("resource")),
        ];
        for (input, want) in cases {
            assert_eq!(Lexer::new(input).read_iri(), want, "input {input:?}");
        }
    }

    #[test]
    fn read_literal_bodies() {
        let cases = [
            ("", None),
            ("\"", Some("")),
            ("z", None),
            ("lit\"", Some("lit")),
            ("l it\"", Some("l it")),
            ("li\"t\"", Some("li\"t")),
            ("li \"t\"", Some("li \"t")),
            ("li\"t\" .", Some("li\"t")),
            ("li\"t\".", Some("li\"t")),
            ("li\"t\"  .  ", Some("li\"t")),
            ("li\"t\"^", Some("li\"t")),
            ("li\"t\"^^", Some("li\"t")),
            ("li\"t\" ^", Some("li\"t")),
            ("li\"t\"     ^^", Some("li\"t")),
        ];
        for (input, want) in cases {
            assert_eq!(
                Lexer::new(input).read_string_literal(),
                want,
                "input {input:?}"
            );
        }
    }

    #[test]
    fn tokens_do_not_span_lines() {
        assert_eq!(Lexer::new("sub\nject>").read_iri(), None);
        assert_eq!(Lexer::new("li\r\nt\"").read_string_literal(), None);
        assert_eq!(Lexer::new("li\\\nt\"").read_string_literal(), None);

        let toks: Vec<_> = Lexer::new("\"chat\"@fr .\n<next>").collect();
        assert_eq!(toks[0].token, Illegal("unterminated literal".into()));
        assert_eq!(toks[1].token, Whitespace);
        assert_eq!(toks[2].token, Iri("next"));
        assert_eq!(toks[2].position, Position { line: 2, column: 1 });
    }

    #[test]
    fn positions_track_lines() {
        let toks: Vec<_> = Lexer::new("<a>\n  <b>").collect();
        assert_eq!(toks[0].position, Position { line: 1, column: 1 });
        assert_eq!(toks[2].position, Position { line: 2, column: 3 });
    }

    #[test]
    fn malformed_input_is_illegal() {
        assert_eq!(tokens("<open"), vec![Illegal("unterminated IRI".into())]);
        assert_eq!(
            tokens("\"open"),
            vec![Illegal("unterminated literal".into())]
        );
        assert_eq!(tokens("^<x>"), vec![Illegal("expected '^^'".into()), Iri("x")]);
        assert_eq!(
            tokens("_:b1"),
            vec![
                Illegal("unexpected character '_'".into()),
                Illegal("unexpected character ':'".into()),
                Illegal("unexpected character 'b'".into()),
                Illegal("unexpected character '1'".into()),
            ]
        );
    }
}
