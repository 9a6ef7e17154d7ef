use std::fmt;

use super::keywords::{Keyword, Symbol};

/// Zero-based line and column of a token in the source text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    pub fn new(line: usize, column: usize) -> Self {
        Location { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Keyword,
    Symbol,
    Identifier,
    String,
    Numeric,
    Boolean,
    Null,
}

#[derive(Debug, Clone)]
pub struct Token {
    pub value: String,
    pub kind: TokenKind,
    pub location: Location,
}

impl Token {
    pub fn new(value: impl Into<String>, kind: TokenKind, location: Location) -> Self {
        Token {
            value: value.into(),
            kind,
            location,
        }
    }

    /// A location-less token used as a pattern when matching keywords.
    pub fn from_keyword(keyword: Keyword) -> Self {
        Token::new(keyword.as_str(), TokenKind::Keyword, Location::default())
    }

    pub fn from_symbol(symbol: Symbol) -> Self {
        Token::new(symbol.as_str(), TokenKind::Symbol, Location::default())
    }
}

// Location is not part of a token's identity.
impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value && self.kind == other.kind
    }
}

impl Eq for Token {}

/// Scanning state threaded by value through every sub-lexer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    pub position: usize,
    pub location: Location,
}

impl Cursor {
    /// Moves past `len` bytes that stay on the current line.
    pub fn advance(self, len: usize) -> Self {
        Cursor {
            position: self.position + len,
            location: Location::new(self.location.line, self.location.column + len),
        }
    }

    pub fn newline(self) -> Self {
        Cursor {
            position: self.position + 1,
            location: Location::new(self.location.line + 1, 0),
        }
    }
}
