use thiserror::Error;

use crate::sql::token::{Location, Token};

/// No sub-lexer accepted the input at `location`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "{}: unable to lex token{}",
    .location,
    .hint.as_ref().map(|previous| format!(" after {previous}")).unwrap_or_default()
)]
pub struct LexError {
    pub location: Location,
    /// Value of the last token produced before the failure, if any.
    pub hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{location}: {expected}, got: {got}")]
pub struct ParseError {
    pub location: Location,
    pub expected: String,
    pub got: String,
}

impl ParseError {
    /// Points at the token under `cursor`, or the last token once the cursor
    /// has run off the end.
    pub fn at(tokens: &[Token], cursor: usize, expected: &str) -> Self {
        let token = tokens.get(cursor).or_else(|| tokens.last());
        ParseError {
            location: token.map(|t| t.location).unwrap_or_default(),
            expected: expected.to_string(),
            got: token.map(|t| t.value.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

pub type Result<T> = std::result::Result<T, Error>;
