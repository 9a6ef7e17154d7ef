#![allow(dead_code)]

use minisql::{
    sql::{
        ast::{Expression, Statement},
        token::{Token, TokenKind},
    },
    Error,
};

pub fn lex_ok(source: &str) -> Vec<Token> {
    minisql::lex(source).unwrap_or_else(|e| panic!("Failed to lex: {source}\nError: {e}"))
}

pub fn parse_ok(source: &str) -> Vec<Statement> {
    minisql::parse(source)
        .unwrap_or_else(|e| panic!("Failed to parse: {source}\nError: {e}"))
        .statements
}

pub fn parse_one(source: &str) -> Statement {
    let mut statements = parse_ok(source);
    assert_eq!(statements.len(), 1, "expected one statement in: {source}");
    statements.remove(0)
}

pub fn parse_err(source: &str) -> Error {
    minisql::parse(source).expect_err(&format!("Expected error for: {source}"))
}

/// `(kind, value)` pairs, which is what token equality looks at.
pub fn kinds_and_values(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
    tokens.iter().map(|t| (t.kind, t.value.as_str())).collect()
}

pub fn literal(expression: &Expression) -> (TokenKind, &str) {
    let Expression::Literal(token) = expression;
    (token.kind, token.value.as_str())
}
