use tracing::debug;

use super::{
    ast::{
        Ast, ColumnDefinition, CreateTableStatement, Expression, InsertStatement,
        SelectStatement, Statement,
    },
    keywords::{Keyword, Symbol},
    scanner,
    token::{Token, TokenKind},
};
use crate::error::{ParseError, Result};

/// An alternative that did not match. Carries the first diagnostic raised
/// while it was tried, if it got far enough to produce one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rejected {
    pub diagnostic: Option<ParseError>,
}

impl Rejected {
    fn into_error(self, tokens: &[Token], cursor: usize, expected: &str) -> ParseError {
        self.diagnostic
            .unwrap_or_else(|| ParseError::at(tokens, cursor, expected))
    }
}

/// Outcome of a sub-parser: the node and the cursor just past it. On `Err`
/// the caller keeps the cursor it passed in.
pub type Parsed<T> = std::result::Result<(T, usize), Rejected>;

fn reject(tokens: &[Token], cursor: usize, expected: &str) -> Rejected {
    let diagnostic = ParseError::at(tokens, cursor, expected);
    debug!("{diagnostic}");
    Rejected {
        diagnostic: Some(diagnostic),
    }
}

fn expect_token(tokens: &[Token], cursor: usize, expected: &Token) -> bool {
    tokens.get(cursor).is_some_and(|token| token == expected)
}

fn parse_token(tokens: &[Token], cursor: usize, kind: TokenKind) -> Option<(Token, usize)> {
    tokens
        .get(cursor)
        .filter(|token| token.kind == kind)
        .map(|token| (token.clone(), cursor + 1))
}

/// Lexes and parses `source`. Every statement must be followed by at least
/// one `;`. The first failure aborts the whole batch.
pub fn parse(source: &str) -> Result<Ast> {
    let tokens = scanner::lex(source)?;
    let semicolon = Token::from_symbol(Symbol::Semicolon);

    let mut ast = Ast::default();
    let mut cursor = 0;
    while cursor < tokens.len() {
        let (statement, next) = parse_statement(&tokens, cursor, &semicolon)
            .map_err(|rejected| rejected.into_error(&tokens, cursor, "expected statement"))?;
        cursor = next;
        ast.statements.push(statement);

        let mut delimited = false;
        while expect_token(&tokens, cursor, &semicolon) {
            cursor += 1;
            delimited = true;
        }
        if !delimited {
            let error = ParseError::at(&tokens, cursor, "expected semicolon");
            debug!("{error}");
            return Err(error.into());
        }
    }

    Ok(ast)
}

/// Tries SELECT, INSERT and CREATE TABLE in that order, each from `cursor`.
pub fn parse_statement(tokens: &[Token], cursor: usize, delimiter: &Token) -> Parsed<Statement> {
    let mut first = Rejected::default();

    match parse_select_statement(tokens, cursor, delimiter) {
        Ok((select, next)) => return Ok((Statement::Select(select), next)),
        Err(rejected) => first.diagnostic = first.diagnostic.or(rejected.diagnostic),
    }
    match parse_insert_statement(tokens, cursor) {
        Ok((insert, next)) => return Ok((Statement::Insert(insert), next)),
        Err(rejected) => first.diagnostic = first.diagnostic.or(rejected.diagnostic),
    }
    match parse_create_table_statement(tokens, cursor) {
        Ok((create, next)) => return Ok((Statement::CreateTable(create), next)),
        Err(rejected) => first.diagnostic = first.diagnostic.or(rejected.diagnostic),
    }

    Err(first)
}

/// `SELECT <expr>[, <expr>]* [FROM <identifier>]`
pub fn parse_select_statement(
    tokens: &[Token],
    initial: usize,
    delimiter: &Token,
) -> Parsed<SelectStatement> {
    let mut cursor = initial;
    if !expect_token(tokens, cursor, &Token::from_keyword(Keyword::Select)) {
        return Err(Rejected::default());
    }
    cursor += 1;

    let from_keyword = Token::from_keyword(Keyword::From);
    let (items, next) =
        parse_expressions(tokens, cursor, &[from_keyword.clone(), delimiter.clone()])?;
    cursor = next;

    let mut from = None;
    if expect_token(tokens, cursor, &from_keyword) {
        cursor += 1;
        let (table, next) = parse_token(tokens, cursor, TokenKind::Identifier)
            .ok_or_else(|| reject(tokens, cursor, "expected table name"))?;
        from = Some(table);
        cursor = next;
    }

    Ok((SelectStatement { items, from }, cursor))
}

/// `INSERT INTO <identifier> VALUES ( <expr>[, <expr>]* )`
pub fn parse_insert_statement(tokens: &[Token], initial: usize) -> Parsed<InsertStatement> {
    let mut cursor = initial;
    if !expect_token(tokens, cursor, &Token::from_keyword(Keyword::Insert)) {
        return Err(Rejected::default());
    }
    cursor += 1;

    if !expect_token(tokens, cursor, &Token::from_keyword(Keyword::Into)) {
        return Err(reject(tokens, cursor, "expected into"));
    }
    cursor += 1;

    let (table, next) = parse_token(tokens, cursor, TokenKind::Identifier)
        .ok_or_else(|| reject(tokens, cursor, "expected table name"))?;
    cursor = next;

    if !expect_token(tokens, cursor, &Token::from_keyword(Keyword::Values)) {
        return Err(reject(tokens, cursor, "expected values"));
    }
    cursor += 1;

    let right_paren = Token::from_symbol(Symbol::RightParen);
    if !expect_token(tokens, cursor, &Token::from_symbol(Symbol::LeftParen)) {
        return Err(reject(tokens, cursor, "expected left paren"));
    }
    cursor += 1;

    let (values, next) = parse_expressions(tokens, cursor, std::slice::from_ref(&right_paren))?;
    cursor = next;

    if !expect_token(tokens, cursor, &right_paren) {
        return Err(reject(tokens, cursor, "expected right paren"));
    }
    cursor += 1;

    Ok((InsertStatement { table, values }, cursor))
}

/// `CREATE TABLE <identifier> ( <identifier> <keyword>[, ...]* )`
pub fn parse_create_table_statement(
    tokens: &[Token],
    initial: usize,
) -> Parsed<CreateTableStatement> {
    let mut cursor = initial;
    if !expect_token(tokens, cursor, &Token::from_keyword(Keyword::Create)) {
        return Err(Rejected::default());
    }
    cursor += 1;

    if !expect_token(tokens, cursor, &Token::from_keyword(Keyword::Table)) {
        return Err(reject(tokens, cursor, "expected table"));
    }
    cursor += 1;

    let (name, next) = parse_token(tokens, cursor, TokenKind::Identifier)
        .ok_or_else(|| reject(tokens, cursor, "expected table name"))?;
    cursor = next;

    let right_paren = Token::from_symbol(Symbol::RightParen);
    if !expect_token(tokens, cursor, &Token::from_symbol(Symbol::LeftParen)) {
        return Err(reject(tokens, cursor, "expected left parenthesis"));
    }
    cursor += 1;

    let (columns, next) = parse_column_definitions(tokens, cursor, &right_paren)?;
    cursor = next;

    if !expect_token(tokens, cursor, &right_paren) {
        return Err(reject(tokens, cursor, "expected right parenthesis"));
    }
    cursor += 1;

    Ok((CreateTableStatement { name, columns }, cursor))
}

fn parse_column_definitions(
    tokens: &[Token],
    initial: usize,
    delimiter: &Token,
) -> Parsed<Vec<ColumnDefinition>> {
    let comma = Token::from_symbol(Symbol::Comma);
    let mut cursor = initial;
    let mut columns = Vec::new();

    loop {
        let Some(current) = tokens.get(cursor) else {
            return Err(reject(tokens, cursor, &format!("expected {}", delimiter.value)));
        };
        if current == delimiter {
            break;
        }

        if !columns.is_empty() {
            if !expect_token(tokens, cursor, &comma) {
                return Err(reject(tokens, cursor, "expected comma"));
            }
            cursor += 1;
        }

        let (name, next) = parse_token(tokens, cursor, TokenKind::Identifier)
            .ok_or_else(|| reject(tokens, cursor, "expected column name"))?;
        cursor = next;

        let (datatype, next) = parse_token(tokens, cursor, TokenKind::Keyword)
            .ok_or_else(|| reject(tokens, cursor, "expected column type"))?;
        cursor = next;

        columns.push(ColumnDefinition { name, datatype });
    }

    Ok((columns, cursor))
}

/// Comma separated expressions, ending in front of the first of `delimiters`.
/// The delimiter itself is not consumed.
pub fn parse_expressions(
    tokens: &[Token],
    initial: usize,
    delimiters: &[Token],
) -> Parsed<Vec<Expression>> {
    let comma = Token::from_symbol(Symbol::Comma);
    let mut cursor = initial;
    let mut expressions = Vec::new();

    loop {
        let Some(current) = tokens.get(cursor) else {
            let expected = delimiters
                .iter()
                .map(|d| d.value.as_str())
                .collect::<Vec<_>>()
                .join(" or ");
            return Err(reject(tokens, cursor, &format!("expected {expected}")));
        };
        if delimiters.contains(current) {
            break;
        }

        if !expressions.is_empty() {
            if !expect_token(tokens, cursor, &comma) {
                return Err(reject(tokens, cursor, "expected comma"));
            }
            cursor += 1;
        }

        let (expression, next) = parse_expression(tokens, cursor)
            .ok_or_else(|| reject(tokens, cursor, "expected expression"))?;
        cursor = next;
        expressions.push(expression);
    }

    Ok((expressions, cursor))
}

/// A single literal: identifier, number or string, tried in that order.
pub fn parse_expression(tokens: &[Token], cursor: usize) -> Option<(Expression, usize)> {
    [TokenKind::Identifier, TokenKind::Numeric, TokenKind::String]
        .into_iter()
        .find_map(|kind| parse_token(tokens, cursor, kind))
        .map(|(token, next)| (Expression::Literal(token), next))
}
