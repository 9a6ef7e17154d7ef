//! A small SQL front end: a hand-written lexer and a backtracking
//! recursive-descent parser for `CREATE TABLE`, `INSERT` and `SELECT`,
//! plus an in-memory backend that executes the parsed statements.

pub mod backend;
pub mod error;
pub mod sql;

pub use error::{Error, LexError, ParseError};
pub use sql::{ast::Ast, parser::parse, scanner::lex};
