use bytes::{Buf, BufMut, Bytes, BytesMut};
use thiserror::Error;

use crate::sql::{
    ast::{CreateTableStatement, InsertStatement, SelectStatement},
    keywords::{self, Keyword},
    token::Token,
};

pub mod memory;

pub use memory::MemoryBackend;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("table {0} already exists")]
    TableAlreadyExists(String),
    #[error("table {0} does not exist")]
    TableDoesNotExist(String),
    #[error("column {0} does not exist")]
    ColumnDoesNotExist(String),
    #[error("select item {0} is not a column name")]
    InvalidSelectItem(String),
    #[error("invalid datatype {0}")]
    InvalidDatatype(String),
    #[error("expected {expected} values, got {got}")]
    MissingValues { expected: usize, got: usize },
    #[error("value {value} does not fit a {column_type} column")]
    InvalidCell { value: String, column_type: ColumnType },
    #[error("select needs a from clause")]
    MissingFrom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Text,
}

impl ColumnType {
    /// Resolves a column definition's datatype keyword.
    pub fn from_token(datatype: &Token) -> Result<Self, BackendError> {
        match keywords::get(&datatype.value) {
            Some(Keyword::Int) => Ok(ColumnType::Int),
            Some(Keyword::Text) => Ok(ColumnType::Text),
            _ => Err(BackendError::InvalidDatatype(datatype.value.clone())),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ColumnType::Int => write!(f, "int"),
            ColumnType::Text => write!(f, "text"),
        }
    }
}

/// A stored value. Ints are 4 big-endian bytes, text is UTF-8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell(Bytes);

impl Cell {
    pub fn from_int(value: i32) -> Self {
        let mut buf = BytesMut::with_capacity(4);
        buf.put_i32(value);
        Cell(buf.freeze())
    }

    pub fn from_text(value: &str) -> Self {
        Cell(Bytes::copy_from_slice(value.as_bytes()))
    }

    pub fn as_int(&self) -> Option<i32> {
        if self.0.len() != 4 {
            return None;
        }
        Some(self.0.clone().get_i32())
    }

    pub fn as_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Renders the cell according to its column's type.
    pub fn render(&self, column_type: ColumnType) -> String {
        match column_type {
            ColumnType::Int => self.as_int().map(|v| v.to_string()).unwrap_or_default(),
            ColumnType::Text => self.as_text().unwrap_or_default().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultColumn {
    pub name: String,
    pub column_type: ColumnType,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResults {
    pub columns: Vec<ResultColumn>,
    pub rows: Vec<Vec<Cell>>,
}

/// Executes parsed statements. Statements are handed over by value.
pub trait Backend {
    fn create_table(&mut self, statement: CreateTableStatement) -> Result<(), BackendError>;
    fn insert(&mut self, statement: InsertStatement) -> Result<(), BackendError>;
    fn select(&self, statement: SelectStatement) -> Result<QueryResults, BackendError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::token::{Location, TokenKind};

    #[test]
    fn int_cells_are_big_endian() {
        let cell = Cell::from_int(258);
        assert_eq!(&cell.0[..], &[0u8, 0, 1, 2]);
        assert_eq!(cell.as_int(), Some(258));
        assert_eq!(cell.render(ColumnType::Int), "258");
        assert_eq!(Cell::from_int(-7).as_int(), Some(-7));
    }

    #[test]
    fn text_cells() {
        let cell = Cell::from_text("Alice");
        assert_eq!(cell.as_text(), Some("Alice"));
        assert_eq!(cell.as_int(), None);
    }

    #[test]
    fn datatype_resolution() {
        let token = |v: &str| Token::new(v, TokenKind::Keyword, Location::default());
        assert_eq!(ColumnType::from_token(&token("int")), Ok(ColumnType::Int));
        assert_eq!(ColumnType::from_token(&token("text")), Ok(ColumnType::Text));
        assert_eq!(
            ColumnType::from_token(&token("from")),
            Err(BackendError::InvalidDatatype("from".to_string()))
        );
    }
}
