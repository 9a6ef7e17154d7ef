use super::token::Token;

/// Parsed statements, in source order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ast {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    CreateTable(CreateTableStatement),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectStatement {
    pub items: Vec<Expression>,
    pub from: Option<Token>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertStatement {
    pub table: Token,
    pub values: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTableStatement {
    pub name: Token,
    pub columns: Vec<ColumnDefinition>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDefinition {
    pub name: Token,
    /// Always a keyword token; whether it names a known type is decided at
    /// execution time.
    pub datatype: Token,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    /// An identifier, numeric or string token.
    Literal(Token),
}
