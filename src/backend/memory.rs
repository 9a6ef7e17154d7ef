use std::collections::HashMap;

use tracing::debug;

use super::{Backend, BackendError, Cell, ColumnType, QueryResults, ResultColumn};
use crate::sql::{
    ast::{CreateTableStatement, Expression, InsertStatement, SelectStatement},
    token::{Token, TokenKind},
};

#[derive(Debug, Default)]
struct Table {
    columns: Vec<ResultColumn>,
    rows: Vec<Vec<Cell>>,
}

impl Table {
    fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|column| column.name == name)
    }
}

/// Keeps every table in memory for the lifetime of the process.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    tables: HashMap<String, Table>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn table(&self, name: &str) -> Result<&Table, BackendError> {
        self.tables
            .get(name)
            .ok_or_else(|| BackendError::TableDoesNotExist(name.to_string()))
    }
}

fn token_to_cell(token: &Token, column_type: ColumnType) -> Result<Cell, BackendError> {
    let invalid = || BackendError::InvalidCell {
        value: token.value.clone(),
        column_type,
    };
    match (token.kind, column_type) {
        (TokenKind::Numeric, ColumnType::Int) => token
            .value
            .parse::<i32>()
            .map(Cell::from_int)
            .map_err(|_| invalid()),
        (TokenKind::String, ColumnType::Text) => Ok(Cell::from_text(&token.value)),
        _ => Err(invalid()),
    }
}

impl Backend for MemoryBackend {
    fn create_table(&mut self, statement: CreateTableStatement) -> Result<(), BackendError> {
        let name = statement.name.value;
        if self.tables.contains_key(&name) {
            return Err(BackendError::TableAlreadyExists(name));
        }

        let columns = statement
            .columns
            .into_iter()
            .map(|column| {
                Ok(ResultColumn {
                    column_type: ColumnType::from_token(&column.datatype)?,
                    name: column.name.value,
                })
            })
            .collect::<Result<Vec<_>, BackendError>>()?;

        debug!(table = %name, columns = columns.len(), "created table");
        self.tables.insert(
            name,
            Table {
                columns,
                rows: Vec::new(),
            },
        );
        Ok(())
    }

    fn insert(&mut self, statement: InsertStatement) -> Result<(), BackendError> {
        let name = statement.table.value;
        let table = self
            .tables
            .get_mut(&name)
            .ok_or_else(|| BackendError::TableDoesNotExist(name.clone()))?;

        if statement.values.len() != table.columns.len() {
            return Err(BackendError::MissingValues {
                expected: table.columns.len(),
                got: statement.values.len(),
            });
        }

        let row = statement
            .values
            .iter()
            .zip(&table.columns)
            .map(|(Expression::Literal(token), column)| token_to_cell(token, column.column_type))
            .collect::<Result<Vec<_>, BackendError>>()?;

        table.rows.push(row);
        debug!(table = %name, rows = table.rows.len(), "inserted row");
        Ok(())
    }

    fn select(&self, statement: SelectStatement) -> Result<QueryResults, BackendError> {
        let from = statement.from.ok_or(BackendError::MissingFrom)?;
        let table = self.table(&from.value)?;

        let mut indexes = Vec::with_capacity(statement.items.len());
        let mut columns = Vec::with_capacity(statement.items.len());
        for Expression::Literal(token) in &statement.items {
            if token.kind != TokenKind::Identifier {
                return Err(BackendError::InvalidSelectItem(token.value.clone()));
            }
            let index = table
                .column_index(&token.value)
                .ok_or_else(|| BackendError::ColumnDoesNotExist(token.value.clone()))?;
            indexes.push(index);
            columns.push(table.columns[index].clone());
        }

        let rows = table
            .rows
            .iter()
            .map(|row| indexes.iter().map(|&i| row[i].clone()).collect())
            .collect();

        Ok(QueryResults { columns, rows })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::{ast::Statement, parser::parse};

    fn run(backend: &mut MemoryBackend, source: &str) -> Result<Option<QueryResults>, BackendError> {
        let mut results = None;
        for statement in parse(source).unwrap().statements {
            match statement {
                Statement::CreateTable(create) => backend.create_table(create)?,
                Statement::Insert(insert) => backend.insert(insert)?,
                Statement::Select(select) => results = Some(backend.select(select)?),
            }
        }
        Ok(results)
    }

    #[test]
    fn insert_then_select() {
        let mut backend = MemoryBackend::new();
        let results = run(
            &mut backend,
            "create table users (id int, name text);
             insert into users values (1, 'Alice');
             insert into users values (2, 'Bob');
             select name, id from users;",
        )
        .unwrap()
        .unwrap();

        assert_eq!(
            results.columns,
            vec![
                ResultColumn {
                    name: "name".to_string(),
                    column_type: ColumnType::Text
                },
                ResultColumn {
                    name: "id".to_string(),
                    column_type: ColumnType::Int
                },
            ]
        );
        let rendered: Vec<Vec<String>> = results
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .zip(&results.columns)
                    .map(|(cell, column)| cell.render(column.column_type))
                    .collect()
            })
            .collect();
        assert_eq!(rendered, vec![vec!["Alice", "1"], vec!["Bob", "2"]]);
    }

    #[test]
    fn duplicate_table() {
        let mut backend = MemoryBackend::new();
        run(&mut backend, "create table t (a int);").unwrap();
        assert_eq!(
            run(&mut backend, "create table t (a int);"),
            Err(BackendError::TableAlreadyExists("t".to_string()))
        );
    }

    #[test]
    fn unknown_datatype() {
        let mut backend = MemoryBackend::new();
        assert_eq!(
            run(&mut backend, "create table t (a values);"),
            Err(BackendError::InvalidDatatype("values".to_string()))
        );
    }

    #[test]
    fn insert_errors() {
        let mut backend = MemoryBackend::new();
        assert_eq!(
            run(&mut backend, "insert into nope values (1);"),
            Err(BackendError::TableDoesNotExist("nope".to_string()))
        );

        run(&mut backend, "create table t (a int, b text);").unwrap();
        assert_eq!(
            run(&mut backend, "insert into t values (1);"),
            Err(BackendError::MissingValues {
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            run(&mut backend, "insert into t values ('x', 'y');"),
            Err(BackendError::InvalidCell {
                value: "x".to_string(),
                column_type: ColumnType::Int
            })
        );
        assert_eq!(
            run(&mut backend, "insert into t values (1.5, 'y');"),
            Err(BackendError::InvalidCell {
                value: "1.5".to_string(),
                column_type: ColumnType::Int
            })
        );
    }

    #[test]
    fn select_errors() {
        let mut backend = MemoryBackend::new();
        run(&mut backend, "create table t (a int);").unwrap();

        assert_eq!(run(&mut backend, "select a;"), Err(BackendError::MissingFrom));
        assert_eq!(
            run(&mut backend, "select b from t;"),
            Err(BackendError::ColumnDoesNotExist("b".to_string()))
        );
        assert_eq!(
            run(&mut backend, "select 1 from t;"),
            Err(BackendError::InvalidSelectItem("1".to_string()))
        );
        assert_eq!(
            run(&mut backend, "select a from other;"),
            Err(BackendError::TableDoesNotExist("other".to_string()))
        );
    }
}
