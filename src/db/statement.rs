//! Executed statements and their buffered result sets.

use std::collections::VecDeque;

use serde::Serialize;

use super::Row;

/// A statement that has been prepared, bound and executed.
///
/// Result rows are buffered at execution time and handed out in order by
/// [`Statement::fetch`] and [`Statement::fetch_all`].
#[derive(Debug, Clone)]
pub struct Statement {
    sql: String,
    columns: Vec<String>,
    rows: VecDeque<Row>,
    rows_affected: u64,
    last_insert_id: Option<i64>,
}

/// Outcome of `Database::fetch_results`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Fetched {
    One(Option<Row>),
    All(Vec<Row>),
}

impl Fetched {
    /// Flatten into a list of zero or more rows.
    pub fn into_rows(self) -> Vec<Row> {
        match self {
            Fetched::One(row) => row.into_iter().collect(),
            Fetched::All(rows) => rows,
        }
    }
}

impl Statement {
    pub(crate) fn new(
        sql: String,
        columns: Vec<String>,
        rows: Vec<Row>,
        rows_affected: u64,
        last_insert_id: Option<i64>,
    ) -> Self {
        Statement {
            sql,
            columns,
            rows: rows.into(),
            rows_affected,
            last_insert_id,
        }
    }

    /// SQL text as sent to the driver.
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Column names of the result set; empty for statements that return none.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    pub fn last_insert_id(&self) -> Option<i64> {
        self.last_insert_id
    }

    /// Rows not yet fetched.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }

    /// Next row, if any.
    pub fn fetch(&mut self) -> Option<Row> {
        self.rows.pop_front()
    }

    /// All rows not yet fetched.
    pub fn fetch_all(&mut self) -> Vec<Row> {
        self.rows.drain(..).collect()
    }
}
