//! Lazily connected database helper.

use sqlx::any::AnyArguments;
use sqlx::query::Query;
use sqlx::{Any, AnyConnection, Column, Connection, Executor, Statement as _};
use std::sync::Once;
use tracing::{debug, info};

use super::{DbError, Fetched, Params, Row, Statement, Value};
use crate::config::{DatabaseConfig, Driver};

static INSTALL_DRIVERS: Once = Once::new();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Uninitialized,
    Connected,
}

/// Wraps at most one connection, opened on first use and kept until drop.
///
/// Meant to be constructed per request; methods take `&mut self`, so an
/// instance is never shared between tasks.
pub struct Database {
    config: DatabaseConfig,
    conn: Option<AnyConnection>,
}

impl Database {
    /// Create a helper for `config`. No connection is made yet.
    pub fn new(config: DatabaseConfig) -> Self {
        Database { config, conn: None }
    }

    pub fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    pub fn state(&self) -> ConnectionState {
        if self.conn.is_some() {
            ConnectionState::Connected
        } else {
            ConnectionState::Uninitialized
        }
    }

    /// Return the connection, opening it on the first call.
    ///
    /// # Errors
    /// Returns `DbError::Connection` carrying the driver's message. The helper
    /// stays uninitialized, so a later call tries again.
    pub async fn get_connection(&mut self) -> Result<&mut AnyConnection, DbError> {
        let conn = match self.conn.take() {
            Some(conn) => conn,
            None => {
                INSTALL_DRIVERS.call_once(sqlx::any::install_default_drivers);
                let conn = AnyConnection::connect(&self.config.url())
                    .await
                    .map_err(DbError::Connection)?;
                info!(
                    driver = ?self.config.driver,
                    database = %self.config.database,
                    "Database connection established"
                );
                conn
            }
        };
        Ok(self.conn.insert(conn))
    }

    /// Prepare `sql`, bind `params` if any, and execute it.
    ///
    /// The returned statement holds the result rows for `fetch_results`.
    ///
    /// # Errors
    /// Returns `DbError::Connection` if the connection cannot be opened,
    /// `DbError::MissingParameter` for an unmatched `:name`, and
    /// `DbError::Query` for anything the driver rejects.
    pub async fn execute(
        &mut self,
        sql: &str,
        params: Option<Params>,
    ) -> Result<Statement, DbError> {
        let (sql, values) = match params {
            Some(params) => params.resolve(sql)?,
            None => (sql.to_string(), Vec::new()),
        };

        let driver = self.config.driver;
        let conn = self.get_connection().await?;
        let (columns, rows, rows_affected, last_insert_id) = {
            let prepared = (&mut *conn).prepare(&sql).await?;
            let columns: Vec<String> = prepared
                .columns()
                .iter()
                .map(|column| column.name().to_string())
                .collect();
            let query = values.into_iter().fold(prepared.query(), bind_value);

            if columns.is_empty() {
                let result = query.execute(&mut *conn).await?;
                let rows_affected = result.rows_affected();
                let mut last_insert_id = None;
                if is_insert(&sql) && rows_affected > 0 {
                    last_insert_id = match driver {
                        // the Any result does not carry the rowid for SQLite
                        Driver::Sqlite => {
                            let row = sqlx::query::<Any>("SELECT last_insert_rowid()")
                                .fetch_one(&mut *conn)
                                .await?;
                            Row::from_any_row(&row)?.get_index(0).and_then(Value::as_i64)
                        }
                        Driver::MySql => result.last_insert_id(),
                    };
                }
                (columns, Vec::new(), rows_affected, last_insert_id)
            } else {
                let mut rows = Vec::new();
                for row in query.fetch_all(&mut *conn).await? {
                    rows.push(Row::from_any_row(&row)?);
                }
                (columns, rows, 0, None)
            }
        };

        debug!(
            sql = %sql,
            rows = rows.len(),
            rows_affected,
            "Statement executed"
        );
        Ok(Statement::new(
            sql,
            columns,
            rows,
            rows_affected,
            last_insert_id,
        ))
    }

    /// Read the next row (`one`) or every remaining row from `statement`.
    pub fn fetch_results(&self, statement: &mut Statement, one: bool) -> Fetched {
        if one {
            Fetched::One(statement.fetch())
        } else {
            Fetched::All(statement.fetch_all())
        }
    }
}

fn is_insert(sql: &str) -> bool {
    let keyword: String = sql
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect();
    keyword.eq_ignore_ascii_case("insert") || keyword.eq_ignore_ascii_case("replace")
}

fn bind_value<'q>(
    query: Query<'q, Any, AnyArguments<'q>>,
    value: Value,
) -> Query<'q, Any, AnyArguments<'q>> {
    match value {
        Value::Null => query.bind(None::<String>),
        Value::Bool(b) => query.bind(b),
        Value::Integer(i) => query.bind(i),
        Value::Real(f) => query.bind(f),
        Value::Text(s) => query.bind(s),
        Value::Blob(b) => query.bind(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_new_does_not_connect() {
        let db = Database::new(DatabaseConfig::sqlite(":memory:"));
        assert_eq!(db.state(), ConnectionState::Uninitialized);
    }

    #[tokio::test]
    async fn test_select_literal() {
        let mut db = Database::new(DatabaseConfig::sqlite(":memory:"));
        let mut stmt = db.execute("SELECT 1 AS one", None).await.unwrap();
        assert_eq!(db.state(), ConnectionState::Connected);

        let row = match db.fetch_results(&mut stmt, true) {
            Fetched::One(Some(row)) => row,
            other => panic!("Expected one row, got {other:?}"),
        };
        assert_eq!(row.get("one").and_then(Value::as_i64), Some(1));
        assert_eq!(db.fetch_results(&mut stmt, true), Fetched::One(None));
    }

    #[tokio::test]
    async fn test_null_column_decodes_as_null() {
        let mut db = Database::new(DatabaseConfig::sqlite(":memory:"));
        let mut stmt = db.execute("SELECT NULL AS x, 1 AS y", None).await.unwrap();
        let row = match db.fetch_results(&mut stmt, true) {
            Fetched::One(Some(row)) => row,
            other => panic!("Expected one row, got {other:?}"),
        };
        assert_eq!(row.get("x"), Some(&Value::Null));
        assert_eq!(row.get("y"), Some(&Value::Integer(1)));
    }

    #[tokio::test]
    async fn test_columns_known_without_rows() {
        let mut db = Database::new(DatabaseConfig::sqlite(":memory:"));
        db.execute("CREATE TABLE t (id INTEGER PRIMARY KEY, nom TEXT)", None)
            .await
            .unwrap();
        let stmt = db.execute("SELECT id, nom FROM t", None).await.unwrap();
        assert_eq!(stmt.columns(), &["id", "nom"]);
        assert_eq!(stmt.remaining(), 0);
    }

    #[test]
    fn test_is_insert() {
        assert!(is_insert("  insert INTO t VALUES (1)"));
        assert!(is_insert("REPLACE INTO t VALUES (1)"));
        assert!(!is_insert("UPDATE t SET x = 1"));
        assert!(!is_insert("SELECT 'insert'"));
    }

    #[tokio::test]
    async fn test_missing_named_parameter_does_not_connect() {
        let mut db = Database::new(DatabaseConfig::sqlite(":memory:"));
        let err = db
            .execute("SELECT :x", Some(Params::named(Vec::<(String, Value)>::new())))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::MissingParameter(_)));
        assert_eq!(db.state(), ConnectionState::Uninitialized);
    }
}
