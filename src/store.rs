use rusqlite::{params, Connection, OptionalExtension, ToSql};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::criteria::Criteria;
use crate::error::Error;
use crate::schema::{self, validate_identifier, Schema};

/// A stored user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// The caller-supplied fields of a record; `id` is generated on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub age: i64,
}

/// Result of a delete-by-criteria call that reached the database.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The COUNT pre-check found matching rows and they were deleted.
    Deleted { rows: usize, conditions: String },
    /// The COUNT pre-check found nothing; no DELETE was issued.
    NoMatch { conditions: String },
}

/// Store configuration: database path plus schema.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreConfig {
    /// Path to the SQLite database file. Opening it creates it if missing.
    pub db_path: String,
    /// Name of the user table.
    pub table: String,
    /// Schema ensured on [`Store::ensure_schema`].
    pub schema: Schema,
}

impl StoreConfig {
    /// Config for the canonical `users` table at the given path.
    pub fn new(db_path: impl Into<String>) -> Self {
        Self::with_table(db_path, "users")
    }

    pub fn with_table(db_path: impl Into<String>, table: &str) -> Self {
        Self {
            db_path: db_path.into(),
            table: table.to_string(),
            schema: Schema::new().add_table(schema::users_table(table)),
        }
    }
}

/// Synchronous store over a single SQLite connection.
pub struct Store {
    conn: Connection,
    table: String,
    schema: Schema,
}

impl Store {
    /// Open (and create if missing) the database file named by the config.
    pub fn open(config: StoreConfig) -> Result<Self, Error> {
        let conn = Connection::open(&config.db_path)?;
        info!(path = %config.db_path, "opened database");
        Self::with_connection(conn, config)
    }

    /// In-memory store, for tests and throwaway runs.
    pub fn open_in_memory(config: StoreConfig) -> Result<Self, Error> {
        let conn = Connection::open_in_memory()?;
        Self::with_connection(conn, config)
    }

    fn with_connection(conn: Connection, config: StoreConfig) -> Result<Self, Error> {
        validate_identifier(&config.table)?;
        Ok(Self {
            conn,
            table: config.table,
            schema: config.schema,
        })
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Create every table and index in the schema if it does not already
    /// exist. No-op on subsequent runs.
    pub fn ensure_schema(&self) -> Result<(), Error> {
        for table in &self.schema.tables {
            let sql = table.create_table_sql()?;
            debug!(%sql, "ensuring table");
            self.conn.execute(&sql, params![])?;
            for sql in table.create_index_sql()? {
                debug!(%sql, "ensuring index");
                self.conn.execute(&sql, params![])?;
            }
        }
        Ok(())
    }

    /// The file backing the `main` database, or `None` for in-memory.
    pub fn database_path(&self) -> Result<Option<String>, Error> {
        let file: Option<String> = self
            .conn
            .query_row(
                "SELECT file FROM pragma_database_list WHERE name = 'main'",
                [],
                |row| row.get(0),
            )
            .optional()?;
        Ok(file.filter(|f| !f.is_empty()))
    }

    /// Insert a record and return its generated id.
    pub fn insert(&self, user: &NewUser) -> Result<i64, Error> {
        debug!(table = %self.table, name = %user.name, "inserting record");
        self.conn.execute(
            &format!(
                "INSERT INTO {} (name, email, age) VALUES (?1, ?2, ?3)",
                self.table
            ),
            params![user.name, user.email, user.age],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Read all records, in id order.
    pub fn read_all(&self) -> Result<Vec<User>, Error> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT id, name, email, age FROM {} ORDER BY id",
            self.table
        ))?;
        let rows = stmt.query_map([], |row| {
            Ok(User {
                id: row.get(0)?,
                name: row.get(1)?,
                email: row.get(2)?,
                age: row.get(3)?,
            })
        })?;
        let mut users = Vec::new();
        for user in rows {
            users.push(user?);
        }
        Ok(users)
    }

    /// Set `name` and `age` for the given id, leaving `email` untouched.
    /// Returns the number of rows affected (0 when the id does not exist).
    pub fn update(&self, id: i64, name: &str, age: i64) -> Result<usize, Error> {
        debug!(table = %self.table, id, "updating record");
        let rows = self.conn.execute(
            &format!(
                "UPDATE {} SET name = :name, age = :age WHERE id = :id",
                self.table
            ),
            rusqlite::named_params! { ":name": name, ":age": age, ":id": id },
        )?;
        Ok(rows)
    }

    /// Delete the rows matching a criteria set.
    ///
    /// The clause uses only the non-empty criteria values, conjoined with
    /// AND in insertion order. An all-empty set returns
    /// [`Error::EmptyCriteria`] before any statement is issued. A COUNT
    /// runs first; the DELETE is only issued when it finds matches.
    pub fn delete_by(&self, criteria: &Criteria) -> Result<DeleteOutcome, Error> {
        let clause = criteria.where_clause()?;
        let bindings: Vec<(&str, &dyn ToSql)> = clause
            .params
            .iter()
            .map(|(name, value)| (name.as_str(), value as &dyn ToSql))
            .collect();

        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {}",
                self.table, clause.sql
            ),
            bindings.as_slice(),
            |row| row.get(0),
        )?;
        if count == 0 {
            debug!(table = %self.table, conditions = %clause.conditions, "no rows matched");
            return Ok(DeleteOutcome::NoMatch {
                conditions: clause.conditions,
            });
        }

        let rows = self.conn.execute(
            &format!("DELETE FROM {} WHERE {}", self.table, clause.sql),
            bindings.as_slice(),
        )?;
        info!(table = %self.table, rows, conditions = %clause.conditions, "deleted rows");
        Ok(DeleteOutcome::Deleted {
            rows,
            conditions: clause.conditions,
        })
    }
}
