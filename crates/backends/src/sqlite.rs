//! SQLite-backed relational record store
//!
//! Fetches rows with `SELECT * FROM <table> WHERE <id_column> IN (...)`.
//! Every column becomes an attribute; the id column's value is the record id.
//! Id lists longer than the bound-parameter limit are split into chunks.

use std::path::Path;
use std::sync::Arc;

use parking_lot::Mutex;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};

use sift_core::{CancelToken, Document, RecordType, SiftError, SiftResult};

/// Ids bound per statement; below SQLite's historical 999-variable limit.
const CHUNK_SIZE: usize = 500;

/// Relational record store over one SQLite table.
#[derive(Clone)]
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    table: String,
    id_column: String,
}

impl SqliteStore {
    /// Open a database file and bind to `table`, keyed by `id_column`.
    pub fn open(path: impl AsRef<Path>, table: &str, id_column: &str) -> SiftResult<Self> {
        let conn = Connection::open(path).map_err(|e| SiftError::storage(e.to_string()))?;
        Self::from_connection(conn, table, id_column)
    }

    /// Bind an existing connection.
    pub fn from_connection(conn: Connection, table: &str, id_column: &str) -> SiftResult<Self> {
        validate_identifier(table)?;
        validate_identifier(id_column)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table: table.to_string(),
            id_column: id_column.to_string(),
        })
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run a closure against the underlying connection (schema setup, seeding).
    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> SiftResult<T> {
        let conn = self.conn.lock();
        f(&conn).map_err(|e| SiftError::storage(e.to_string()))
    }

    pub(crate) fn same_store(&self, other: &SqliteStore) -> bool {
        Arc::ptr_eq(&self.conn, &other.conn) && self.table == other.table
    }

    pub(crate) fn fetch(
        &self,
        record_type: &RecordType,
        ids: &[String],
        cancel: &CancelToken,
    ) -> SiftResult<Vec<Document>> {
        let conn = self.conn.lock();
        let mut docs = Vec::with_capacity(ids.len());
        for chunk in ids.chunks(CHUNK_SIZE) {
            cancel.check()?;
            let placeholders = vec!["?"; chunk.len()].join(", ");
            let sql = format!(
                "SELECT * FROM \"{}\" WHERE \"{}\" IN ({})",
                self.table, self.id_column, placeholders
            );
            let mut stmt = conn
                .prepare(&sql)
                .map_err(|e| SiftError::fetch_failed(record_type, e.to_string()))?;
            let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();
            let id_index = columns
                .iter()
                .position(|c| c == &self.id_column)
                .ok_or_else(|| {
                    SiftError::storage(format!(
                        "table '{}' has no column '{}'",
                        self.table, self.id_column
                    ))
                })?;
            let rows = stmt
                .query_map(params_from_iter(chunk.iter()), |row| {
                    let mut attributes = serde_json::Map::new();
                    let mut id = String::new();
                    for (i, name) in columns.iter().enumerate() {
                        let value = row.get_ref(i)?;
                        if i == id_index {
                            id = id_string(value);
                        }
                        attributes.insert(name.clone(), to_json(value));
                    }
                    Ok(Document {
                        record_type: record_type.clone(),
                        id,
                        attributes,
                    })
                })
                .map_err(|e| SiftError::fetch_failed(record_type, e.to_string()))?;
            for row in rows {
                docs.push(row.map_err(|e| SiftError::fetch_failed(record_type, e.to_string()))?);
            }
        }
        Ok(docs)
    }
}

fn validate_identifier(name: &str) -> SiftResult<()> {
    if name.is_empty() {
        return Err(SiftError::invalid_input("SQL identifier must not be empty"));
    }
    if !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return Err(SiftError::invalid_input(format!(
            "SQL identifier '{}' may only contain ASCII letters, digits and '_'",
            name
        )));
    }
    Ok(())
}

fn id_string(value: ValueRef<'_>) -> String {
    match value {
        ValueRef::Integer(i) => i.to_string(),
        ValueRef::Real(f) => f.to_string(),
        ValueRef::Text(t) | ValueRef::Blob(t) => String::from_utf8_lossy(t).into_owned(),
        ValueRef::Null => String::new(),
    }
}

fn to_json(value: ValueRef<'_>) -> serde_json::Value {
    match value {
        ValueRef::Null => serde_json::Value::Null,
        ValueRef::Integer(i) => serde_json::Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(serde_json::Value::Number)
            .unwrap_or(serde_json::Value::Null),
        ValueRef::Text(t) => serde_json::Value::String(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => serde_json::Value::Array(b.iter().map(|x| serde_json::Value::from(*x)).collect()),
    }
}
