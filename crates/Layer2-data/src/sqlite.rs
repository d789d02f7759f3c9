//! SQLite data source
//!
//! Read-only SELECTs over a plant database. The connection lives behind a
//! mutex; queries are parameterised and identifiers are validated before
//! they reach SQL.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::types::ValueRef;
use rusqlite::Connection;
use serde_json::{Map, Value};
use tracing::debug;

use pulse_foundation::{Error, Result};

use crate::fuzzy::{rank_candidates, NameMatch};
use crate::source::{default_collection, DataRequest, DataResult, DataSource, OperationCategory};

/// SQLite-backed data source
pub struct SqliteSource {
    id: String,
    conn: Arc<Mutex<Connection>>,
}

impl SqliteSource {
    /// Open (or create) a database file
    pub fn open(id: impl Into<String>, path: &Path) -> Result<Self> {
        let id = id.into();
        let conn = Connection::open(path)
            .map_err(|e| Error::connection(&id, format!("cannot open database: {}", e)))?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")
            .map_err(|e| Error::connection(&id, format!("cannot set pragmas: {}", e)))?;

        let source = Self {
            id,
            conn: Arc::new(Mutex::new(conn)),
        };
        source.bootstrap_schema()?;
        Ok(source)
    }

    /// In-memory database (tests and demos)
    pub fn in_memory(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::connection(&id, format!("cannot open in-memory database: {}", e)))?;

        let source = Self {
            id,
            conn: Arc::new(Mutex::new(conn)),
        };
        source.bootstrap_schema()?;
        Ok(source)
    }

    fn bootstrap_schema(&self) -> Result<()> {
        let conn = self.lock_conn()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS assets (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                area TEXT,
                status TEXT
            );

            CREATE TABLE IF NOT EXISTS production_runs (
                id TEXT PRIMARY KEY,
                asset_id TEXT NOT NULL,
                product TEXT,
                state TEXT NOT NULL,
                rate_per_hour REAL,
                updated_at TEXT
            );

            CREATE TABLE IF NOT EXISTS downtime_events (
                id TEXT PRIMARY KEY,
                asset_id TEXT NOT NULL,
                reason TEXT NOT NULL,
                started_at TEXT,
                minutes REAL
            );

            CREATE TABLE IF NOT EXISTS shifts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                crew TEXT,
                starts TEXT,
                ends TEXT
            );
            "#,
        )
        .map_err(|e| Error::query(&self.id, format!("schema bootstrap: {}", e)))?;
        Ok(())
    }

    /// Insert fixture rows. Bootstrap/test seeding only; the `DataSource`
    /// interface itself stays read-only.
    pub fn seed(&self, collection: &str, rows: &[Value]) -> Result<usize> {
        validate_identifier(&self.id, collection)?;
        let conn = self.lock_conn()?;

        let mut inserted = 0;
        for row in rows {
            let Value::Object(fields) = row else {
                return Err(Error::query(&self.id, "seed rows must be JSON objects"));
            };

            let mut columns = Vec::new();
            let mut params = Vec::new();
            for (column, value) in fields {
                validate_identifier(&self.id, column)?;
                columns.push(column.as_str());
                params.push(to_sql_value(value));
            }

            let placeholders: Vec<String> =
                (1..=columns.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({})",
                collection,
                columns.join(", "),
                placeholders.join(", ")
            );
            conn.execute(&sql, rusqlite::params_from_iter(params))
                .map_err(|e| Error::query(&self.id, format!("seed {}: {}", collection, e)))?;
            inserted += 1;
        }
        Ok(inserted)
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| Error::Internal("connection lock poisoned".to_string()))
    }

    fn query_rows(&self, request: &DataRequest) -> Result<Vec<Value>> {
        validate_identifier(&self.id, &request.collection)?;

        let mut sql = format!("SELECT * FROM {}", request.collection);
        let mut params = Vec::new();
        if !request.filter.is_empty() {
            let mut clauses = Vec::new();
            for (i, (field, value)) in request.filter.iter().enumerate() {
                validate_identifier(&self.id, field)?;
                clauses.push(format!("{} = ?{}", field, i + 1));
                params.push(to_sql_value(value));
            }
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
        if let Some(limit) = request.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        let conn = self.lock_conn()?;
        let mut stmt = conn
            .prepare(&sql)
            .map_err(|e| Error::query(&self.id, format!("{}: {}", request.collection, e)))?;
        let columns: Vec<String> = stmt.column_names().iter().map(|c| c.to_string()).collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params))
            .map_err(|e| Error::query(&self.id, format!("{}: {}", request.collection, e)))?;

        let mut out = Vec::new();
        while let Some(row) = rows
            .next()
            .map_err(|e| Error::query(&self.id, format!("{}: {}", request.collection, e)))?
        {
            let mut obj = Map::new();
            for (i, column) in columns.iter().enumerate() {
                let value = match row.get_ref(i) {
                    Ok(ValueRef::Null) => Value::Null,
                    Ok(ValueRef::Integer(n)) => Value::from(n),
                    Ok(ValueRef::Real(f)) => Value::from(f),
                    Ok(ValueRef::Text(t)) => Value::String(String::from_utf8_lossy(t).into_owned()),
                    Ok(ValueRef::Blob(_)) => Value::Null,
                    Err(_) => Value::Null,
                };
                obj.insert(column.clone(), value);
            }
            out.push(Value::Object(obj));
        }
        Ok(out)
    }
}

#[async_trait]
impl DataSource for SqliteSource {
    fn id(&self) -> &str {
        &self.id
    }

    async fn fetch(&self, request: &DataRequest) -> Result<DataResult> {
        let rows = self.query_rows(request)?;
        debug!(
            source = %self.id,
            collection = %request.collection,
            rows = rows.len(),
            "sqlite fetch"
        );
        Ok(DataResult::new(rows, &self.id, &request.collection))
    }

    async fn resolve_name(&self, category: OperationCategory, name: &str) -> Result<NameMatch> {
        let request = DataRequest::new(category, default_collection(category));
        let rows = self.query_rows(&request)?;

        let candidates = rows
            .iter()
            .filter_map(|row| row.get("name").and_then(Value::as_str).map(|n| (n, row)));
        Ok(rank_candidates(name, candidates))
    }
}

/// Identifiers (table and column names) come from trusted request builders,
/// but they are interpolated into SQL and get validated anyway.
fn validate_identifier(source_id: &str, ident: &str) -> Result<()> {
    let ok = !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');
    if ok {
        Ok(())
    } else {
        Err(Error::query(
            source_id,
            format!("invalid identifier: {:?}", ident),
        ))
    }
}

fn to_sql_value(value: &Value) -> rusqlite::types::Value {
    use rusqlite::types::Value as Sql;
    match value {
        Value::Null => Sql::Null,
        Value::Bool(b) => Sql::Integer(*b as i64),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Sql::Integer(i)
            } else {
                Sql::Real(n.as_f64().unwrap_or(0.0))
            }
        }
        Value::String(s) => Sql::Text(s.clone()),
        other => Sql::Text(other.to_string()),
    }
}
