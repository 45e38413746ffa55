//! Reading Store - SQLite table of sensor readings
//!
//! One `readings` table, append-only. The store owns a single connection
//! behind a mutex; callers hold the store in an `Arc` and pass `&ReadingStore`
//! into every query.
//!
//! All calls are synchronous. HTTP handlers call straight into the store from
//! the async worker thread and hold the connection lock for the length of one
//! statement; there is no `spawn_blocking` hop.
//!
//! # Schema
//! ```text
//! readings(device_uuid TEXT, type TEXT, value INTEGER, date_created INTEGER)
//! ```

use crate::storage::error::{StorageError, StorageResult};
use crate::storage::sql::SqlQuery;
use crate::storage::types::{Reading, SensorType};
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{Connection, Row};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS readings (
    device_uuid TEXT,
    type TEXT,
    value INTEGER,
    date_created INTEGER
);
CREATE INDEX IF NOT EXISTS idx_readings_device_time ON readings (device_uuid, date_created);
";

/// Column list matching [`reading_from_row`]
pub const READING_COLUMNS: &str = "device_uuid, type, value, date_created";

impl ToSql for SensorType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for SensorType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|e: String| FromSqlError::Other(e.into()))
    }
}

/// Decode a row selected with [`READING_COLUMNS`]
pub fn reading_from_row(row: &Row<'_>) -> rusqlite::Result<Reading> {
    Ok(Reading {
        device_uuid: row.get(0)?,
        sensor_type: row.get(1)?,
        value: row.get(2)?,
        timestamp: row.get(3)?,
    })
}

/// Map a row decoding failure to `Corruption`, anything else to `Database`
fn decode_error(err: rusqlite::Error) -> StorageError {
    match err {
        rusqlite::Error::FromSqlConversionFailure(col, _, cause) => {
            StorageError::Corruption(format!("column {}: {}", col, cause))
        }
        rusqlite::Error::InvalidColumnType(col, name, ty) => {
            StorageError::Corruption(format!("column {} ({}): unexpected {}", col, name, ty))
        }
        other => StorageError::Database(other),
    }
}

/// SQLite-backed reading store
#[derive(Debug)]
pub struct ReadingStore {
    conn: Mutex<Connection>,
}

impl ReadingStore {
    /// Open (or create) a store at the given database file
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        let store = Self::init(conn)?;

        tracing::info!("Opened reading store at {:?}", path);
        Ok(store)
    }

    /// Open a private in-memory store
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StorageResult<Self> {
        conn.execute_batch(SCHEMA_SQL)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::Lock(e.to_string()))
    }

    /// Append a reading
    pub fn insert(&self, reading: &Reading) -> StorageResult<()> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO readings (device_uuid, type, value, date_created) VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![
                reading.device_uuid,
                reading.sensor_type,
                reading.value,
                reading.timestamp,
            ],
        )?;
        Ok(())
    }

    /// Run a parameterized query, mapping each row with `map`
    pub fn query<T, F>(&self, query: &SqlQuery, map: F) -> StorageResult<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        tracing::debug!(sql = query.sql(), params = ?query.params(), "Executing query");

        let conn = self.conn()?;
        let mut stmt = conn.prepare(query.sql())?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(query.params()), map)?
            .collect::<rusqlite::Result<Vec<T>>>()
            .map_err(decode_error)?;
        Ok(rows)
    }

    /// Total number of stored readings
    pub fn count(&self) -> StorageResult<u64> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}
