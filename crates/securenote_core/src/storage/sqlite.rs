//! SQLite-backed storage medium.
//!
//! # Responsibility
//! - Open file or in-memory SQLite databases as key-value media.
//! - Configure connection pragmas and apply schema migrations before any
//!   application data is touched.
//!
//! # Invariants
//! - Returned media have migrations fully applied.
//! - One row per key in `kv_entries`; `set_item` is an upsert.

use super::migrations::apply_migrations;
use super::{StorageMedium, StorageResult};
use log::{error, info};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::time::{Duration, Instant};

/// Key-value medium persisted in a single SQLite table.
pub struct SqliteMedium {
    conn: Connection,
}

/// Opens a SQLite-backed store at `path`, migrating it as needed.
pub fn open_store(path: impl AsRef<Path>) -> StorageResult<SqliteMedium> {
    open_with("file", || Connection::open(path.as_ref()).map_err(Into::into))
}

/// Opens an in-memory SQLite-backed store, migrating it as needed.
pub fn open_store_in_memory() -> StorageResult<SqliteMedium> {
    open_with("memory", || {
        Connection::open_in_memory().map_err(Into::into)
    })
}

fn open_with(
    mode: &str,
    connect: impl FnOnce() -> StorageResult<Connection>,
) -> StorageResult<SqliteMedium> {
    let started_at = Instant::now();
    info!("event=store_open module=storage status=start mode={mode}");

    let result = connect().and_then(|mut conn| {
        conn.busy_timeout(Duration::from_secs(5))?;
        apply_migrations(&mut conn)?;
        Ok(SqliteMedium { conn })
    });

    match &result {
        Ok(_) => info!(
            "event=store_open module=storage status=ok mode={mode} duration_ms={}",
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=store_open module=storage status=error mode={mode} duration_ms={} error={err}",
            started_at.elapsed().as_millis()
        ),
    }

    result
}

impl StorageMedium for SqliteMedium {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set_item(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value;",
            params![key, value],
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{open_store_in_memory, StorageMedium};

    #[test]
    fn set_item_replaces_previous_value() {
        let mut medium = open_store_in_memory().expect("in-memory store opens");
        medium.set_item("k", "one").unwrap();
        medium.set_item("k", "two").unwrap();
        assert_eq!(medium.get_item("k").unwrap().as_deref(), Some("two"));
    }

    #[test]
    fn missing_key_reads_as_none() {
        let medium = open_store_in_memory().expect("in-memory store opens");
        assert_eq!(medium.get_item("absent").unwrap(), None);
    }
}
