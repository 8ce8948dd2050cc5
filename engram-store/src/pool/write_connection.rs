//! The single write connection. All mutations flow through here, FIFO by
//! mutex acquisition.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::Connection;

use engram_core::errors::EngramResult;

use super::pragmas::apply_pragmas;
use crate::store_err;

/// Mutex-guarded owner of the one connection allowed to mutate the store.
#[derive(Debug)]
pub struct WriteConnection {
    conn: Mutex<Connection>,
}

impl WriteConnection {
    /// Open the write connection to the given database path.
    pub fn open(path: &Path) -> EngramResult<Self> {
        let conn = Connection::open(path).map_err(|e| store_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory write connection (for testing).
    pub fn open_in_memory() -> EngramResult<Self> {
        let conn = Connection::open_in_memory().map_err(|e| store_err(e.to_string()))?;
        apply_pragmas(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Execute a closure holding the writer. Writers queue on the mutex in
    /// FIFO order; keep the closure short.
    pub fn with_conn<F, T>(&self, f: F) -> EngramResult<T>
    where
        F: FnOnce(&Connection) -> EngramResult<T>,
    {
        let guard = self
            .conn
            .lock()
            .map_err(|e| store_err(format!("writer lock poisoned: {e}")))?;
        f(&guard)
    }
}
