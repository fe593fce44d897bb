use std::path::Path;

use rusqlite::{params, Connection};

use crate::analyze::CommandRecord;
use crate::error::RecapError;

/// One-table store mapping a command string to how often it occurred.
///
/// Each run works against a fresh table: `open` drops and recreates
/// `commands`, so counts never accumulate across runs of the tool. The
/// connection is released when the store is dropped.
pub struct CommandStore {
    conn: Connection,
}

impl CommandStore {
    pub fn open(path: &Path) -> Result<Self, RecapError> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// Backing store for tests; same schema, no file on disk.
    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, RecapError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, RecapError> {
        conn.execute_batch(
            "
            DROP TABLE IF EXISTS commands;
            CREATE TABLE commands (
                command   TEXT NOT NULL UNIQUE,
                frequency INTEGER NOT NULL
            );
            ",
        )?;
        Ok(CommandStore { conn })
    }

    /// Count one occurrence of `command`. Callers must not pass empty or
    /// whitespace-only strings; the ingestion filter guarantees that.
    pub fn record(&mut self, command: &str) -> Result<(), RecapError> {
        self.conn.execute(
            "INSERT INTO commands (command, frequency) VALUES (?1, 1)
             ON CONFLICT(command) DO UPDATE SET frequency = frequency + 1",
            params![command],
        )?;
        Ok(())
    }

    /// Count every command in one transaction, so a crash mid-run leaves
    /// either all of the batch or none of it.
    pub fn record_all<'a, I>(&mut self, commands: I) -> Result<(), RecapError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO commands (command, frequency) VALUES (?1, 1)
                 ON CONFLICT(command) DO UPDATE SET frequency = frequency + 1",
            )?;
            for command in commands {
                stmt.execute(params![command])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Every stored record. Order is unspecified here; ranking is the
    /// analyzer's job.
    pub fn all_records(&self) -> Result<Vec<CommandRecord>, RecapError> {
        let mut stmt = self
            .conn
            .prepare("SELECT command, frequency FROM commands")?;
        let rows = stmt.query_map([], |row| {
            Ok(CommandRecord {
                command: row.get(0)?,
                frequency: row.get(1)?,
            })
        })?;
        let mut records = Vec::new();
        for row in rows {
            records.push(row?);
        }
        Ok(records)
    }
}
