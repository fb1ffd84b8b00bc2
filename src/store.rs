use std::{collections::HashSet, path::Path};

use chrono::{DateTime, Local};
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension};

use crate::{
    hype::{HypeLogEntry, HypeTracker, QuotaState},
    user::Suggestions,
};

const TEMPLATE_DATABASE_UP_SQL: &str = "
CREATE TABLE IF NOT EXISTS quota_state (
    id          INTEGER PRIMARY KEY CHECK (id = 0),
    remaining   INTEGER NOT NULL,
    last_reset  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS hype_log (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    movie_id    TEXT NOT NULL,
    timestamp   TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS fanned_suggestions (
    id          TEXT PRIMARY KEY
);
";

/// Per-user state kept on this machine: hype quota, hype log and fanned suggestions.
pub struct LocalStore {
    conn: Connection,
}

impl LocalStore {
    pub fn open(path: &Path) -> Result<Self, rusqlite::Error> {
        if path.exists() {
            info!("Connecting to database: {}", path.display());
        } else {
            info!("Creating database: {}", path.display());
        }
        Self::init(Connection::open(path)?)
    }

    #[cfg(test)]
    pub fn open_in_memory() -> Result<Self, rusqlite::Error> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self, rusqlite::Error> {
        conn.execute_batch(TEMPLATE_DATABASE_UP_SQL)?;
        Ok(Self { conn })
    }

    /// Stored tracker, or a fresh one stamped `now` when nothing was saved yet.
    pub fn load_tracker(&self, now: DateTime<Local>) -> Result<HypeTracker, rusqlite::Error> {
        let state = self
            .conn
            .query_row(
                "SELECT remaining, last_reset FROM quota_state WHERE id = 0",
                [],
                |row| {
                    Ok(QuotaState {
                        remaining: row.get(0)?,
                        last_reset: row.get(1)?,
                    })
                },
            )
            .optional()?
            .unwrap_or_else(|| QuotaState::fresh(now));

        let mut stmt = self
            .conn
            .prepare("SELECT movie_id, timestamp FROM hype_log ORDER BY id")?;
        let log = stmt
            .query_map([], |row| {
                Ok(HypeLogEntry {
                    movie_id: row.get(0)?,
                    timestamp: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} hype log entries", log.len());
        Ok(HypeTracker::from_parts(state, log))
    }

    /// Write the quota state and append log entries not stored yet.
    pub fn save_tracker(&mut self, tracker: &HypeTracker) -> Result<(), rusqlite::Error> {
        let tx = self.conn.transaction()?;
        let state = tracker.state();
        tx.execute(
            "INSERT INTO quota_state (id, remaining, last_reset) VALUES (0, ?1, ?2)
             ON CONFLICT(id) DO UPDATE SET remaining = excluded.remaining, last_reset = excluded.last_reset",
            params![state.remaining, state.last_reset],
        )?;

        let stored: i64 = tx.query_row("SELECT COUNT(*) FROM hype_log", [], |row| row.get(0))?;
        let stored = usize::try_from(stored).unwrap_or_default();
        for entry in tracker.log().iter().skip(stored) {
            tx.execute(
                "INSERT INTO hype_log (movie_id, timestamp) VALUES (?1, ?2)",
                params![entry.movie_id, entry.timestamp],
            )?;
        }
        debug!("Appended {} hype log entries", tracker.log().len().saturating_sub(stored));

        tx.commit()
    }

    pub fn load_fanned(&self) -> Result<HashSet<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT id FROM fanned_suggestions")?;
        let ids = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<HashSet<String>, _>>()?;
        Ok(ids)
    }

    pub fn save_fanned(&mut self, suggestions: &Suggestions) -> Result<(), rusqlite::Error> {
        let tx = self.conn.transaction()?;
        tx.execute("DELETE FROM fanned_suggestions", [])?;
        for suggestion in suggestions.fanned() {
            tx.execute(
                "INSERT INTO fanned_suggestions (id) VALUES (?1)",
                params![suggestion.id],
            )?;
        }
        tx.commit()
    }
}
