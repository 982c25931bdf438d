use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::info;

/// Open (or create) the SQLite file at `path`, run lazy migrations, and return
/// a live connection.
pub fn open_store(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(path).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    info!(path = %path.display(), "opened bow tie store");
    Ok(conn)
}

/// Throwaway store used by tests and previews.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the `bowties` table and its filter index if they do not exist yet.
/// The CHECK constraints are the last line of rating validation.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS bowties (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            search_key TEXT NOT NULL,
            rating REAL NOT NULL CHECK (rating >= 0 AND rating <= 5),
            times_worn INTEGER NOT NULL DEFAULT 0 CHECK (times_worn >= 0),
            last_worn TEXT,
            is_favorite INTEGER NOT NULL DEFAULT 0,
            tint_red INTEGER NOT NULL,
            tint_green INTEGER NOT NULL,
            tint_blue INTEGER NOT NULL,
            photo_data BLOB NOT NULL
        )",
        [],
    )
    .context("failed to create bowties table")?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS bowties_search_key ON bowties (search_key)",
        [],
    )
    .context("failed to create search key index")?;

    Ok(())
}
