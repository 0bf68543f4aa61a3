//! Opens the embedded SQLite store and brings its schema up to date. The
//! caller owns the returned connection and passes it into the repository
//! functions; there is no hidden module-level handle, which keeps tests free
//! to spin up private in-memory instances.

use std::fs;
use std::path::{Path, PathBuf};

use directories::BaseDirs;
use log::{error, info};
use rusqlite::Connection;

use crate::error::{Result, StoreError};

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".workout-log-manager";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "workouts.sqlite";

/// Current schema generation. Version 2 added the `user` table; upgrades are
/// additive only, so older databases gain the missing tables and indexes in
/// place and existing rows survive untouched.
const SCHEMA_VERSION: i64 = 2;

/// Everything the store needs, expressed idempotently so reopening a database
/// of any earlier generation completes the schema without a migration script.
const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS exercises (
    id          TEXT PRIMARY KEY,
    name        TEXT NOT NULL,
    description TEXT,
    kind        TEXT,
    body_part   TEXT,
    weight_unit TEXT NOT NULL DEFAULT 'kg',
    steps       REAL NOT NULL DEFAULT 1.0,
    created_at  INTEGER NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_exercises_name ON exercises(name);

CREATE TABLE IF NOT EXISTS trainings (
    id         TEXT PRIMARY KEY,
    name       TEXT,
    warm_up    TEXT,
    calm_down  TEXT,
    start_time INTEGER NOT NULL,
    end_time   INTEGER NOT NULL DEFAULT 0,
    notes      TEXT,
    created_at INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_trainings_start_time ON trainings(start_time);
CREATE INDEX IF NOT EXISTS idx_trainings_end_time ON trainings(end_time);

CREATE TABLE IF NOT EXISTS sets (
    id                TEXT PRIMARY KEY,
    training_id       TEXT NOT NULL REFERENCES trainings(id),
    exercise_id       TEXT NOT NULL REFERENCES exercises(id),
    order_in_training INTEGER NOT NULL,
    rest_period       INTEGER,
    notes             TEXT,
    created_at        INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sets_training_id ON sets(training_id);
CREATE INDEX IF NOT EXISTS idx_sets_exercise_id ON sets(exercise_id);
CREATE INDEX IF NOT EXISTS idx_sets_exercise_training ON sets(exercise_id, training_id);

CREATE TABLE IF NOT EXISTS rounds (
    id           TEXT PRIMARY KEY,
    set_id       TEXT NOT NULL REFERENCES sets(id),
    order_in_set INTEGER NOT NULL,
    weight       REAL NOT NULL,
    reps         INTEGER NOT NULL,
    notes        TEXT,
    created_at   INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_rounds_set_id ON rounds(set_id);

CREATE TABLE IF NOT EXISTS user (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    updated_at INTEGER NOT NULL
);
";

/// Open (or create) the database at its default location inside the user's
/// home directory.
pub fn open_default() -> Result<Connection> {
    let path = default_db_path()?;
    open_at(&path)
}

/// Open (or create) a database at an explicit path, run lazy schema setup,
/// and return a live connection with foreign keys enabled.
pub fn open_at(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path).map_err(|err| {
        error!("failed to open database at {}: {err}", path.display());
        StoreError::Unavailable {
            reason: format!("could not open {}: {err}", path.display()),
        }
    })?;
    configure(&conn)?;
    Ok(conn)
}

/// Open a private in-memory instance with the full schema applied. Each call
/// returns an isolated store, which is what the tests build on.
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().map_err(|err| StoreError::Unavailable {
        reason: format!("could not open in-memory database: {err}"),
    })?;
    configure(&conn)?;
    Ok(conn)
}

/// Release a handle eagerly. Dropping the connection does the same; this
/// form surfaces a failure to flush instead of swallowing it.
pub fn close(conn: Connection) -> Result<()> {
    conn.close().map_err(|(_, err)| StoreError::from(err))
}

fn configure(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])?;
    ensure_schema(conn)
}

/// Idempotent schema setup. A database stamped with a newer version than this
/// build understands is refused rather than touched; anything older gains the
/// missing tables/indexes and is restamped.
fn ensure_schema(conn: &Connection) -> Result<()> {
    let on_disk: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    if on_disk > SCHEMA_VERSION {
        error!(
            "database schema version {on_disk} is newer than the supported version {SCHEMA_VERSION}"
        );
        return Err(StoreError::Unavailable {
            reason: format!(
                "schema version {on_disk} is newer than the supported version {SCHEMA_VERSION}"
            ),
        });
    }

    conn.execute_batch(SCHEMA_SQL)?;

    if on_disk < SCHEMA_VERSION {
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
        info!("database schema brought up from version {on_disk} to {SCHEMA_VERSION}");
    }

    Ok(())
}

/// Resolve the absolute path to the SQLite database inside the user's home.
fn default_db_path() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| StoreError::Unavailable {
        reason: "could not locate home directory".to_string(),
    })?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME).join(DB_FILE_NAME))
}
