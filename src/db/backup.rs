//! Full-store JSON backups. The document layout — `version`, `exportedAt`,
//! and a `data` object holding all five stores — matches the format the
//! application has always exported, so old backup files keep importing.
//! Import replaces the entire store contents in one transaction, preserving
//! the original ids and timestamps of every record.

use std::fs;
use std::path::Path;

use log::info;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{exercises, rounds, sets, trainings, user};
use crate::error::{Result, StoreError};
use crate::models::{Exercise, Round, Set, Training, User};
use crate::util::now;

/// Format generation written into every export. Version 2 added the user
/// record to the document.
pub const BACKUP_VERSION: u32 = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupDocument {
    pub version: u32,
    pub exported_at: i64,
    pub data: BackupData,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BackupData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(default)]
    pub exercises: Vec<Exercise>,
    #[serde(default)]
    pub trainings: Vec<Training>,
    #[serde(default)]
    pub sets: Vec<Set>,
    #[serde(default)]
    pub rounds: Vec<Round>,
}

/// Snapshot all five stores into a backup document.
pub fn export_data(conn: &Connection) -> Result<BackupDocument> {
    Ok(BackupDocument {
        version: BACKUP_VERSION,
        exported_at: now(),
        data: BackupData {
            user: user::get_user(conn)?,
            exercises: exercises::get_all_exercises(conn)?,
            trainings: trainings::get_all_trainings(conn)?,
            sets: sets::get_all_sets(conn)?,
            rounds: rounds::get_all_rounds(conn)?,
        },
    })
}

/// Export the store as pretty-printed JSON at `path`.
pub fn export_to_file(conn: &Connection, path: &Path) -> Result<()> {
    let document = export_data(conn)?;
    let json = serde_json::to_string_pretty(&document)?;
    fs::write(path, json)?;
    info!("exported backup to {}", path.display());
    Ok(())
}

/// Parse and structurally validate a backup document. A document without a
/// non-zero `version` or without a `data` object is rejected before the
/// store is touched.
pub fn parse_document(json: &str) -> Result<BackupDocument> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    match value.get("version").and_then(serde_json::Value::as_u64) {
        None | Some(0) => return Err(StoreError::InvalidBackup("missing version field")),
        Some(_) => {}
    }
    if value.get("data").is_none() {
        return Err(StoreError::InvalidBackup("missing data field"));
    }
    Ok(serde_json::from_value(value)?)
}

/// Replace the entire store contents with the document's records, inside one
/// transaction: clear all five tables, then re-insert every record exactly
/// as exported — original ids and timestamps included. The user record is
/// restored only when the document carries one.
pub fn import_data(conn: &mut Connection, document: &BackupDocument) -> Result<()> {
    let tx = conn.transaction()?;

    // Children before parents so the foreign keys stay satisfied.
    tx.execute("DELETE FROM rounds", [])?;
    tx.execute("DELETE FROM sets", [])?;
    tx.execute("DELETE FROM trainings", [])?;
    tx.execute("DELETE FROM exercises", [])?;
    tx.execute("DELETE FROM user", [])?;

    for exercise in &document.data.exercises {
        tx.execute(
            "INSERT INTO exercises (id, name, description, kind, body_part, weight_unit, steps, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                exercise.id,
                exercise.name,
                exercise.description,
                exercise.kind,
                exercise.body_part,
                exercise.weight_unit,
                exercise.steps,
                exercise.created_at,
            ],
        )?;
    }

    for training in &document.data.trainings {
        tx.execute(
            "INSERT INTO trainings (id, name, warm_up, calm_down, start_time, end_time, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                training.id,
                training.name,
                training.warm_up,
                training.calm_down,
                training.start_time,
                training.status.end_time_ms(),
                training.notes,
                training.created_at,
            ],
        )?;
    }

    for set in &document.data.sets {
        tx.execute(
            "INSERT INTO sets (id, training_id, exercise_id, order_in_training, rest_period, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                set.id,
                set.training_id,
                set.exercise_id,
                set.order_in_training,
                set.rest_period,
                set.notes,
                set.created_at,
            ],
        )?;
    }

    for round in &document.data.rounds {
        tx.execute(
            "INSERT INTO rounds (id, set_id, order_in_set, weight, reps, notes, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                round.id,
                round.set_id,
                round.order_in_set,
                round.weight,
                round.reps,
                round.notes,
                round.created_at,
            ],
        )?;
    }

    if let Some(user) = &document.data.user {
        tx.execute(
            "INSERT INTO user (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![user.id, user.name, user.created_at, user.updated_at],
        )?;
    }

    tx.commit()?;
    info!(
        "imported backup with {} exercises, {} trainings, {} sets, {} rounds",
        document.data.exercises.len(),
        document.data.trainings.len(),
        document.data.sets.len(),
        document.data.rounds.len(),
    );
    Ok(())
}

/// Read, validate, and import a backup file.
pub fn import_from_file(conn: &mut Connection, path: &Path) -> Result<()> {
    let json = fs::read_to_string(path)?;
    let document = parse_document(&json)?;
    import_data(conn, &document)
}

/// Empty the four workout tables in one transaction while keeping the user
/// record — the account page's "delete everything" action.
pub fn clear_all_data(conn: &mut Connection) -> Result<()> {
    let tx = conn.transaction()?;
    tx.execute("DELETE FROM rounds", [])?;
    tx.execute("DELETE FROM sets", [])?;
    tx.execute("DELETE FROM trainings", [])?;
    tx.execute("DELETE FROM exercises", [])?;
    tx.commit()?;
    info!("cleared all workout data");
    Ok(())
}
