//! Repository for training sessions. The store keeps the historical integer
//! `end_time` column (0 = session still open) so the on-disk layout matches
//! old databases; the API surfaces it as [`TrainingStatus`].

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::models::{Training, TrainingInput, TrainingPatch, TrainingStatus};
use crate::util::{generate_unique_id, now};

fn map_training_row(row: &Row<'_>) -> rusqlite::Result<Training> {
    Ok(Training {
        id: row.get(0)?,
        name: row.get(1)?,
        warm_up: row.get(2)?,
        calm_down: row.get(3)?,
        start_time: row.get(4)?,
        status: TrainingStatus::from_end_time_ms(row.get(5)?),
        notes: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert a new training session, returning the hydrated record.
pub fn create_training(conn: &Connection, input: TrainingInput) -> Result<Training> {
    validate_status(input.status)?;

    let training = Training {
        id: generate_unique_id(),
        name: input.name,
        warm_up: input.warm_up,
        calm_down: input.calm_down,
        start_time: input.start_time,
        status: input.status,
        notes: input.notes,
        created_at: now(),
    };

    conn.execute(
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

    Ok(training)
}

pub fn get_training(conn: &Connection, id: &str) -> Result<Option<Training>> {
    conn.query_row(
        "SELECT id, name, warm_up, calm_down, start_time, end_time, notes, created_at
         FROM trainings WHERE id = ?1",
        [id],
        map_training_row,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn get_all_trainings(conn: &Connection) -> Result<Vec<Training>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, warm_up, calm_down, start_time, end_time, notes, created_at
         FROM trainings",
    )?;
    let trainings = stmt
        .query_map([], map_training_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(trainings)
}

/// Trainings ordered most recent first through the start-time index, with an
/// optional cap on the result count.
pub fn get_trainings_by_start_time(
    conn: &Connection,
    limit: Option<u32>,
) -> Result<Vec<Training>> {
    // SQLite treats a negative LIMIT as "no limit".
    let limit = limit.map_or(-1, i64::from);
    let mut stmt = conn.prepare(
        "SELECT id, name, warm_up, calm_down, start_time, end_time, notes, created_at
         FROM trainings ORDER BY start_time DESC LIMIT ?1",
    )?;
    let trainings = stmt
        .query_map([limit], map_training_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(trainings)
}

/// Trainings whose start time falls inside the inclusive range, most recent
/// first.
pub fn get_trainings_by_date_range(
    conn: &Connection,
    start: i64,
    end: i64,
) -> Result<Vec<Training>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, warm_up, calm_down, start_time, end_time, notes, created_at
         FROM trainings
         WHERE start_time >= ?1 AND start_time <= ?2
         ORDER BY start_time DESC",
    )?;
    let trainings = stmt
        .query_map(params![start, end], map_training_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(trainings)
}

/// The training currently in progress: started in the past and either still
/// open or ending in the future. At most one is expected to exist; should the
/// invariant ever be violated, the earliest start time wins deterministically.
pub fn get_active_training(conn: &Connection) -> Result<Option<Training>> {
    let now = now();
    conn.query_row(
        "SELECT id, name, warm_up, calm_down, start_time, end_time, notes, created_at
         FROM trainings
         WHERE start_time <= ?1 AND (end_time = 0 OR end_time > ?1)
         ORDER BY start_time
         LIMIT 1",
        [now],
        map_training_row,
    )
    .optional()
    .map_err(StoreError::from)
}

/// Read-modify-write update; `NotFound` when the id does not exist.
pub fn update_training(conn: &Connection, id: &str, patch: TrainingPatch) -> Result<Training> {
    let mut training =
        get_training(conn, id)?.ok_or_else(|| StoreError::not_found("training", id))?;
    patch.merge_into(&mut training);
    validate_status(training.status)?;

    conn.execute(
        "UPDATE trainings
         SET name = ?2, warm_up = ?3, calm_down = ?4, start_time = ?5, end_time = ?6, notes = ?7
         WHERE id = ?1",
        params![
            training.id,
            training.name,
            training.warm_up,
            training.calm_down,
            training.start_time,
            training.status.end_time_ms(),
            training.notes,
        ],
    )?;

    Ok(training)
}

/// Remove a training by id; missing ids are a no-op. Cascading its sets and
/// rounds is `queries::delete_training_cascade`'s job.
pub fn delete_training(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM trainings WHERE id = ?1", [id])?;
    Ok(())
}

// A completed training persisting end_time 0 would silently flip back to
// active on the next load, so the zero sentinel is reserved.
fn validate_status(status: TrainingStatus) -> Result<()> {
    if let TrainingStatus::Completed { end_time } = status {
        if end_time <= 0 {
            return Err(StoreError::invalid_input(
                "endTime",
                format!("completed trainings need a positive end time, got {end_time}"),
            ));
        }
    }
    Ok(())
}
