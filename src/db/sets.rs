//! Repository for sets, the exercise slots inside a training. Lookups that
//! feed display paths return rows ordered by `order_in_training`; the plain
//! per-exercise scan leaves ordering to the composite layer.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::models::{Set, SetInput, SetPatch};
use crate::util::{generate_unique_id, now};

fn map_set_row(row: &Row<'_>) -> rusqlite::Result<Set> {
    Ok(Set {
        id: row.get(0)?,
        training_id: row.get(1)?,
        exercise_id: row.get(2)?,
        order_in_training: row.get(3)?,
        rest_period: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Insert a new set, returning the hydrated record.
pub fn create_set(conn: &Connection, input: SetInput) -> Result<Set> {
    let set = Set {
        id: generate_unique_id(),
        training_id: input.training_id,
        exercise_id: input.exercise_id,
        order_in_training: input.order_in_training,
        rest_period: input.rest_period,
        notes: input.notes,
        created_at: now(),
    };

    conn.execute(
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

    Ok(set)
}

pub fn get_set(conn: &Connection, id: &str) -> Result<Option<Set>> {
    conn.query_row(
        "SELECT id, training_id, exercise_id, order_in_training, rest_period, notes, created_at
         FROM sets WHERE id = ?1",
        [id],
        map_set_row,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn get_all_sets(conn: &Connection) -> Result<Vec<Set>> {
    let mut stmt = conn.prepare(
        "SELECT id, training_id, exercise_id, order_in_training, rest_period, notes, created_at
         FROM sets",
    )?;
    let sets = stmt
        .query_map([], map_set_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sets)
}

/// Every set of one training, in its recorded position order.
pub fn get_sets_by_training_id(conn: &Connection, training_id: &str) -> Result<Vec<Set>> {
    let mut stmt = conn.prepare(
        "SELECT id, training_id, exercise_id, order_in_training, rest_period, notes, created_at
         FROM sets WHERE training_id = ?1
         ORDER BY order_in_training",
    )?;
    let sets = stmt
        .query_map([training_id], map_set_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sets)
}

/// Every set referencing an exercise, across all trainings.
pub fn get_sets_by_exercise_id(conn: &Connection, exercise_id: &str) -> Result<Vec<Set>> {
    let mut stmt = conn.prepare(
        "SELECT id, training_id, exercise_id, order_in_training, rest_period, notes, created_at
         FROM sets WHERE exercise_id = ?1",
    )?;
    let sets = stmt
        .query_map([exercise_id], map_set_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sets)
}

/// Sets of one exercise within one training, through the composite index, in
/// position order.
pub fn get_sets_by_exercise_and_training(
    conn: &Connection,
    exercise_id: &str,
    training_id: &str,
) -> Result<Vec<Set>> {
    let mut stmt = conn.prepare(
        "SELECT id, training_id, exercise_id, order_in_training, rest_period, notes, created_at
         FROM sets WHERE exercise_id = ?1 AND training_id = ?2
         ORDER BY order_in_training",
    )?;
    let sets = stmt
        .query_map(params![exercise_id, training_id], map_set_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(sets)
}

/// Read-modify-write update; `NotFound` when the id does not exist.
pub fn update_set(conn: &Connection, id: &str, patch: SetPatch) -> Result<Set> {
    let mut set = get_set(conn, id)?.ok_or_else(|| StoreError::not_found("set", id))?;
    patch.merge_into(&mut set);

    conn.execute(
        "UPDATE sets
         SET training_id = ?2, exercise_id = ?3, order_in_training = ?4, rest_period = ?5, notes = ?6
         WHERE id = ?1",
        params![
            set.id,
            set.training_id,
            set.exercise_id,
            set.order_in_training,
            set.rest_period,
            set.notes,
        ],
    )?;

    Ok(set)
}

/// Remove a set by id; missing ids are a no-op.
pub fn delete_set(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM sets WHERE id = ?1", [id])?;
    Ok(())
}

/// Remove every set of one training in a single atomic statement. Rounds
/// must already be gone or the foreign key on `rounds.set_id` objects.
pub fn delete_sets_by_training_id(conn: &Connection, training_id: &str) -> Result<()> {
    let deleted = conn.execute("DELETE FROM sets WHERE training_id = ?1", [training_id])?;
    if deleted > 0 {
        debug!("deleted {deleted} sets for training {training_id}");
    }
    Ok(())
}
