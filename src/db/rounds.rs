//! Repository for rounds, the weight × reps entries recorded inside a set.

use log::debug;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::models::{Round, RoundInput, RoundPatch};
use crate::util::{generate_unique_id, now};

fn map_round_row(row: &Row<'_>) -> rusqlite::Result<Round> {
    Ok(Round {
        id: row.get(0)?,
        set_id: row.get(1)?,
        order_in_set: row.get(2)?,
        weight: row.get(3)?,
        reps: row.get(4)?,
        notes: row.get(5)?,
        created_at: row.get(6)?,
    })
}

/// Insert a new round, returning the hydrated record.
pub fn create_round(conn: &Connection, input: RoundInput) -> Result<Round> {
    validate_weight(input.weight)?;

    let round = Round {
        id: generate_unique_id(),
        set_id: input.set_id,
        order_in_set: input.order_in_set,
        weight: input.weight,
        reps: input.reps,
        notes: input.notes,
        created_at: now(),
    };

    conn.execute(
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

    Ok(round)
}

pub fn get_round(conn: &Connection, id: &str) -> Result<Option<Round>> {
    conn.query_row(
        "SELECT id, set_id, order_in_set, weight, reps, notes, created_at
         FROM rounds WHERE id = ?1",
        [id],
        map_round_row,
    )
    .optional()
    .map_err(StoreError::from)
}

pub fn get_all_rounds(conn: &Connection) -> Result<Vec<Round>> {
    let mut stmt = conn.prepare(
        "SELECT id, set_id, order_in_set, weight, reps, notes, created_at FROM rounds",
    )?;
    let rounds = stmt
        .query_map([], map_round_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rounds)
}

/// Every round of one set, in its recorded position order.
pub fn get_rounds_by_set_id(conn: &Connection, set_id: &str) -> Result<Vec<Round>> {
    let mut stmt = conn.prepare(
        "SELECT id, set_id, order_in_set, weight, reps, notes, created_at
         FROM rounds WHERE set_id = ?1
         ORDER BY order_in_set",
    )?;
    let rounds = stmt
        .query_map([set_id], map_round_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(rounds)
}

/// Read-modify-write update; `NotFound` when the id does not exist.
pub fn update_round(conn: &Connection, id: &str, patch: RoundPatch) -> Result<Round> {
    let mut round = get_round(conn, id)?.ok_or_else(|| StoreError::not_found("round", id))?;
    patch.merge_into(&mut round);
    validate_weight(round.weight)?;

    conn.execute(
        "UPDATE rounds
         SET set_id = ?2, order_in_set = ?3, weight = ?4, reps = ?5, notes = ?6
         WHERE id = ?1",
        params![
            round.id,
            round.set_id,
            round.order_in_set,
            round.weight,
            round.reps,
            round.notes,
        ],
    )?;

    Ok(round)
}

/// Remove a round by id; missing ids are a no-op.
pub fn delete_round(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM rounds WHERE id = ?1", [id])?;
    Ok(())
}

/// Remove every round of one set in a single atomic statement.
pub fn delete_rounds_by_set_id(conn: &Connection, set_id: &str) -> Result<()> {
    let deleted = conn.execute("DELETE FROM rounds WHERE set_id = ?1", [set_id])?;
    if deleted > 0 {
        debug!("deleted {deleted} rounds for set {set_id}");
    }
    Ok(())
}

fn validate_weight(weight: f64) -> Result<()> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(StoreError::invalid_input(
            "weight",
            format!("weight must be a non-negative number, got {weight}"),
        ));
    }
    Ok(())
}
