//! Repository for exercise definitions. Exercises are independent roots
//! referenced by sets; their `name` carries a unique index, so a duplicate
//! insert surfaces as a typed error instead of silently overwriting.

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode, OptionalExtension, Row};

use crate::error::{Result, StoreError};
use crate::models::{Exercise, ExerciseInput, ExercisePatch, WeightUnit};
use crate::util::{generate_unique_id, now};

// Weight units are persisted as their lowercase text form.
impl ToSql for WeightUnit {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(self.as_str().into())
    }
}

impl FromSql for WeightUnit {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value.as_str()? {
            "kg" => Ok(Self::Kg),
            "lb" => Ok(Self::Lb),
            other => Err(FromSqlError::Other(
                format!("unknown weight unit '{other}'").into(),
            )),
        }
    }
}

fn map_exercise_row(row: &Row<'_>) -> rusqlite::Result<Exercise> {
    Ok(Exercise {
        id: row.get(0)?,
        name: row.get(1)?,
        description: row.get(2)?,
        kind: row.get(3)?,
        body_part: row.get(4)?,
        weight_unit: row.get(5)?,
        steps: row.get(6)?,
        created_at: row.get(7)?,
    })
}

/// Insert a new exercise with defaults applied (kg, step size 1), returning
/// the hydrated record so callers can use it without re-querying.
pub fn create_exercise(conn: &Connection, input: ExerciseInput) -> Result<Exercise> {
    let steps = input.steps.unwrap_or(1.0);
    validate_exercise_fields(&input.name, steps)?;

    let exercise = Exercise {
        id: generate_unique_id(),
        name: input.name,
        description: input.description,
        kind: input.kind,
        body_part: input.body_part,
        weight_unit: input.weight_unit.unwrap_or_default(),
        steps,
        created_at: now(),
    };

    conn.execute(
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
    )
    .map_err(|err| map_name_conflict(err, &exercise.name))?;

    Ok(exercise)
}

/// Point lookup by id. A missing record is a normal `None`, not an error.
pub fn get_exercise(conn: &Connection, id: &str) -> Result<Option<Exercise>> {
    conn.query_row(
        "SELECT id, name, description, kind, body_part, weight_unit, steps, created_at
         FROM exercises WHERE id = ?1",
        [id],
        map_exercise_row,
    )
    .optional()
    .map_err(StoreError::from)
}

/// Lookup through the unique name index.
pub fn get_exercise_by_name(conn: &Connection, name: &str) -> Result<Option<Exercise>> {
    conn.query_row(
        "SELECT id, name, description, kind, body_part, weight_unit, steps, created_at
         FROM exercises WHERE name = ?1",
        [name],
        map_exercise_row,
    )
    .optional()
    .map_err(StoreError::from)
}

/// Fetch every exercise in store order; callers impose display ordering.
pub fn get_all_exercises(conn: &Connection) -> Result<Vec<Exercise>> {
    let mut stmt = conn.prepare(
        "SELECT id, name, description, kind, body_part, weight_unit, steps, created_at
         FROM exercises",
    )?;
    let exercises = stmt
        .query_map([], map_exercise_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(exercises)
}

/// Read-modify-write update: merges the patch over the stored record and
/// persists the whole merged row. Fails with `NotFound` for unknown ids.
pub fn update_exercise(conn: &Connection, id: &str, patch: ExercisePatch) -> Result<Exercise> {
    let mut exercise =
        get_exercise(conn, id)?.ok_or_else(|| StoreError::not_found("exercise", id))?;
    patch.merge_into(&mut exercise);
    validate_exercise_fields(&exercise.name, exercise.steps)?;

    conn.execute(
        "UPDATE exercises
         SET name = ?2, description = ?3, kind = ?4, body_part = ?5, weight_unit = ?6, steps = ?7
         WHERE id = ?1",
        params![
            exercise.id,
            exercise.name,
            exercise.description,
            exercise.kind,
            exercise.body_part,
            exercise.weight_unit,
            exercise.steps,
        ],
    )
    .map_err(|err| map_name_conflict(err, &exercise.name))?;

    Ok(exercise)
}

/// Remove an exercise by id. Deleting a missing id is a no-op so cascades
/// stay idempotent. The referenced-by-sets policy check lives in
/// `queries::delete_exercise_checked`.
pub fn delete_exercise(conn: &Connection, id: &str) -> Result<()> {
    conn.execute("DELETE FROM exercises WHERE id = ?1", [id])?;
    Ok(())
}

/// Whether an exercise with exactly this name already exists.
pub fn exercise_name_exists(conn: &Connection, name: &str) -> Result<bool> {
    Ok(get_exercise_by_name(conn, name)?.is_some())
}

fn validate_exercise_fields(name: &str, steps: f64) -> Result<()> {
    if name.trim().is_empty() {
        return Err(StoreError::invalid_input(
            "name",
            "exercise name must not be empty",
        ));
    }
    if !steps.is_finite() || steps <= 0.0 {
        return Err(StoreError::invalid_input(
            "steps",
            format!("step size must be a positive number, got {steps}"),
        ));
    }
    Ok(())
}

/// Coerce the unique-name constraint violation into a typed error. Other
/// SQLite errors pass through unchanged.
fn map_name_conflict(err: SqlError, name: &str) -> StoreError {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        StoreError::DuplicateExerciseName {
            name: name.to_string(),
        }
    } else {
        err.into()
    }
}
