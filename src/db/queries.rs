//! Cross-entity queries composed from the per-entity repositories: hydrated
//! training views, per-exercise history, "last weight used" derivations, the
//! bulk training constructor, and the guarded/cascading deletes. Operations
//! that touch more than one table run inside a single SQLite transaction, so
//! a failure partway through rolls the whole operation back.

use log::info;
use rusqlite::Connection;

use super::{exercises, rounds, sets, trainings};
use crate::error::{Result, StoreError};
use crate::models::{
    ExerciseHistory, LastSet, LastUsedWeight, RoundInput, Set, SetDetails, SetInput,
    TrainingHistoryEntry, TrainingInput, TrainingWithDetails, SetWithRounds,
};

/// Bulk input for [`add_complete_training`]: one training plus its planned
/// sets grouped per exercise, in the order they were performed.
#[derive(Debug, Clone)]
pub struct CompleteTrainingInput {
    pub training: TrainingInput,
    pub exercises: Vec<ExerciseGroup>,
}

#[derive(Debug, Clone)]
pub struct ExerciseGroup {
    pub exercise_id: String,
    pub sets: Vec<PlannedSet>,
}

#[derive(Debug, Clone, Default)]
pub struct PlannedSet {
    pub rest_period: Option<u32>,
    pub notes: Option<String>,
    pub rounds: Vec<PlannedRound>,
}

#[derive(Debug, Clone)]
pub struct PlannedRound {
    pub weight: f64,
    pub reps: u32,
    pub notes: Option<String>,
}

/// Load a training with its sets in position order, each carrying the full
/// referenced exercise and its ordered rounds. `None` if the training itself
/// is absent. A set whose exercise record has vanished is store corruption
/// and surfaces as `NotFound` rather than being papered over.
pub fn get_training_with_details(
    conn: &Connection,
    training_id: &str,
) -> Result<Option<TrainingWithDetails>> {
    let Some(training) = trainings::get_training(conn, training_id)? else {
        return Ok(None);
    };

    let mut details = Vec::new();
    for set in sets::get_sets_by_training_id(conn, training_id)? {
        let exercise = exercises::get_exercise(conn, &set.exercise_id)?
            .ok_or_else(|| StoreError::not_found("exercise", &set.exercise_id))?;
        let rounds = rounds::get_rounds_by_set_id(conn, &set.id)?;
        details.push(SetDetails {
            set,
            exercise,
            rounds,
        });
    }

    Ok(Some(TrainingWithDetails {
        training,
        sets: details,
    }))
}

/// Everything ever recorded for one exercise: its sets across all trainings,
/// grouped per training with rounds attached, most recent training first.
/// `None` if the exercise itself is absent; a group whose training record is
/// missing is dropped.
pub fn get_exercise_history(
    conn: &Connection,
    exercise_id: &str,
) -> Result<Option<ExerciseHistory>> {
    let Some(exercise) = exercises::get_exercise(conn, exercise_id)? else {
        return Ok(None);
    };

    let mut by_training: Vec<(String, Vec<Set>)> = Vec::new();
    for set in sets::get_sets_by_exercise_id(conn, exercise_id)? {
        match by_training.iter_mut().find(|(id, _)| *id == set.training_id) {
            Some((_, group)) => group.push(set),
            None => by_training.push((set.training_id.clone(), vec![set])),
        }
    }

    let mut history = Vec::new();
    for (training_id, mut group) in by_training {
        let Some(training) = trainings::get_training(conn, &training_id)? else {
            continue;
        };
        group.sort_by_key(|set| set.order_in_training);

        let mut with_rounds = Vec::new();
        for set in group {
            let rounds = rounds::get_rounds_by_set_id(conn, &set.id)?;
            with_rounds.push(SetWithRounds { set, rounds });
        }
        history.push(TrainingHistoryEntry {
            training,
            sets: with_rounds,
        });
    }

    history.sort_by(|a, b| b.training.start_time.cmp(&a.training.start_time));

    Ok(Some(ExerciseHistory { exercise, history }))
}

/// Weight and reps of the final round of the final set from the most recent
/// training the exercise appeared in. Passing the in-progress training id as
/// `exclude_training_id` keeps a running session from seeing its own entries
/// as history. `None` when no history remains after the exclusion or the
/// last set holds no rounds.
pub fn get_last_used_weight_for_exercise(
    conn: &Connection,
    exercise_id: &str,
    exclude_training_id: Option<&str>,
) -> Result<Option<LastUsedWeight>> {
    let Some(entry) = most_recent_history_entry(conn, exercise_id, exclude_training_id)? else {
        return Ok(None);
    };
    let Some(last_set) = entry.sets.last() else {
        return Ok(None);
    };
    let Some(last_round) = last_set.rounds.last() else {
        return Ok(None);
    };
    Ok(Some(LastUsedWeight {
        weight: last_round.weight,
        reps: last_round.reps,
        date: entry.training.start_time,
    }))
}

/// Like [`get_last_used_weight_for_exercise`] but returning the whole round
/// sequence of that last set, for display.
pub fn get_last_set_for_exercise(
    conn: &Connection,
    exercise_id: &str,
    exclude_training_id: Option<&str>,
) -> Result<Option<LastSet>> {
    let Some(mut entry) = most_recent_history_entry(conn, exercise_id, exclude_training_id)? else {
        return Ok(None);
    };
    let Some(last_set) = entry.sets.pop() else {
        return Ok(None);
    };
    if last_set.rounds.is_empty() {
        return Ok(None);
    }
    Ok(Some(LastSet {
        rounds: last_set.rounds,
        date: entry.training.start_time,
    }))
}

fn most_recent_history_entry(
    conn: &Connection,
    exercise_id: &str,
    exclude_training_id: Option<&str>,
) -> Result<Option<TrainingHistoryEntry>> {
    let Some(history) = get_exercise_history(conn, exercise_id)? else {
        return Ok(None);
    };
    Ok(history
        .history
        .into_iter()
        .find(|entry| exclude_training_id.map_or(true, |id| entry.training.id != id)))
}

/// Bulk constructor recording a finished session in one transaction: the
/// training, then one set per planned set in input order (positions assigned
/// sequentially from 0 across all groups) with rounds in input order
/// (positions from 0 per set). An unknown exercise id fails the whole
/// operation and nothing is persisted. Returns the hydrated result in the
/// same shape as [`get_training_with_details`].
pub fn add_complete_training(
    conn: &mut Connection,
    input: CompleteTrainingInput,
) -> Result<TrainingWithDetails> {
    let tx = conn.transaction()?;

    let training = trainings::create_training(&tx, input.training)?;

    let mut details = Vec::new();
    let mut order_in_training = 0;
    for group in input.exercises {
        let exercise = exercises::get_exercise(&tx, &group.exercise_id)?
            .ok_or_else(|| StoreError::not_found("exercise", &group.exercise_id))?;

        for planned in group.sets {
            let set = sets::create_set(
                &tx,
                SetInput {
                    training_id: training.id.clone(),
                    exercise_id: group.exercise_id.clone(),
                    order_in_training,
                    rest_period: planned.rest_period,
                    notes: planned.notes,
                },
            )?;
            order_in_training += 1;

            let mut recorded = Vec::new();
            for (order_in_set, round) in planned.rounds.into_iter().enumerate() {
                recorded.push(rounds::create_round(
                    &tx,
                    RoundInput {
                        set_id: set.id.clone(),
                        order_in_set: order_in_set as u32,
                        weight: round.weight,
                        reps: round.reps,
                        notes: round.notes,
                    },
                )?);
            }

            details.push(SetDetails {
                set,
                exercise: exercise.clone(),
                rounds: recorded,
            });
        }
    }

    tx.commit()?;
    info!(
        "recorded complete training {} with {} sets",
        training.id,
        details.len()
    );

    Ok(TrainingWithDetails {
        training,
        sets: details,
    })
}

/// Delete a training together with its sets and their rounds, in
/// round-then-set-then-training order inside one transaction. Idempotent for
/// ids that are already gone.
pub fn delete_training_cascade(conn: &mut Connection, training_id: &str) -> Result<()> {
    let tx = conn.transaction()?;
    for set in sets::get_sets_by_training_id(&tx, training_id)? {
        rounds::delete_rounds_by_set_id(&tx, &set.id)?;
    }
    sets::delete_sets_by_training_id(&tx, training_id)?;
    trainings::delete_training(&tx, training_id)?;
    tx.commit()?;

    info!("deleted training {training_id} and its sets and rounds");
    Ok(())
}

/// Policy gate in front of exercise deletion: an exercise still referenced
/// by any set is refused with `ExerciseInUse` so history stays resolvable.
pub fn delete_exercise_checked(conn: &Connection, exercise_id: &str) -> Result<()> {
    let references = sets::get_sets_by_exercise_id(conn, exercise_id)?;
    if !references.is_empty() {
        return Err(StoreError::ExerciseInUse {
            id: exercise_id.to_string(),
            count: references.len(),
        });
    }
    exercises::delete_exercise(conn, exercise_id)
}
