//! Backup document behavior: full round trips, structural validation, and
//! compatibility of the exported JSON with the historical field names.

use anyhow::Result;
use rusqlite::Connection;
use workout_log_manager::models::{
    Exercise, ExerciseInput, Round, RoundInput, Set, SetInput, Training, TrainingInput, UserInput,
    WeightUnit,
};
use workout_log_manager::{db, StoreError};

fn open() -> Connection {
    db::open_in_memory().expect("open in-memory database")
}

fn seed_store(conn: &Connection) -> (Exercise, Training, Set, Round) {
    db::save_user(
        conn,
        UserInput {
            name: "Alex".to_string(),
        },
    )
    .expect("save user");

    let exercise = db::create_exercise(
        conn,
        ExerciseInput {
            name: "Bench Press".to_string(),
            weight_unit: Some(WeightUnit::Kg),
            steps: Some(2.5),
            ..Default::default()
        },
    )
    .expect("create exercise");
    let training =
        db::create_training(conn, TrainingInput::started_at(1_000)).expect("create training");
    let set = db::create_set(
        conn,
        SetInput {
            training_id: training.id.clone(),
            exercise_id: exercise.id.clone(),
            order_in_training: 0,
            rest_period: Some(120),
            notes: None,
        },
    )
    .expect("create set");
    let round = db::create_round(
        conn,
        RoundInput {
            set_id: set.id.clone(),
            order_in_set: 0,
            weight: 60.0,
            reps: 8,
            notes: None,
        },
    )
    .expect("create round");

    (exercise, training, set, round)
}

fn sorted_ids<T>(items: &[T], id: impl Fn(&T) -> &str) -> Vec<String> {
    let mut ids: Vec<String> = items.iter().map(|item| id(item).to_string()).collect();
    ids.sort();
    ids
}

#[test]
fn export_then_import_round_trips_every_store() -> Result<()> {
    let mut conn = open();
    seed_store(&conn);

    let document = db::export_data(&conn)?;
    assert_eq!(document.version, db::BACKUP_VERSION);

    // Extra records written after the export vanish on import.
    db::create_exercise(
        &conn,
        ExerciseInput {
            name: "Curl".to_string(),
            ..Default::default()
        },
    )?;

    db::import_data(&mut conn, &document)?;

    assert_eq!(
        sorted_ids(&db::get_all_exercises(&conn)?, |e| e.id.as_str()),
        sorted_ids(&document.data.exercises, |e| e.id.as_str()),
    );
    assert_eq!(
        sorted_ids(&db::get_all_trainings(&conn)?, |t| t.id.as_str()),
        sorted_ids(&document.data.trainings, |t| t.id.as_str()),
    );
    assert_eq!(
        sorted_ids(&db::get_all_sets(&conn)?, |s| s.id.as_str()),
        sorted_ids(&document.data.sets, |s| s.id.as_str()),
    );
    assert_eq!(
        sorted_ids(&db::get_all_rounds(&conn)?, |r| r.id.as_str()),
        sorted_ids(&document.data.rounds, |r| r.id.as_str()),
    );
    Ok(())
}

#[test]
fn import_into_a_fresh_store_preserves_records_exactly() -> Result<()> {
    let conn = open();
    let (exercise, training, set, round) = seed_store(&conn);
    let document = db::export_data(&conn)?;

    let mut fresh = open();
    db::import_data(&mut fresh, &document)?;

    // Ids and timestamps survive untouched, so the records compare equal.
    assert_eq!(db::get_exercise(&fresh, &exercise.id)?, Some(exercise));
    assert_eq!(db::get_training(&fresh, &training.id)?, Some(training));
    assert_eq!(db::get_set(&fresh, &set.id)?, Some(set));
    assert_eq!(db::get_round(&fresh, &round.id)?, Some(round));
    assert_eq!(db::get_user(&fresh)?, document.data.user);
    Ok(())
}

#[test]
fn documents_without_version_or_data_are_rejected() {
    let err = db::parse_document(r#"{"data": {}}"#).expect_err("missing version must fail");
    assert!(matches!(err, StoreError::InvalidBackup(_)));

    let err = db::parse_document(r#"{"version": 0, "data": {}}"#)
        .expect_err("zero version must fail");
    assert!(matches!(err, StoreError::InvalidBackup(_)));

    let err =
        db::parse_document(r#"{"version": 2}"#).expect_err("missing data must fail");
    assert!(matches!(err, StoreError::InvalidBackup(_)));

    let err = db::parse_document("not json at all").expect_err("garbage must fail");
    assert!(matches!(err, StoreError::Json(_)));
}

#[test]
fn import_without_user_leaves_the_user_store_empty() -> Result<()> {
    let mut conn = open();
    seed_store(&conn);
    let mut document = db::export_data(&conn)?;
    document.data.user = None;

    db::import_data(&mut conn, &document)?;
    assert!(db::get_user(&conn)?.is_none());
    Ok(())
}

#[test]
fn exported_json_keeps_the_historical_field_names() -> Result<()> {
    let conn = open();
    seed_store(&conn);

    let document = db::export_data(&conn)?;
    let value = serde_json::to_value(&document)?;

    assert_eq!(value["version"], 2);
    assert!(value["exportedAt"].as_i64().is_some());
    let exercise = &value["data"]["exercises"][0];
    assert_eq!(exercise["weightUnit"], "kg");
    assert!(exercise["createdAt"].as_i64().is_some());
    // Unset optionals are omitted entirely, matching the legacy exports.
    assert!(exercise.get("description").is_none());
    let training = &value["data"]["trainings"][0];
    assert_eq!(training["endTime"], 0);
    assert_eq!(training["startTime"], 1_000);
    let set = &value["data"]["sets"][0];
    assert_eq!(set["orderInTraining"], 0);
    assert_eq!(set["restPeriod"], 120);
    let round = &value["data"]["rounds"][0];
    assert_eq!(round["orderInSet"], 0);
    Ok(())
}

#[test]
fn backup_files_round_trip_through_disk() -> Result<()> {
    let conn = open();
    let (exercise, ..) = seed_store(&conn);

    let dir = std::env::temp_dir().join(format!(
        "workout_backup_{}_{}",
        std::process::id(),
        exercise.created_at,
    ));
    std::fs::create_dir_all(&dir)?;
    let path = dir.join("backup.json");

    db::export_to_file(&conn, &path)?;

    let mut fresh = open();
    db::import_from_file(&mut fresh, &path)?;
    assert_eq!(db::get_exercise(&fresh, &exercise.id)?, Some(exercise));

    std::fs::remove_dir_all(&dir)?;
    Ok(())
}

#[test]
fn clear_all_data_keeps_the_user_record() -> Result<()> {
    let mut conn = open();
    seed_store(&conn);

    db::clear_all_data(&mut conn)?;

    assert!(db::get_all_exercises(&conn)?.is_empty());
    assert!(db::get_all_trainings(&conn)?.is_empty());
    assert!(db::get_all_sets(&conn)?.is_empty());
    assert!(db::get_all_rounds(&conn)?.is_empty());
    assert!(db::get_user(&conn)?.is_some());
    Ok(())
}
