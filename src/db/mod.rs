//! Persistence module split across logical submodules: connection/schema
//! setup, one repository per store, the composite query layer, and backups.

mod backup;
mod connection;
mod exercises;
mod queries;
mod rounds;
mod sets;
mod trainings;
mod user;

pub use backup::{
    clear_all_data, export_data, export_to_file, import_data, import_from_file, parse_document,
    BackupData, BackupDocument, BACKUP_VERSION,
};
pub use connection::{close, open_at, open_default, open_in_memory};
pub use exercises::{
    create_exercise, delete_exercise, exercise_name_exists, get_all_exercises, get_exercise,
    get_exercise_by_name, update_exercise,
};
pub use queries::{
    add_complete_training, delete_exercise_checked, delete_training_cascade, get_exercise_history,
    get_last_set_for_exercise, get_last_used_weight_for_exercise, get_training_with_details,
    CompleteTrainingInput, ExerciseGroup, PlannedRound, PlannedSet,
};
pub use rounds::{
    create_round, delete_round, delete_rounds_by_set_id, get_all_rounds, get_round,
    get_rounds_by_set_id, update_round,
};
pub use sets::{
    create_set, delete_set, delete_sets_by_training_id, get_all_sets, get_set,
    get_sets_by_exercise_and_training, get_sets_by_exercise_id, get_sets_by_training_id,
    update_set,
};
pub use trainings::{
    create_training, delete_training, get_active_training, get_all_trainings, get_training,
    get_trainings_by_date_range, get_trainings_by_start_time, update_training,
};
pub use user::{get_user, has_user, save_user, update_user_name, USER_ID};
