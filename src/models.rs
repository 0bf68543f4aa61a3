//! Domain models that mirror the SQLite schema and get passed throughout the
//! persistence and query layers. These types stay light-weight data holders;
//! all query logic lives in the `db` modules. The serde attributes pin the
//! JSON field names to the historical backup format (camelCase, integer
//! `endTime` with 0 meaning "still active") so old exports keep importing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unit an exercise's weights are entered in. Stored and serialized as the
/// lowercase strings `"kg"` / `"lb"`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeightUnit {
    #[default]
    Kg,
    Lb,
}

impl WeightUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Kg => "kg",
            Self::Lb => "lb",
        }
    }
}

impl fmt::Display for WeightUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a training session is still running. The store and the backup
/// format keep a single integer `end_time` where 0 means "active"; this enum
/// replaces that sentinel inside the API so callers cannot forget to check it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrainingStatus {
    Active,
    Completed { end_time: i64 },
}

impl TrainingStatus {
    /// Decode the persisted integer form.
    pub fn from_end_time_ms(end_time: i64) -> Self {
        if end_time == 0 {
            Self::Active
        } else {
            Self::Completed { end_time }
        }
    }

    /// Encode back to the persisted integer form (0 for active).
    pub fn end_time_ms(self) -> i64 {
        match self {
            Self::Active => 0,
            Self::Completed { end_time } => end_time,
        }
    }

    pub fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }
}

/// Serde shim mapping `TrainingStatus` onto the integer `endTime` field.
mod end_time_ms {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TrainingStatus;

    pub fn serialize<S: Serializer>(
        status: &TrainingStatus,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(status.end_time_ms())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<TrainingStatus, D::Error> {
        i64::deserialize(deserializer).map(TrainingStatus::from_end_time_ms)
    }
}

/// A named movement definition reusable across trainings. `name` is unique in
/// the store; `steps` is the weight increment granularity pickers offer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Free-form category such as "strength" or "cardio".
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body_part: Option<String>,
    pub weight_unit: WeightUnit,
    pub steps: f64,
    pub created_at: i64,
}

/// One workout session bounded by its start time and completion status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Training {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warm_up: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub calm_down: Option<String>,
    pub start_time: i64,
    #[serde(rename = "endTime", with = "end_time_ms")]
    pub status: TrainingStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
}

impl Training {
    pub fn is_active(&self) -> bool {
        self.status.is_active()
    }
}

/// One exercise slot within a training. `order_in_training` positions the set
/// among its siblings; gaps left by deletions are tolerated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Set {
    pub id: String,
    pub training_id: String,
    pub exercise_id: String,
    pub order_in_training: u32,
    /// Rest between rounds, in seconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rest_period: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
}

/// One performed weight × reps entry within a set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: String,
    pub set_id: String,
    pub order_in_set: u32,
    pub weight: f64,
    pub reps: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: i64,
}

/// The singleton account record. There is at most one row, with the fixed id
/// exposed as `db::USER_ID`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for [`crate::db::create_exercise`]: everything but the generated
/// id/created_at. `weight_unit` defaults to kg and `steps` to 1 when omitted.
#[derive(Debug, Clone, Default)]
pub struct ExerciseInput {
    pub name: String,
    pub description: Option<String>,
    pub kind: Option<String>,
    pub body_part: Option<String>,
    pub weight_unit: Option<WeightUnit>,
    pub steps: Option<f64>,
}

/// Input for [`crate::db::create_training`].
#[derive(Debug, Clone)]
pub struct TrainingInput {
    pub name: Option<String>,
    pub warm_up: Option<String>,
    pub calm_down: Option<String>,
    pub start_time: i64,
    pub status: TrainingStatus,
    pub notes: Option<String>,
}

impl TrainingInput {
    /// An active session starting at `start_time` with no optional fields set.
    pub fn started_at(start_time: i64) -> Self {
        Self {
            name: None,
            warm_up: None,
            calm_down: None,
            start_time,
            status: TrainingStatus::Active,
            notes: None,
        }
    }
}

/// Input for [`crate::db::create_set`].
#[derive(Debug, Clone)]
pub struct SetInput {
    pub training_id: String,
    pub exercise_id: String,
    pub order_in_training: u32,
    pub rest_period: Option<u32>,
    pub notes: Option<String>,
}

/// Input for [`crate::db::create_round`].
#[derive(Debug, Clone)]
pub struct RoundInput {
    pub set_id: String,
    pub order_in_set: u32,
    pub weight: f64,
    pub reps: u32,
    pub notes: Option<String>,
}

/// Input for [`crate::db::save_user`].
#[derive(Debug, Clone)]
pub struct UserInput {
    pub name: String,
}

// Partial updates are explicit patch structs rather than loose maps. The
// merge rule is uniform: `Some` replaces the stored value, `None` preserves
// it. Optional record fields use a nested `Option` so `Some(None)` clears the
// stored value while a plain `None` leaves it untouched.

#[derive(Debug, Clone, Default)]
pub struct ExercisePatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub kind: Option<Option<String>>,
    pub body_part: Option<Option<String>>,
    pub weight_unit: Option<WeightUnit>,
    pub steps: Option<f64>,
}

impl ExercisePatch {
    pub fn merge_into(self, exercise: &mut Exercise) {
        if let Some(name) = self.name {
            exercise.name = name;
        }
        if let Some(description) = self.description {
            exercise.description = description;
        }
        if let Some(kind) = self.kind {
            exercise.kind = kind;
        }
        if let Some(body_part) = self.body_part {
            exercise.body_part = body_part;
        }
        if let Some(weight_unit) = self.weight_unit {
            exercise.weight_unit = weight_unit;
        }
        if let Some(steps) = self.steps {
            exercise.steps = steps;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TrainingPatch {
    pub name: Option<Option<String>>,
    pub warm_up: Option<Option<String>>,
    pub calm_down: Option<Option<String>>,
    pub start_time: Option<i64>,
    pub status: Option<TrainingStatus>,
    pub notes: Option<Option<String>>,
}

impl TrainingPatch {
    pub fn merge_into(self, training: &mut Training) {
        if let Some(name) = self.name {
            training.name = name;
        }
        if let Some(warm_up) = self.warm_up {
            training.warm_up = warm_up;
        }
        if let Some(calm_down) = self.calm_down {
            training.calm_down = calm_down;
        }
        if let Some(start_time) = self.start_time {
            training.start_time = start_time;
        }
        if let Some(status) = self.status {
            training.status = status;
        }
        if let Some(notes) = self.notes {
            training.notes = notes;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SetPatch {
    pub training_id: Option<String>,
    pub exercise_id: Option<String>,
    pub order_in_training: Option<u32>,
    pub rest_period: Option<Option<u32>>,
    pub notes: Option<Option<String>>,
}

impl SetPatch {
    pub fn merge_into(self, set: &mut Set) {
        if let Some(training_id) = self.training_id {
            set.training_id = training_id;
        }
        if let Some(exercise_id) = self.exercise_id {
            set.exercise_id = exercise_id;
        }
        if let Some(order_in_training) = self.order_in_training {
            set.order_in_training = order_in_training;
        }
        if let Some(rest_period) = self.rest_period {
            set.rest_period = rest_period;
        }
        if let Some(notes) = self.notes {
            set.notes = notes;
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RoundPatch {
    pub set_id: Option<String>,
    pub order_in_set: Option<u32>,
    pub weight: Option<f64>,
    pub reps: Option<u32>,
    pub notes: Option<Option<String>>,
}

impl RoundPatch {
    pub fn merge_into(self, round: &mut Round) {
        if let Some(set_id) = self.set_id {
            round.set_id = set_id;
        }
        if let Some(order_in_set) = self.order_in_set {
            round.order_in_set = order_in_set;
        }
        if let Some(weight) = self.weight {
            round.weight = weight;
        }
        if let Some(reps) = self.reps {
            round.reps = reps;
        }
        if let Some(notes) = self.notes {
            round.notes = notes;
        }
    }
}

// Composite views assembled by `db::queries`. Nested records are embedded in
// full rather than referenced by id, so a page can render without issuing
// follow-up lookups.

/// A set with its referenced exercise and ordered rounds attached.
#[derive(Debug, Clone, PartialEq)]
pub struct SetDetails {
    pub set: Set,
    pub exercise: Exercise,
    pub rounds: Vec<Round>,
}

/// A training with every set hydrated, ordered by `order_in_training`.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingWithDetails {
    pub training: Training,
    pub sets: Vec<SetDetails>,
}

/// A set with its ordered rounds, used inside history groupings.
#[derive(Debug, Clone, PartialEq)]
pub struct SetWithRounds {
    pub set: Set,
    pub rounds: Vec<Round>,
}

/// One training's worth of sets for a particular exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingHistoryEntry {
    pub training: Training,
    pub sets: Vec<SetWithRounds>,
}

/// Everything ever recorded for one exercise, most recent training first.
#[derive(Debug, Clone, PartialEq)]
pub struct ExerciseHistory {
    pub exercise: Exercise,
    pub history: Vec<TrainingHistoryEntry>,
}

/// The weight/reps of the final round of the final set the exercise was last
/// trained with, paired with that training's start time.
#[derive(Debug, Clone, PartialEq)]
pub struct LastUsedWeight {
    pub weight: f64,
    pub reps: u32,
    pub date: i64,
}

/// The full round sequence of the last set recorded for an exercise.
#[derive(Debug, Clone, PartialEq)]
pub struct LastSet {
    pub rounds: Vec<Round>,
    pub date: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn training_status_round_trips_the_zero_sentinel() {
        assert_eq!(TrainingStatus::from_end_time_ms(0), TrainingStatus::Active);
        assert_eq!(
            TrainingStatus::from_end_time_ms(5000),
            TrainingStatus::Completed { end_time: 5000 }
        );
        assert_eq!(TrainingStatus::Active.end_time_ms(), 0);
        assert_eq!(TrainingStatus::Completed { end_time: 5000 }.end_time_ms(), 5000);
    }

    #[test]
    fn patch_merge_replaces_present_and_preserves_absent() {
        let mut exercise = Exercise {
            id: "x".to_string(),
            name: "Squat".to_string(),
            description: Some("legs".to_string()),
            kind: None,
            body_part: Some("Legs".to_string()),
            weight_unit: WeightUnit::Kg,
            steps: 2.5,
            created_at: 1,
        };

        ExercisePatch {
            steps: Some(5.0),
            description: Some(None),
            ..Default::default()
        }
        .merge_into(&mut exercise);

        assert_eq!(exercise.steps, 5.0);
        assert_eq!(exercise.description, None);
        assert_eq!(exercise.name, "Squat");
        assert_eq!(exercise.body_part.as_deref(), Some("Legs"));
    }
}
