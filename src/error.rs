//! Typed error surface shared by every persistence operation. Each variant
//! maps to one failure class a caller may want to branch on: missing records,
//! constraint violations, rejected input, malformed backups, and an
//! unavailable store. Engine and file-system faults pass through transparently.

use thiserror::Error;

/// Result alias used across the persistence modules.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// An update or composite lookup referenced an id that is not in the
    /// store. Point lookups return `Ok(None)` instead.
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: String },

    /// Exercise names carry a unique index; inserting a duplicate fails
    /// rather than silently overwriting the existing record.
    #[error("exercise name '{name}' already exists")]
    DuplicateExerciseName { name: String },

    /// Policy refusal: the exercise is still referenced by existing sets.
    #[error("exercise {id} is referenced by {count} existing set(s)")]
    ExerciseInUse { id: String, count: usize },

    /// Caller-supplied field rejected before the store was touched.
    #[error("invalid {field}: {message}")]
    InvalidInput { field: &'static str, message: String },

    /// A backup document failed structural validation.
    #[error("invalid backup document: {0}")]
    InvalidBackup(&'static str),

    /// The database could not be opened, or its schema is newer than this
    /// build understands. Logged at the call site, surfaced once, no retry.
    #[error("database unavailable: {reason}")]
    Unavailable { reason: String },

    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub(crate) fn invalid_input(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            message: message.into(),
        }
    }
}
