//! Local persistence layer for a personal workout tracker.
//!
//! Everything lives in one embedded SQLite database: exercise definitions,
//! training sessions, the sets performed in each session, the weight × reps
//! rounds inside every set, and a singleton user record. The `db` module
//! exposes per-store repositories plus the composite queries pages are built
//! on (hydrated training detail, per-exercise history, last-used-weight
//! lookups, full-store backups). Presentation is deliberately absent; a UI
//! layer consumes this API.
pub mod db;
pub mod error;
pub mod models;
pub mod notifications;
pub mod util;

/// Convenience re-exports for opening the embedded store. The caller owns
/// the connection and passes it into the repository functions.
pub use db::{open_at, open_default, open_in_memory};

/// The error surface shared by every persistence operation.
pub use error::{Result, StoreError};

/// The domain record types other layers manipulate.
pub use models::{Exercise, Round, Set, Training, TrainingStatus, User, WeightUnit};
