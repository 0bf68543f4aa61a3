//! Collaborator interface for the "training in progress" indicator. The
//! persistence layer only reports when a session starts, how long it has
//! been running, and when it ends; rendering the indicator (and asking for
//! whatever permissions that takes) is the host application's business.

use log::info;

/// Cadence at which the host is expected to call
/// [`TrainingNotifier::training_progress`] for the active session.
pub const PROGRESS_INTERVAL_MS: i64 = 60_000;

pub trait TrainingNotifier {
    /// A training session has started.
    fn training_started(&self, training_id: &str, start_time: i64);

    /// Periodic progress report for the active session.
    fn training_progress(&self, training_id: &str, start_time: i64, elapsed_minutes: i64);

    /// The active session has ended; any persistent indicator should clear.
    fn training_ended(&self, training_id: &str);
}

/// Whole minutes elapsed since `start_time`, clamped at zero so a clock that
/// jumped backwards never produces a negative duration.
pub fn elapsed_minutes(start_time: i64, now: i64) -> i64 {
    (now - start_time).max(0) / PROGRESS_INTERVAL_MS
}

/// Notifier that writes through the `log` facade, giving headless builds and
/// tests a working collaborator without a UI attached.
pub struct LogNotifier;

impl TrainingNotifier for LogNotifier {
    fn training_started(&self, training_id: &str, start_time: i64) {
        info!("training {training_id} started at {start_time}");
    }

    fn training_progress(&self, training_id: &str, _start_time: i64, elapsed_minutes: i64) {
        info!("training {training_id} in progress for {elapsed_minutes} min");
    }

    fn training_ended(&self, training_id: &str) {
        info!("training {training_id} ended");
    }
}

#[cfg(test)]
mod tests {
    use super::elapsed_minutes;

    #[test]
    fn elapsed_minutes_rounds_down_and_clamps() {
        assert_eq!(elapsed_minutes(0, 59_999), 0);
        assert_eq!(elapsed_minutes(0, 60_000), 1);
        assert_eq!(elapsed_minutes(0, 3_599_999), 59);
        assert_eq!(elapsed_minutes(1_000, 0), 0);
    }
}
