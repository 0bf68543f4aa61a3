//! Identity and timestamp helpers used by every create operation.

use chrono::Utc;
use uuid::Uuid;

/// Produce a fresh record identifier: a random UUID v4 rendered as hyphenated
/// text. Ids are never reused and carry no ordering information.
pub fn generate_unique_id() -> String {
    Uuid::new_v4().to_string()
}

/// Current wall-clock time in integer milliseconds since the Unix epoch.
/// Used uniformly for `created_at`/`updated_at` stamps and as the default
/// start time a caller picks when opening a training session.
pub fn now() -> i64 {
    Utc::now().timestamp_millis()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique_and_hyphenated() {
        let a = generate_unique_id();
        let b = generate_unique_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
        assert_eq!(a.matches('-').count(), 4);
    }

    #[test]
    fn now_returns_millisecond_timestamps() {
        let before = now();
        let after = now();
        assert!(after >= before);
        // Sanity bound: anything earlier than 2020 means seconds, not millis.
        assert!(before > 1_577_836_800_000);
    }
}
