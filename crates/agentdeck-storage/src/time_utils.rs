use chrono::{DateTime, Utc};

/// Get current UTC timestamp.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}
