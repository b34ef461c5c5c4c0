use chrono::SubsecRound;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Current time truncated to microseconds.
///
/// PostgreSQL `TIMESTAMPTZ` stores microseconds; writing a nanosecond value
/// would read back as a different instant and break compare-and-swap on
/// `updated_at`.
pub fn now() -> Timestamp {
    chrono::Utc::now().trunc_subsecs(6)
}
