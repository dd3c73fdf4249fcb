/// Primary keys are UUIDs issued by the auth provider (profiles) or
/// `gen_random_uuid()` (everything else).
pub type DbId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
