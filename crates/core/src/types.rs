/// All primary keys are UUIDs.
pub type DbId = uuid::Uuid;

/// Opaque session identifier handed to clients as the bearer token.
pub type SessionId = uuid::Uuid;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
