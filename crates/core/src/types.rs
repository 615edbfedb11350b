/// Stored documents are keyed by MongoDB ObjectIds; the id doubles as
/// the pagination tie-break, so it must stay totally ordered.
pub type MomentId = bson::oid::ObjectId;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
