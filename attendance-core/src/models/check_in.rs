use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Server-persisted evidence that a student submitted a valid token within a
/// session's active window. Read-only on the client; the admin view replaces
/// its record list wholesale from the backend, never merges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInRecord {
    pub user_id: String,
    #[serde(deserialize_with = "super::deserialize_datetime_lenient")]
    pub check_in_time: DateTime<Utc>,
}
