//! Backend REST collaborator contract.
//!
//! The backend is an opaque collaborator: only the wire shapes the core
//! relies on are modeled here. [`AttendanceBackend`] is the seam between the
//! components and the wire; [`rest::RestBackend`] is the production
//! implementation and tests script their own.

pub mod rest;
pub mod retry;
#[cfg(test)]
pub mod testing;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::error::AttendanceError;
use crate::models::{Section, SectionGroup, Student};

/// Header carrying the caller's identity on every backend call.
pub const USER_ID_HEADER: &str = "X-User-Id";

/// One entry of `GET /sessions`. Older deployments report the token under
/// `id` instead of `sessionToken`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    #[serde(default)]
    pub session_token: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
    pub session_name: String,
    pub section: String,
    #[serde(deserialize_with = "crate::models::deserialize_datetime_lenient")]
    pub expires_at: DateTime<Utc>,
}

impl SessionSummary {
    /// Token identity, falling back to `id` when `sessionToken` is absent.
    pub fn token(&self) -> Option<&str> {
        self.session_token
            .as_deref()
            .or(self.id.as_deref())
            .filter(|t| !t.is_empty())
    }
}

/// Response of `POST /generate-token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenGrant {
    pub token: String,
    #[serde(default)]
    pub expires_in_minutes: Option<u32>,
}

/// Success body of `POST /check-in`.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckInReply {
    pub message: String,
}

#[async_trait]
pub trait AttendanceBackend: Send + Sync {
    /// `GET /sessions`: every session the backend knows about.
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, AttendanceError>;

    /// `POST /generate-token`: issue a token + expiry for a new session.
    async fn generate_token(
        &self,
        section: Section,
        session_name: &str,
    ) -> Result<TokenGrant, AttendanceError>;

    /// `GET /attendance/{token}`: raw record payload for a session. The
    /// backend sometimes returns a JSON-encoded string instead of a list, so
    /// the payload is handed back undecoded; see
    /// [`crate::reconciler::decode_records`].
    async fn attendance_records(&self, token: &str) -> Result<Value, AttendanceError>;

    /// `POST /check-in`: submit a token on behalf of `user_id`.
    async fn check_in(&self, token: &str, user_id: &str)
        -> Result<CheckInReply, AttendanceError>;

    /// `GET /sections`: roster grouped by section.
    async fn sections(&self) -> Result<Vec<SectionGroup>, AttendanceError>;

    /// `PUT /assign/{student_id}`: move a student to another section.
    async fn assign_section(
        &self,
        student_id: &str,
        new_section: &str,
    ) -> Result<Student, AttendanceError>;
}
