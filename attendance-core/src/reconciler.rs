//! Check-in Reconciler: resolves a scanned token against the backend and
//! exposes the authoritative per-session record list to the admin view.

use std::sync::Arc;

use serde_json::Value;

use crate::backend::AttendanceBackend;
use crate::error::AttendanceError;
use crate::models::CheckInRecord;

/// Shortest token the scanner will accept. Anything shorter is a mis-read,
/// rejected locally before any network call.
pub const MIN_TOKEN_LEN: usize = 10;

/// Result of a check-in submission. Business rejections are normal outcomes
/// carrying the server's message verbatim, not transport errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckInOutcome {
    Accepted(String),
    Rejected(String),
}

pub struct CheckInReconciler {
    backend: Arc<dyn AttendanceBackend>,
}

impl CheckInReconciler {
    pub fn new(backend: Arc<dyn AttendanceBackend>) -> Self {
        CheckInReconciler { backend }
    }

    /// Submit a scanned token on behalf of `student_id`.
    ///
    /// Exactly one attempt is made; retrying a submission could double-count
    /// a check-in server-side. Duplicate-submission and other business
    /// rejections come back as [`CheckInOutcome::Rejected`]; only transport
    /// failures surface as errors. No local record is ever fabricated: the
    /// source of truth for who checked in is always re-fetched.
    pub async fn submit(
        &self,
        token: &str,
        student_id: &str,
    ) -> Result<CheckInOutcome, AttendanceError> {
        if student_id.trim().is_empty() {
            return Err(AttendanceError::Validation(
                "User must be logged in to check attendance.".to_string(),
            ));
        }

        let token = token.trim();
        if token.len() < MIN_TOKEN_LEN || token.starts_with("blob:") {
            return Err(AttendanceError::Validation(
                "Invalid QR code detected. Please scan a valid attendance QR.".to_string(),
            ));
        }

        match self.backend.check_in(token, student_id).await {
            Ok(reply) => {
                log::debug!("[CHECK_IN] accepted for '{}'", student_id);
                Ok(CheckInOutcome::Accepted(reply.message))
            }
            Err(err) if err.is_rejection() => {
                log::debug!("[CHECK_IN] rejected for '{}': {}", student_id, err);
                Ok(CheckInOutcome::Rejected(err.to_string()))
            }
            Err(err) => Err(err),
        }
    }

    /// Fetch the record list for a session token. The caller replaces its
    /// displayed list wholesale; a malformed payload degrades to an empty
    /// list rather than throwing into the view.
    pub async fn fetch_records(
        &self,
        token: &str,
    ) -> Result<Vec<CheckInRecord>, AttendanceError> {
        let payload = self.backend.attendance_records(token).await?;
        Ok(decode_records(payload))
    }
}

/// Decode the record payload, which arrives either as a structured list or
/// as a JSON-encoded string needing a secondary parse. Anything that fails
/// to decode yields an empty list.
pub fn decode_records(payload: Value) -> Vec<CheckInRecord> {
    let value = match payload {
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(parsed) => parsed,
            Err(_) => {
                log::warn!("[CHECK_IN] unparseable record payload, degrading to empty list");
                return Vec::new();
            }
        },
        other => other,
    };
    serde_json::from_value(value).unwrap_or_default()
}
