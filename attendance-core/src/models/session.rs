use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Class/section a session is scoped to. `All` is the sentinel meaning every
/// section is eligible.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(ascii_case_insensitive)]
pub enum Section {
    A,
    B,
    C,
    All,
}

/// Derived session state. The transition is one-directional: once a session
/// has been observed `Expired` no code path sets it back to `Active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionStatus {
    Active,
    Expired,
}

/// A time-bounded attendance window identified by a backend-issued token.
///
/// `expires_at` is the authoritative expiry; `time_left` and `status` are
/// derived presentation state, recomputed from `expires_at` on load and
/// mirrored by the per-second tick afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub title: String,
    pub eligible_section: Section,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub time_left: u64,
    pub status: SessionStatus,
}

impl Session {
    /// Whole seconds remaining until `expires_at`, clamped at zero.
    pub fn remaining_secs(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> u64 {
        expires_at
            .signed_duration_since(now)
            .num_seconds()
            .max(0) as u64
    }

    /// Status as a pure function of remaining time.
    pub fn status_for(time_left: u64) -> SessionStatus {
        if time_left > 0 {
            SessionStatus::Active
        } else {
            SessionStatus::Expired
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }
}
