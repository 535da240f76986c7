//! Session Registry: the admin view's ordered set of attendance sessions.
//!
//! The registry only grows: a session is never deleted, it becomes
//! `Expired` and stays visible for audit. Every mutation replaces the
//! ordered sequence wholesale instead of editing entries in place, so a
//! concurrent reader always sees a consistent snapshot.

mod ticker;

pub use ticker::CountdownTicker;

use std::sync::Arc;

use chrono::{Duration, Utc};
use parking_lot::RwLock;

use crate::backend::AttendanceBackend;
use crate::error::AttendanceError;
use crate::models::{Section, Session, SessionStatus};

/// Registry shared between the owning view and the countdown ticker.
pub type SharedRegistry = Arc<RwLock<SessionRegistry>>;

/// Admin request to open a new attendance window.
#[derive(Debug, Clone)]
pub struct NewSession {
    pub title: String,
    pub section: Section,
    pub duration_minutes: u32,
}

#[derive(Default)]
pub struct SessionRegistry {
    sessions: Vec<Session>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        SessionRegistry::default()
    }

    pub fn shared() -> SharedRegistry {
        Arc::new(RwLock::new(SessionRegistry::new()))
    }

    /// Adopt an existing snapshot, e.g. state restored by the owning view.
    pub fn from_sessions(sessions: Vec<Session>) -> Self {
        SessionRegistry { sessions }
    }

    /// Create a session: validate locally, delegate token/expiry issuance to
    /// the backend, then prepend the new session (newest first). On backend
    /// failure nothing is added and the error propagates to the caller.
    pub async fn create(
        &mut self,
        backend: &dyn AttendanceBackend,
        request: NewSession,
    ) -> Result<Session, AttendanceError> {
        let title = request.title.trim().to_string();
        if title.is_empty() {
            return Err(AttendanceError::Validation(
                "Please fill the session title and select a class/section.".to_string(),
            ));
        }
        if !(1..=60).contains(&request.duration_minutes) {
            return Err(AttendanceError::Validation(
                "Session duration must be between 1 and 60 minutes.".to_string(),
            ));
        }

        let grant = backend.generate_token(request.section, &title).await?;

        // The backend decides the real expiry; the requested duration is
        // the fallback when it reports none, or a zero-minute window that
        // would open the session already expired.
        let minutes = grant
            .expires_in_minutes
            .filter(|m| *m > 0)
            .unwrap_or(request.duration_minutes);
        let now = Utc::now();
        let time_left = u64::from(minutes) * 60;
        let session = Session {
            token: grant.token,
            title,
            eligible_section: request.section,
            created_at: now,
            expires_at: now + Duration::minutes(i64::from(minutes)),
            time_left,
            status: Session::status_for(time_left),
        };

        let mut next = Vec::with_capacity(self.sessions.len() + 1);
        next.push(session.clone());
        next.extend(self.sessions.iter().cloned());
        self.sessions = next;

        log::debug!(
            "[REGISTRY] created session '{}' ({}s window)",
            session.title,
            session.time_left
        );
        Ok(session)
    }

    /// Per-second maintenance: decrement every running countdown, freezing
    /// at zero and marking the session expired. This is the only place
    /// client-side status changes after creation, and it is a presentation
    /// mirror; the backend stays authoritative for token acceptance.
    pub fn tick(&mut self) {
        self.sessions = self
            .sessions
            .iter()
            .map(|s| {
                if s.time_left > 0 {
                    let time_left = s.time_left - 1;
                    Session {
                        time_left,
                        status: Session::status_for(time_left),
                        ..s.clone()
                    }
                } else {
                    Session {
                        time_left: 0,
                        status: SessionStatus::Expired,
                        ..s.clone()
                    }
                }
            })
            .collect();
    }

    /// Ordered snapshot: active sessions before expired ones; within active,
    /// most remaining time first. The sort is stable, so expired sessions
    /// (all at zero) keep their insertion order.
    pub fn list(&self) -> Vec<Session> {
        let mut snapshot = self.sessions.clone();
        snapshot.sort_by(|a, b| {
            b.is_active()
                .cmp(&a.is_active())
                .then(b.time_left.cmp(&a.time_left))
        });
        snapshot
    }

    /// Reconcile with the backend on view mount: remaining time is
    /// reconstructed from the authoritative `expires_at`, and sessions whose
    /// window already closed server-side are expired immediately, without
    /// waiting for a tick.
    pub async fn load(
        &mut self,
        backend: &dyn AttendanceBackend,
    ) -> Result<(), AttendanceError> {
        let summaries = backend.list_sessions().await?;
        let now = Utc::now();

        let sessions: Vec<Session> = summaries
            .into_iter()
            .filter_map(|summary| {
                let token = match summary.token() {
                    Some(t) => t.to_string(),
                    None => {
                        log::warn!(
                            "[REGISTRY] dropping session '{}' with no token",
                            summary.session_name
                        );
                        return None;
                    }
                };
                let section = summary
                    .section
                    .parse::<Section>()
                    .unwrap_or(Section::All);
                let time_left = Session::remaining_secs(summary.expires_at, now);
                Some(Session {
                    token,
                    title: summary.session_name,
                    eligible_section: section,
                    created_at: now,
                    expires_at: summary.expires_at,
                    time_left,
                    status: Session::status_for(time_left),
                })
            })
            .collect();

        log::debug!("[REGISTRY] loaded {} sessions from backend", sessions.len());
        self.sessions = sessions;
        Ok(())
    }

    pub fn get(&self, token: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.token == token)
    }

    pub fn sessions(&self) -> &[Session] {
        &self.sessions
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
