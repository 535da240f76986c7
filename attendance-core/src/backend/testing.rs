//! Scripted backend for tests: every endpoint pops its next reply from a
//! queue and counts calls, so tests can assert both outcomes and how many
//! network round-trips were made.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use super::{AttendanceBackend, CheckInReply, SessionSummary, TokenGrant};
use crate::error::AttendanceError;
use crate::models::{Section, SectionGroup, Student};

#[derive(Default)]
pub struct ScriptedBackend {
    pub session_lists: Mutex<Vec<Result<Vec<SessionSummary>, AttendanceError>>>,
    pub grants: Mutex<Vec<Result<TokenGrant, AttendanceError>>>,
    pub record_payloads: Mutex<Vec<Result<Value, AttendanceError>>>,
    pub check_in_replies: Mutex<Vec<Result<CheckInReply, AttendanceError>>>,
    pub section_lists: Mutex<Vec<Result<Vec<SectionGroup>, AttendanceError>>>,
    pub assignments: Mutex<Vec<Result<Student, AttendanceError>>>,

    pub list_calls: AtomicU32,
    pub grant_calls: AtomicU32,
    pub record_calls: AtomicU32,
    pub check_in_calls: AtomicU32,
    pub section_calls: AtomicU32,
    pub assign_calls: AtomicU32,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn pop<T>(queue: &Mutex<Vec<Result<T, AttendanceError>>>) -> Result<T, AttendanceError> {
        queue
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| Err(AttendanceError::Transport("script exhausted".to_string())))
    }

    pub fn push_grant(&self, grant: Result<TokenGrant, AttendanceError>) {
        self.grants.lock().unwrap().insert(0, grant);
    }

    pub fn push_session_list(&self, list: Result<Vec<SessionSummary>, AttendanceError>) {
        self.session_lists.lock().unwrap().insert(0, list);
    }

    pub fn push_records(&self, payload: Result<Value, AttendanceError>) {
        self.record_payloads.lock().unwrap().insert(0, payload);
    }

    pub fn push_check_in(&self, reply: Result<CheckInReply, AttendanceError>) {
        self.check_in_replies.lock().unwrap().insert(0, reply);
    }

    pub fn push_sections(&self, list: Result<Vec<SectionGroup>, AttendanceError>) {
        self.section_lists.lock().unwrap().insert(0, list);
    }

    pub fn push_assignment(&self, student: Result<Student, AttendanceError>) {
        self.assignments.lock().unwrap().insert(0, student);
    }
}

#[async_trait]
impl AttendanceBackend for ScriptedBackend {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, AttendanceError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.session_lists)
    }

    async fn generate_token(
        &self,
        _section: Section,
        _session_name: &str,
    ) -> Result<TokenGrant, AttendanceError> {
        self.grant_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.grants)
    }

    async fn attendance_records(&self, _token: &str) -> Result<Value, AttendanceError> {
        self.record_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.record_payloads)
    }

    async fn check_in(
        &self,
        _token: &str,
        _user_id: &str,
    ) -> Result<CheckInReply, AttendanceError> {
        self.check_in_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.check_in_replies)
    }

    async fn sections(&self) -> Result<Vec<SectionGroup>, AttendanceError> {
        self.section_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.section_lists)
    }

    async fn assign_section(
        &self,
        _student_id: &str,
        _new_section: &str,
    ) -> Result<Student, AttendanceError> {
        self.assign_calls.fetch_add(1, Ordering::SeqCst);
        Self::pop(&self.assignments)
    }
}
