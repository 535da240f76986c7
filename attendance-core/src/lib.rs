//! Client-side core of a QR-code attendance system.
//!
//! Two cooperating components drive the admin and student flows:
//! - [`registry::SessionRegistry`] tracks attendance sessions created by an
//!   admin and owns the per-second countdown toward each session's expiry.
//! - [`reconciler::CheckInReconciler`] submits scanned tokens to the backend
//!   and exposes the authoritative per-session check-in records.
//!
//! The backend is an opaque REST collaborator reached through the
//! [`backend::AttendanceBackend`] trait; [`backend::rest::RestBackend`] is the
//! production implementation. All reads go through the shared retry policy in
//! [`backend::retry`]; writes are never retried.

pub mod backend;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod qr;
pub mod reconciler;
pub mod registry;
pub mod roster;

pub use config::Config;
pub use error::AttendanceError;
pub use models::{CheckInRecord, Section, Session, SessionStatus};
pub use reconciler::{CheckInOutcome, CheckInReconciler};
pub use registry::{CountdownTicker, NewSession, SessionRegistry, SharedRegistry};
