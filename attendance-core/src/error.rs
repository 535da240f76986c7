use thiserror::Error;

/// Failure taxonomy for the attendance core.
///
/// Nothing here is fatal to the process: callers convert these into
/// user-visible notifications at the operation boundary.
#[derive(Debug, Error)]
pub enum AttendanceError {
    /// Local precondition failure, rejected before any network call is made.
    #[error("{0}")]
    Validation(String),

    /// Transport-level failure (connect, timeout, DNS). Reads retry these;
    /// the final failure surfaces only after the attempt ceiling.
    #[error("network error: {0}")]
    Transport(String),

    /// Non-success HTTP status. `message` carries the server's own message
    /// when the error body had one, and is passed through verbatim.
    #[error("{message}")]
    Server { status: u16, message: String },

    /// Response arrived but could not be decoded into the expected shape.
    #[error("malformed response: {0}")]
    Decode(String),

    /// Code-image fetch or export failure. Degrades to a visible error
    /// state, never a crash.
    #[error("code render failed: {0}")]
    Render(String),
}

impl AttendanceError {
    /// True for server-reported business rejections (4xx), which are normal
    /// outcomes for a check-in submission rather than transport errors.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AttendanceError::Server { status, .. } if (400..500).contains(status))
    }
}

impl From<reqwest::Error> for AttendanceError {
    fn from(err: reqwest::Error) -> Self {
        AttendanceError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_classification() {
        let dup = AttendanceError::Server {
            status: 409,
            message: "You have already checked in.".to_string(),
        };
        assert!(dup.is_rejection());

        let outage = AttendanceError::Server {
            status: 503,
            message: "Server error (Status: 503)".to_string(),
        };
        assert!(!outage.is_rejection());

        assert!(!AttendanceError::Transport("connection refused".to_string()).is_rejection());
    }

    #[test]
    fn test_server_message_passes_through_verbatim() {
        let err = AttendanceError::Server {
            status: 403,
            message: "Session has expired.".to_string(),
        };
        assert_eq!(err.to_string(), "Session has expired.");
    }
}
