use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use url::Url;

use super::retry::RetryPolicy;
use super::{AttendanceBackend, CheckInReply, SessionSummary, TokenGrant, USER_ID_HEADER};
use crate::config::Config;
use crate::error::AttendanceError;
use crate::models::{Section, SectionGroup, Student};

/// Production backend collaborator over REST.
///
/// One instance per caller identity: every request carries the configured
/// `X-User-Id` header, except check-in which attaches the submitting
/// student's identity.
pub struct RestBackend {
    client: reqwest::Client,
    base_url: String,
    user_id: String,
}

impl RestBackend {
    pub fn new(config: &Config) -> Result<Self, AttendanceError> {
        // Validate the base URL up front so later calls can format paths
        // without re-checking.
        Url::parse(&config.backend_url)
            .map_err(|e| AttendanceError::Validation(format!("invalid backend URL: {}", e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;

        Ok(RestBackend {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
            user_id: config.user_id.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Convert a non-success response body into a descriptive failure: the
    /// server's `{message}` when present, else the body prefix, else a
    /// generic status-coded message.
    fn server_error(status: u16, body: &str) -> AttendanceError {
        let generic = format!("Server error (Status: {})", status);
        let message = match serde_json::from_str::<Value>(body) {
            Ok(parsed) => parsed
                .get("message")
                .and_then(|m| m.as_str())
                .filter(|m| !m.is_empty())
                .map(|m| m.to_string())
                .unwrap_or(generic),
            Err(_) => {
                let prefix: String = body.chars().take(100).collect();
                if prefix.trim().is_empty() {
                    generic
                } else {
                    prefix
                }
            }
        };
        AttendanceError::Server { status, message }
    }

    async fn decode<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, AttendanceError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(Self::server_error(status, &body));
        }
        serde_json::from_str(&body).map_err(|e| AttendanceError::Decode(e.to_string()))
    }

    /// Like [`Self::decode`] but keeps the payload undecoded: some
    /// deployments return the record list as a JSON-encoded string.
    async fn read_payload(response: reqwest::Response) -> Result<Value, AttendanceError> {
        let status = response.status().as_u16();
        let body = response.text().await?;
        if !(200..300).contains(&status) {
            return Err(Self::server_error(status, &body));
        }
        Ok(serde_json::from_str(&body).unwrap_or(Value::String(body)))
    }
}

#[async_trait::async_trait]
impl AttendanceBackend for RestBackend {
    async fn list_sessions(&self) -> Result<Vec<SessionSummary>, AttendanceError> {
        let url = self.endpoint("sessions");
        RetryPolicy::read()
            .run(|| async {
                let response = self
                    .client
                    .get(&url)
                    .header(USER_ID_HEADER, &self.user_id)
                    .send()
                    .await?;
                Self::decode(response).await
            })
            .await
    }

    async fn generate_token(
        &self,
        section: Section,
        session_name: &str,
    ) -> Result<TokenGrant, AttendanceError> {
        let mut url = Url::parse(&self.endpoint("generate-token"))
            .map_err(|e| AttendanceError::Validation(format!("invalid endpoint: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("section", &section.to_string())
            .append_pair("sessionName", session_name);
        let url = url.to_string();

        RetryPolicy::write()
            .run(|| async {
                let response = self
                    .client
                    .post(&url)
                    .header(USER_ID_HEADER, &self.user_id)
                    .send()
                    .await?;
                Self::decode(response).await
            })
            .await
    }

    async fn attendance_records(&self, token: &str) -> Result<Value, AttendanceError> {
        let url = self.endpoint(&format!("attendance/{}", token));
        RetryPolicy::read()
            .run(|| async {
                let response = self
                    .client
                    .get(&url)
                    .header(USER_ID_HEADER, &self.user_id)
                    .send()
                    .await?;
                Self::read_payload(response).await
            })
            .await
    }

    async fn check_in(
        &self,
        token: &str,
        user_id: &str,
    ) -> Result<CheckInReply, AttendanceError> {
        let url = self.endpoint("check-in");
        let body = json!({ "token": token });
        RetryPolicy::write()
            .run(|| async {
                let response = self
                    .client
                    .post(&url)
                    .header(USER_ID_HEADER, user_id)
                    .json(&body)
                    .send()
                    .await?;
                Self::decode(response).await
            })
            .await
    }

    async fn sections(&self) -> Result<Vec<SectionGroup>, AttendanceError> {
        let url = self.endpoint("sections");
        RetryPolicy::read()
            .run(|| async {
                let response = self
                    .client
                    .get(&url)
                    .header(USER_ID_HEADER, &self.user_id)
                    .send()
                    .await?;
                Self::decode(response).await
            })
            .await
    }

    async fn assign_section(
        &self,
        student_id: &str,
        new_section: &str,
    ) -> Result<Student, AttendanceError> {
        let url = self.endpoint(&format!("assign/{}", student_id));
        let body = json!({ "newSection": new_section });
        RetryPolicy::write()
            .run(|| async {
                let response = self
                    .client
                    .put(&url)
                    .header(USER_ID_HEADER, &self.user_id)
                    .json(&body)
                    .send()
                    .await?;
                Self::decode(response).await
            })
            .await
    }
}
