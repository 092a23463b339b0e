//! Payloads exchanged with the external services.
//!
//! The simulator consumes two services: a command-execution endpoint and an
//! authentication service. Their request and response shapes live here so
//! that real transports and test fakes agree on them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Request body for the command-execution service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ExecuteRequest {
    /// The raw command line to run.
    pub command: String,
}

impl ExecuteRequest {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// Response from the command-execution service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, TS)]
pub struct ExecuteResponse {
    /// Whether the command ran and exited successfully.
    pub success: bool,

    /// Standard output on success, a diagnostic message on failure.
    pub output: String,

    /// Short machine-oriented error summary, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExecuteResponse {
    /// A successful response carrying `output`.
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    /// A failed response whose `output` is the diagnostic message.
    pub fn failure(output: impl Into<String>) -> Self {
        Self {
            success: false,
            output: output.into(),
            error: None,
        }
    }

    /// Attach a short error summary.
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Response from the authentication status check.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
pub struct AuthStatus {
    pub authenticated: bool,
}

/// Request body for the authentication login call.
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, TS)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Response from the authentication login call.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, TS)]
pub struct LoginResponse {
    pub success: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_debug_hides_password() {
        let request = LoginRequest {
            username: "operator".to_string(),
            password: "hunter2".to_string(),
        };

        let rendered = format!("{request:?}");
        assert!(rendered.contains("operator"));
        assert!(!rendered.contains("hunter2"));
    }
}
