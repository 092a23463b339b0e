//! Resolving the command a run animates.
//!
//! Resolution checks the session, issues the execution call, and folds every
//! outcome (success, failed command, unreachable service, missing login)
//! into one [`CommandResult`]. It never fails.

use crate::services::{AuthService, CommandExecutor};
use ep_protocol::service_models::{ExecuteRequest, ExecuteResponse};
use std::sync::Arc;
use tracing::{debug, warn};

/// Result text used when the session is not authenticated.
pub const AUTH_REQUIRED_MESSAGE: &str = "Authentication required";

/// The text a completed run emits, plus whether the command succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandResult {
    pub success: bool,
    pub text: String,
}

impl CommandResult {
    /// Render an execution response: output verbatim on success,
    /// `Error: <output>` otherwise.
    pub fn from_response(response: &ExecuteResponse) -> Self {
        let text = if response.success {
            response.output.clone()
        } else {
            format!("Error: {}", response.output)
        };
        Self {
            success: response.success,
            text,
        }
    }

    /// The placeholder for a run blocked by authentication.
    pub fn auth_required() -> Self {
        Self {
            success: false,
            text: AUTH_REQUIRED_MESSAGE.to_string(),
        }
    }
}

/// Check the session and, if allowed, execute `command`.
///
/// An unreachable auth service counts as not authenticated. An unreachable
/// executor becomes a failed response carrying the error message.
pub async fn resolve_command(
    executor: Arc<dyn CommandExecutor>,
    auth: Arc<dyn AuthService>,
    command: String,
) -> CommandResult {
    match auth.status().await {
        Ok(status) if status.authenticated => {}
        Ok(_) => {
            debug!("session not authenticated, skipping execution");
            return CommandResult::auth_required();
        }
        Err(e) => {
            warn!(error = %e, "auth status check failed");
            return CommandResult::auth_required();
        }
    }

    let response = match executor.execute(&ExecuteRequest::new(command)).await {
        Ok(response) => response,
        Err(e) => {
            warn!(error = %e, "command execution call failed");
            ExecuteResponse::failure(e.to_string())
        }
    };
    CommandResult::from_response(&response)
}
