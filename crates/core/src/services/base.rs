//! Service traits the simulator consumes.
//!
//! The scheduler never talks to a transport directly. It holds an
//! `Arc<dyn CommandExecutor>` and an `Arc<dyn AuthService>`; the local
//! executor, the session authenticator and the test mocks all plug in here.

use async_trait::async_trait;
use ep_protocol::service_models::{
    AuthStatus, ExecuteRequest, ExecuteResponse, LoginRequest, LoginResponse,
};
use thiserror::Error;

/// Failure to reach or talk to a service.
///
/// A command that ran and failed is not a `ServiceError`; it is an
/// [`ExecuteResponse`] with `success: false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Authentication error: {0}")]
    Auth(String),
}

/// Runs a command and reports its output.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn execute(&self, request: &ExecuteRequest) -> Result<ExecuteResponse, ServiceError>;
}

/// Session authentication.
#[async_trait]
pub trait AuthService: Send + Sync {
    async fn status(&self) -> Result<AuthStatus, ServiceError>;
    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ServiceError>;
    /// End the current session. Logging out without a session is not an error.
    async fn logout(&self) -> Result<(), ServiceError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoExecutor;

    #[async_trait]
    impl CommandExecutor for EchoExecutor {
        async fn execute(
            &self,
            request: &ExecuteRequest,
        ) -> Result<ExecuteResponse, ServiceError> {
            if request.command.is_empty() {
                return Err(ServiceError::Transport("connection reset".to_string()));
            }
            Ok(ExecuteResponse::success(request.command.clone()))
        }
    }

    #[tokio::test]
    async fn test_executor_trait_object() {
        let executor: Box<dyn CommandExecutor> = Box::new(EchoExecutor);

        let response = executor.execute(&ExecuteRequest::new("hi")).await.unwrap();
        assert_eq!(response, ExecuteResponse::success("hi"));

        let err = executor.execute(&ExecuteRequest::new("")).await.unwrap_err();
        assert_eq!(err.to_string(), "Transport error: connection reset");
    }
}
