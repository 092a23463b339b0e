//! Mock service implementations for testing.

use crate::services::base::{AuthService, CommandExecutor, ServiceError};
use async_trait::async_trait;
use ep_protocol::service_models::{
    AuthStatus, ExecuteRequest, ExecuteResponse, LoginRequest, LoginResponse,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Executor returning a canned response, optionally after a delay.
#[derive(Clone)]
pub struct MockExecutor {
    response: Result<ExecuteResponse, ServiceError>,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl MockExecutor {
    pub fn new(response: Result<ExecuteResponse, ServiceError>) -> Self {
        Self {
            response,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn success(output: &str) -> Self {
        Self::new(Ok(ExecuteResponse::success(output)))
    }

    pub fn failure(output: &str) -> Self {
        Self::new(Ok(ExecuteResponse::failure(output)))
    }

    pub fn unreachable(message: &str) -> Self {
        Self::new(Err(ServiceError::Transport(message.to_string())))
    }

    /// Respond only after `delay` has elapsed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Number of `execute` calls made so far, across clones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CommandExecutor for MockExecutor {
    async fn execute(&self, _request: &ExecuteRequest) -> Result<ExecuteResponse, ServiceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}

/// Authenticator with a fixed status and an optional accepted login.
#[derive(Clone)]
pub struct MockAuth {
    status: Result<AuthStatus, ServiceError>,
    accepted: Option<(String, String)>,
}

impl MockAuth {
    pub fn authenticated() -> Self {
        Self {
            status: Ok(AuthStatus {
                authenticated: true,
            }),
            accepted: None,
        }
    }

    pub fn unauthenticated() -> Self {
        Self {
            status: Ok(AuthStatus {
                authenticated: false,
            }),
            accepted: None,
        }
    }

    pub fn unreachable(message: &str) -> Self {
        Self {
            status: Err(ServiceError::Transport(message.to_string())),
            accepted: None,
        }
    }

    /// Accept exactly this username/password pair at login.
    pub fn accepting(mut self, username: &str, password: &str) -> Self {
        self.accepted = Some((username.to_string(), password.to_string()));
        self
    }
}

#[async_trait]
impl AuthService for MockAuth {
    async fn status(&self) -> Result<AuthStatus, ServiceError> {
        self.status.clone()
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ServiceError> {
        let success = self
            .accepted
            .as_ref()
            .is_some_and(|(user, pass)| *user == request.username && *pass == request.password);
        Ok(LoginResponse { success })
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        self.status.clone().map(|_| ())
    }
}
