//! In-memory session authentication.

use crate::config::models::AuthSettings;
use crate::services::base::{AuthService, ServiceError};
use async_trait::async_trait;
use ep_protocol::service_models::{AuthStatus, LoginRequest, LoginResponse};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Checks logins against a single configured credential pair.
///
/// Without credentials the authenticator is open: `status` always reports
/// authenticated and every login succeeds.
pub struct SessionAuth {
    credentials: Option<AuthSettings>,
    logged_in: AtomicBool,
}

impl SessionAuth {
    pub fn new(credentials: AuthSettings) -> Self {
        Self {
            credentials: Some(credentials),
            logged_in: AtomicBool::new(false),
        }
    }

    /// An authenticator that lets everyone through.
    pub fn open() -> Self {
        Self {
            credentials: None,
            logged_in: AtomicBool::new(false),
        }
    }
}

#[async_trait]
impl AuthService for SessionAuth {
    async fn status(&self) -> Result<AuthStatus, ServiceError> {
        let authenticated = self.credentials.is_none() || self.logged_in.load(Ordering::SeqCst);
        Ok(AuthStatus { authenticated })
    }

    async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ServiceError> {
        let Some(expected) = &self.credentials else {
            return Ok(LoginResponse { success: true });
        };

        let success =
            request.username == expected.username && request.password == expected.password;
        if success {
            info!(username = %request.username, "login succeeded");
            self.logged_in.store(true, Ordering::SeqCst);
        } else {
            warn!(username = %request.username, "login rejected");
        }
        Ok(LoginResponse { success })
    }

    async fn logout(&self) -> Result<(), ServiceError> {
        if self.logged_in.swap(false, Ordering::SeqCst) {
            info!("logged out");
        }
        Ok(())
    }
}
