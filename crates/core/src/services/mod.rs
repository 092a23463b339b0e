//! External service seams.
//!
//! This module provides the `CommandExecutor` and `AuthService` traits
//! (Adapter Pattern) and their implementations: a local allow-listed
//! executor, an in-memory session authenticator, and mocks for tests.

pub mod base;
pub mod command_line;
pub mod local_executor;
pub mod mock;
pub mod session_auth;

pub use base::{AuthService, CommandExecutor, ServiceError};
pub use local_executor::LocalExecutor;
pub use mock::{MockAuth, MockExecutor};
pub use session_auth::SessionAuth;
