//! Common test utilities shared by the integration suites.
//!
//! - Fixtures: simulator configurations and wired-up simulators
//! - Event helpers: draining the channel and picking events apart

pub mod events;
pub mod fixtures;

#[allow(unused_imports)]
pub use events::*;
#[allow(unused_imports)]
pub use fixtures::*;
