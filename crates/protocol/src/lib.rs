//! # ep-protocol
//!
//! Core protocol definitions and data models for extendipede.
//!
//! This crate defines all shared data structures used for:
//! - Simulator configuration (stage count, oscillator frequency, tick timing)
//! - The request/response shapes of the command-execution and
//!   authentication services
//! - Read-only run and tick snapshots handed to presentation layers
//! - Inter-process communication between a host (CLI, web front-end) and Core
//!
//! ## Modules
//!
//! - [`config_models`]: Simulator configuration and partial updates
//! - [`service_models`]: Command execution and authentication payloads
//! - [`run_models`]: Run status, tick snapshots and the observable run view
//! - [`ipc`]: Operations and Events for Core-host communication
//!
//! ## Design Principles
//!
//! - Minimal dependencies: Only serde, ts-rs, uuid and chrono
//! - TypeScript generation: All types derive `TS` for client compatibility
//! - Independent compilation: No dependencies on other extendipede crates

pub mod config_models;
pub mod ipc;
pub mod run_models;
pub mod service_models;

// Re-export all public types for convenience
pub use config_models::*;
pub use ipc::*;
pub use run_models::*;
pub use service_models::*;
