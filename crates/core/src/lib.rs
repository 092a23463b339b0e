//! # ep-core
//!
//! Core simulation engine for Extendipede.
//!
//! This crate provides:
//! - The oscillator and pipeline primitives
//! - The stage scheduler and its cancellable run task
//! - Command execution and authentication seams with local implementations
//! - Configuration loading from the `.extendipede/` directory
//! - Project initialization from embedded templates
//!
//! ## Modules
//!
//! - [`oscillator`]: The sinusoidal clock signal
//! - [`pipeline`]: Stage flags and token propagation
//! - [`scheduler`]: Run lifecycle and the [`scheduler::Simulator`] facade
//! - [`services`]: Executor and auth traits, implementations and mocks
//! - [`config`]: Configuration loading and validation
//! - [`init`]: `.extendipede/` generation

pub mod config;
pub mod init;
pub mod oscillator;
pub mod pipeline;
pub mod scheduler;
pub mod services;
