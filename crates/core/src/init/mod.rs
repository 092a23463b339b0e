//! Project initialization.
//!
//! `extendipede init` creates `.extendipede/config.toml` in a project root
//! from an embedded template that spells out every default.

pub mod error;
pub mod generator;
pub mod templates;

pub use error::{InitError, InitResult};
pub use generator::{generate_project_config, InitOptions};
pub use templates::get_template;
