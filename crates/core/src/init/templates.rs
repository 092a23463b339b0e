//! Embedded template files for `.extendipede` initialization.
//!
//! Templates live in the workspace `templates/` directory and are compiled
//! into the binary with `rust-embed`, so `extendipede init` works without any
//! files next to the executable.

use rust_embed::RustEmbed;

/// Embedded files from the workspace `templates/` directory.
///
/// With the `debug-embed` feature, debug builds read the same files from the
/// compiled-in copy rather than the filesystem.
#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/../../templates"]
pub struct TemplateAssets;

/// Get template file content by path.
///
/// # Example
/// ```
/// use ep_core::init::templates::get_template;
///
/// let config = get_template("config.toml").expect("config.toml should exist");
/// assert!(config.contains("[simulator]"));
/// ```
pub fn get_template(path: &str) -> Option<String> {
    TemplateAssets::get(path).map(|file| String::from_utf8_lossy(file.data.as_ref()).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_config_template() {
        let content = get_template("config.toml").expect("config.toml should be embedded");
        assert!(content.contains("[simulator]"));
        assert!(content.contains("[executor]"));
        assert!(content.contains("[logging]"));
    }

    #[test]
    fn test_get_nonexistent_template() {
        assert!(get_template("nonexistent.txt").is_none());
    }
}
