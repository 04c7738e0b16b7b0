//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults are
//! overridden by a user `config.toml` in the source root. Every key is
//! optional; the defaults reproduce the fixed layout the generator was built
//! around (`_photos/*.jpg` in, `_site/photos/` out).
//!
//! ## Configuration Options
//!
//! ```toml
//! title = "Photos"          # Site title, exposed to layouts as site.title
//! destination = "_site"     # Output directory, relative to the source root
//! layouts_dir = "_layouts"  # Directory of layout templates
//!
//! [photos]
//! dir = "_photos"           # Where photos are discovered (non-recursive)
//! extensions = ["jpg"]      # Which files count as photos
//! permalink_dir = "/photos" # URL prefix of every photo
//! layout = "photo"          # Layout each photo is rendered with
//! write_pages = false       # Also write the rendered page as {url}.html
//!
//! [index]
//! enabled = true            # Write {permalink_dir}/index.html listing all photos
//! layout = "index"          # Layout for the listing (built-in page if missing)
//! title = "Photos"
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site title, available to templates as `site.title`.
    pub title: String,
    /// Output directory. Relative paths resolve against the source root.
    pub destination: String,
    /// Directory holding `*.html` layout templates.
    pub layouts_dir: String,
    /// Photo discovery and permalink settings.
    pub photos: PhotosConfig,
    /// Listing page settings.
    pub index: IndexConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Photos".to_string(),
            destination: "_site".to_string(),
            layouts_dir: "_layouts".to_string(),
            photos: PhotosConfig::default(),
            index: IndexConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.photos.extensions.is_empty() {
            return Err(ConfigError::Validation(
                "photos.extensions must not be empty".into(),
            ));
        }
        if let Some(ext) = self
            .photos
            .extensions
            .iter()
            .find(|e| e.is_empty() || e.contains(['.', '/']))
        {
            return Err(ConfigError::Validation(format!(
                "photos.extensions entry {ext:?} must be a bare extension like \"jpg\""
            )));
        }
        if !self.photos.permalink_dir.starts_with('/') {
            return Err(ConfigError::Validation(
                "photos.permalink_dir must start with '/'".into(),
            ));
        }
        if self.photos.dir.is_empty() {
            return Err(ConfigError::Validation("photos.dir must not be empty".into()));
        }
        Ok(())
    }

    /// Whether a file extension (without the dot) marks a photo.
    pub fn is_photo_extension(&self, ext: &str) -> bool {
        self.photos
            .extensions
            .iter()
            .any(|e| e.eq_ignore_ascii_case(ext))
    }
}

/// Photo discovery and permalink settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhotosConfig {
    pub dir: String,
    pub extensions: Vec<String>,
    pub permalink_dir: String,
    pub layout: String,
    pub write_pages: bool,
}

impl Default for PhotosConfig {
    fn default() -> Self {
        Self {
            dir: "_photos".to_string(),
            extensions: vec!["jpg".to_string()],
            permalink_dir: "/photos".to_string(),
            layout: "photo".to_string(),
            write_pages: false,
        }
    }
}

/// Listing page settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct IndexConfig {
    pub enabled: bool,
    pub layout: String,
    pub title: String,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            layout: "index".to_string(),
            title: "Photos".to_string(),
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// Tables merge key-by-key; any other overlay value replaces the base value.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the file does not exist.
pub fn load_raw_config(path: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = path.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given source root.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    resolve_config(stock_defaults_value(), load_raw_config(root)?)
}

/// Returns a fully-commented stock `config.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# photo-dump configuration
# All settings are optional. Values shown below are the defaults.
# Unknown keys will cause an error.

# Site title, available to layouts as {{ site.title }}
title = "Photos"

# Output directory, relative to the source root
destination = "_site"

# Layout templates (minijinja syntax), keyed by file stem:
#   _layouts/photo.html  -> layout "photo"
layouts_dir = "_layouts"

# ---------------------------------------------------------------------------
# Photos
# ---------------------------------------------------------------------------
[photos]
# Directory scanned for photos named YYYY-MM-DD-slug.ext (not recursive)
dir = "_photos"

# File extensions treated as photos
extensions = ["jpg"]

# URL prefix; photos publish at {permalink_dir}/YYYY-MM-DD-slug.ext
permalink_dir = "/photos"

# Layout each photo page is rendered with
layout = "photo"

# Also write each rendered photo page to {url}.html
write_pages = false

# ---------------------------------------------------------------------------
# Listing page
# ---------------------------------------------------------------------------
[index]
# Write {permalink_dir}/index.html listing every photo
enabled = true

# Layout for the listing; a built-in page is used when it does not exist
layout = "index"

title = "Photos"
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_matches_fixed_layout() {
        let config = SiteConfig::default();
        assert_eq!(config.photos.dir, "_photos");
        assert_eq!(config.photos.extensions, vec!["jpg"]);
        assert_eq!(config.photos.permalink_dir, "/photos");
        assert_eq!(config.photos.layout, "photo");
        assert_eq!(config.destination, "_site");
        assert!(!config.photos.write_pages);
        assert!(config.index.enabled);
    }

    #[test]
    fn parse_partial_config() {
        let config: SiteConfig = toml::from_str(
            r#"
[photos]
extensions = ["jpg", "png"]
"#,
        )
        .unwrap();
        assert_eq!(config.photos.extensions, vec!["jpg", "png"]);
        // Defaults preserved
        assert_eq!(config.photos.dir, "_photos");
        assert_eq!(config.title, "Photos");
    }

    #[test]
    fn photo_extension_match_ignores_case() {
        let config = SiteConfig::default();
        assert!(config.is_photo_extension("jpg"));
        assert!(config.is_photo_extension("JPG"));
        assert!(!config.is_photo_extension("png"));
    }

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.photos.permalink_dir, "/photos");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            r#"
title = "Bay Area"

[photos]
permalink_dir = "/gallery"
"#,
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.title, "Bay Area");
        assert_eq!(config.photos.permalink_dir, "/gallery");
        assert_eq!(config.photos.layout, "photo");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "this is not valid toml [[[").unwrap();
        assert!(matches!(load_config(tmp.path()), Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_key_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str(
            r#"
[photos]
extension = ["jpg"]
"#,
        );
        assert!(result.unwrap_err().to_string().contains("unknown field"));
    }

    #[test]
    fn unknown_section_rejected_via_load_config() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[fotos]\ndir = \"x\"\n").unwrap();
        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn merge_toml_table_merge() {
        let base: toml::Value = toml::from_str(
            r#"
[photos]
dir = "_photos"
layout = "photo"
"#,
        )
        .unwrap();
        let overlay: toml::Value = toml::from_str("[photos]\nlayout = \"plain\"\n").unwrap();
        let merged = merge_toml(base, overlay);
        let photos = merged.get("photos").unwrap();
        assert_eq!(photos.get("layout").unwrap().as_str(), Some("plain"));
        assert_eq!(photos.get("dir").unwrap().as_str(), Some("_photos"));
    }

    #[test]
    fn merge_toml_scalar_override() {
        let base: toml::Value = toml::from_str("title = \"a\"").unwrap();
        let overlay: toml::Value = toml::from_str("title = \"b\"").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged.get("title").unwrap().as_str(), Some("b"));
    }

    #[test]
    fn validate_rejects_empty_extensions() {
        let mut config = SiteConfig::default();
        config.photos.extensions.clear();
        assert!(matches!(config.validate(), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn validate_rejects_dotted_extension() {
        let mut config = SiteConfig::default();
        config.photos.extensions = vec![".jpg".to_string()];
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains(".jpg"));
    }

    #[test]
    fn validate_rejects_relative_permalink_dir() {
        let mut config = SiteConfig::default();
        config.photos.permalink_dir = "photos".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_config_rejects_invalid_values() {
        let overlay: toml::Value = toml::from_str("[photos]\nextensions = []\n").unwrap();
        let result = resolve_config(stock_defaults_value(), Some(overlay));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn stock_config_toml_roundtrips_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.photos.dir, "_photos");
        assert_eq!(config.photos.permalink_dir, "/photos");
        assert_eq!(config.index.layout, "index");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn stock_defaults_value_has_all_sections() {
        let val = stock_defaults_value();
        assert!(val.get("photos").is_some());
        assert!(val.get("index").is_some());
    }
}
