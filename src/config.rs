//! Host configuration.
//!
//! Configuration is usually loaded from a `track.toml` file next to the
//! application; every field has a default, so an empty file is valid.
//!
//! ```toml
//! kind = "component"
//! views_dir = "views"
//! view_models_dir = "view_models"
//! fallback_to_name = true
//! require_views = true
//! ```

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Settings shared by every component of a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Component kind, used as the `<kind>s` segment of loader paths.
    pub kind: String,
    /// Root segment of view paths.
    pub views_dir: String,
    /// Root segment of viewmodel paths.
    pub view_models_dir: String,
    /// Use the component name as the only view when none is declared.
    pub fallback_to_name: bool,
    /// Fail rendering when no view could be resolved.
    pub require_views: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            kind: "component".into(),
            views_dir: "views".into(),
            view_models_dir: "view_models".into(),
            fallback_to_name: true,
            require_views: true,
        }
    }
}

impl Config {
    /// Default file name looked up by [`Config::discover`].
    pub const FILE_NAME: &'static str = "track.toml";

    /// Parses a configuration from TOML.
    ///
    /// # Errors
    ///
    /// Returns the TOML error when the document is malformed.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml(&contents)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        tracing::debug!(path = %path.display(), kind = %config.kind, "loaded configuration");
        Ok(config)
    }

    /// Loads `root/track.toml` when it exists, defaults otherwise.
    ///
    /// # Errors
    ///
    /// Fails when the file exists but cannot be read or parsed.
    pub fn discover(root: &Path) -> Result<Self> {
        let path = root.join(Self::FILE_NAME);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Loader path of a view identifier, e.g. `views/components/header`.
    #[must_use]
    pub fn view_path(&self, ident: &str) -> String {
        format!("{}/{}s/{ident}", self.views_dir, self.kind)
    }

    /// Loader path of a viewmodel identifier, e.g. `view_models/components/header`.
    #[must_use]
    pub fn view_model_path(&self, ident: &str) -> String {
        format!("{}/{}s/{ident}", self.view_models_dir, self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_loader_layout() {
        let config = Config::default();
        assert_eq!(config.view_path("hoge"), "views/components/hoge");
        assert_eq!(config.view_model_path("hoge"), "view_models/components/hoge");
        assert!(config.fallback_to_name);
        assert!(config.require_views);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = Config::from_toml("kind = \"page\"\nrequire_views = false\n").unwrap();
        assert_eq!(config.kind, "page");
        assert!(!config.require_views);
        assert_eq!(config.views_dir, "views");
        assert_eq!(config.view_path("top"), "views/pages/top");
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(Config::from_toml("kind = ").is_err());
    }

    #[test]
    fn discover_without_file_uses_defaults() {
        let dir = std::env::temp_dir().join(format!("track-config-{}", std::process::id()));
        let config = Config::discover(&dir).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn load_reports_the_path() {
        let path = Path::new("/definitely/not/here/track.toml");
        let error = Config::load(path).unwrap_err();
        assert!(error.to_string().contains("/definitely/not/here/track.toml"));
    }
}
