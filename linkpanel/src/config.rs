//! Panel configuration, read once at startup from
//! `$XDG_CONFIG_HOME/linkpanel/config.toml`. A missing file yields the
//! defaults; a malformed one is logged and ignored.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::warn;

use applinks_http::Identity;

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8626";
const DEFAULT_TITLE: &str = "App Links";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base URL of the links service.
    pub endpoint: String,
    /// Address applications with the legacy `?application=` query parameter.
    pub legacy_query: bool,
    /// Title shown in the panel header.
    pub title: String,
    /// Applications the panel can show links for. The first entry is
    /// selected at startup; the header switcher cycles through the rest.
    #[serde(rename = "application")]
    pub applications: Vec<AppEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppEntry {
    pub name: String,
    pub namespace: Option<String>,
    pub project: Option<String>,
}

impl AppEntry {
    pub fn identity(&self) -> Identity {
        Identity::new(self.name.clone(), self.namespace.clone(), self.project.clone())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            legacy_query: false,
            title: DEFAULT_TITLE.to_owned(),
            applications: Vec::new(),
        }
    }
}

impl Config {
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::default(),
        }
    }

    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("linkpanel").join("config.toml"))
    }

    fn load_from(path: &Path) -> Self {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) => {
                if e.kind() != std::io::ErrorKind::NotFound {
                    warn!(path = %path.display(), error = %e, "could not read config");
                }
                return Self::default();
            }
        };

        match toml::from_str(&raw) {
            Ok(config) => config,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "ignoring malformed config");
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(config.title, DEFAULT_TITLE);
        assert!(!config.legacy_query);
        assert!(config.applications.is_empty());
    }

    #[test]
    fn full_file_parses() {
        let config: Config = toml::from_str(
            r#"
            endpoint = "https://links.example.com"
            legacy_query = true
            title = "Shop Links"

            [[application]]
            name = "shop-frontend"
            namespace = "prod"
            project = "retail"

            [[application]]
            name = "shop-backend"
            "#,
        )
        .unwrap();

        assert_eq!(config.endpoint, "https://links.example.com");
        assert!(config.legacy_query);
        assert_eq!(config.title, "Shop Links");
        assert_eq!(config.applications.len(), 2);

        let first = config.applications[0].identity();
        assert_eq!(first.application_header(), "prod:shop-frontend");
        assert_eq!(first.project, "retail");

        let second = config.applications[1].identity();
        assert_eq!(second.namespace, "default");
        assert_eq!(second.project, "default");
    }
}
