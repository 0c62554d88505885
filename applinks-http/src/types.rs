use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Namespace assumed when the host configuration supplies none.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Project assumed when the host configuration supplies none.
pub const DEFAULT_PROJECT: &str = "default";

/// Glyph used for categories that carry no recognizable icon.
pub const GENERIC_ICON: &str = "󰌷";

/// Message rendered for categories without usable data.
pub const NO_DATA_MESSAGE: &str = "No data available";

/// The application a link set is scoped to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub name: String,
    pub namespace: String,
    pub project: String,
}

impl Identity {
    pub fn new(name: impl Into<String>, namespace: Option<String>, project: Option<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.unwrap_or_else(|| DEFAULT_NAMESPACE.to_owned()),
            project: project.unwrap_or_else(|| DEFAULT_PROJECT.to_owned()),
        }
    }

    /// An identity without a name cannot be fetched at all.
    pub fn has_name(&self) -> bool {
        !self.name.is_empty()
    }

    /// Value of the application identity header, `{namespace}:{name}`.
    pub fn application_header(&self) -> String {
        format!("{}:{}", self.namespace, self.name)
    }
}

/// A single outbound link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub url: String,
}

/// Rendering status of one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryStatus {
    Ok,
    Empty,
    Error,
}

/// A named, iconified grouping of links.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub label: String,
    pub icon: String,
    pub status: CategoryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub links: Vec<Link>,
}

/// One fetch's worth of categories, replaced wholesale on every cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSet {
    /// Categories in the order the service listed them.
    pub categories: Vec<Category>,
    /// Server-side freshness stamp, when the payload carried one.
    pub last_updated: Option<DateTime<Utc>>,
    /// Rows per column when the panel lays categories out as a grid.
    pub max_rows: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_fills_defaults() {
        let identity = Identity::new("shop-frontend", None, None);
        assert_eq!(identity.namespace, "default");
        assert_eq!(identity.project, "default");
        assert!(identity.has_name());
    }

    #[test]
    fn identity_header_joins_namespace_and_name() {
        let identity = Identity::new("shop-frontend", Some("prod".to_owned()), Some("retail".to_owned()));
        assert_eq!(identity.application_header(), "prod:shop-frontend");
        assert_eq!(identity.project, "retail");
    }

    #[test]
    fn empty_name_is_not_fetchable() {
        let identity = Identity::new("", Some("prod".to_owned()), None);
        assert!(!identity.has_name());
    }
}
