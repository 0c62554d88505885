use std::time::Duration;

use reqwest::header;
use url::Url;

use crate::error::FetchError;
use crate::normalize::{normalize, RawPayload};
use crate::types::{Identity, LinkSet};

/// Header carrying `{namespace}:{name}`.
pub const APPLICATION_HEADER: &str = "x-application-name";

/// Header carrying the project the application belongs to.
pub const PROJECT_HEADER: &str = "x-project-name";

/// Hard ceiling on one links request, connect through body.
pub const FETCH_TIMEOUT: Duration = Duration::from_millis(5000);

const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:8626";

/// HTTP client for the links service.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct LinksClient {
    base: Url,
    http: reqwest::Client,
    legacy_query: bool,
}

impl LinksClient {
    pub fn builder() -> LinksClientBuilder {
        LinksClientBuilder::new()
    }

    /// Fetch and normalize the link set for one application.
    ///
    /// Every failure mode, refused connection, timeout, non-2xx answer or a
    /// body that is not the expected JSON, comes back as a [`FetchError`].
    pub async fn fetch_links(&self, identity: &Identity) -> Result<LinkSet, FetchError> {
        let url = self.links_url(&identity.name)?;

        let response = self
            .http
            .get(url)
            .header(header::ACCEPT, "application/json")
            .header(APPLICATION_HEADER, identity.application_header())
            .header(PROJECT_HEADER, identity.project.as_str())
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }

        let body = response.bytes().await?;
        let payload: RawPayload = serde_json::from_slice(&body)?;
        Ok(normalize(payload))
    }

    fn links_url(&self, name: &str) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().map_err(|()| FetchError::EndpointBase)?;
            segments.pop_if_empty();
            if self.legacy_query {
                segments.extend(["api", "v1", "links"]);
            } else {
                segments.extend(["api", "v1", "applications", name, "links"]);
            }
        }
        if self.legacy_query {
            url.query_pairs_mut().append_pair("application", name);
        }
        Ok(url)
    }
}

/// Builder for [`LinksClient`].
pub struct LinksClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    legacy_query: bool,
}

impl LinksClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
            legacy_query: false,
        }
    }

    /// Base URL of the links service.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Overall request timeout, [`FETCH_TIMEOUT`] unless overridden.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Address applications with the legacy `?application=` query parameter
    /// instead of a path segment.
    pub fn legacy_query(mut self, legacy: bool) -> Self {
        self.legacy_query = legacy;
        self
    }

    pub fn build(self) -> Result<LinksClient, FetchError> {
        let base = Url::parse(self.base_url.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
        if base.cannot_be_a_base() {
            return Err(FetchError::EndpointBase);
        }

        // The session cookie jar lets the service's auth proxy recognize us.
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(FETCH_TIMEOUT))
            .cookie_store(true)
            .build()?;

        Ok(LinksClient {
            base,
            http,
            legacy_query: self.legacy_query,
        })
    }
}

impl Default for LinksClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
