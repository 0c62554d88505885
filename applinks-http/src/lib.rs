//! HTTP client for the application links service.
//!
//! Fetches the categorized outbound links (dashboards, logs, metrics, docs)
//! published for one application and normalizes the service's historical
//! payload shapes into a single canonical model the panel can render.

mod client;
mod error;
mod normalize;
mod types;

pub use client::{LinksClient, LinksClientBuilder, APPLICATION_HEADER, FETCH_TIMEOUT, PROJECT_HEADER};
pub use error::FetchError;
pub use normalize::{category_icon, normalize, RawPayload, DEFAULT_MAX_ROWS};
pub use types::{
    Category, CategoryStatus, Identity, Link, LinkSet, DEFAULT_NAMESPACE, DEFAULT_PROJECT,
    GENERIC_ICON, NO_DATA_MESSAGE,
};
