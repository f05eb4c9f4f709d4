mod http;

use log::debug;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::model::release::{ReleaseIndex, SearchHit};

pub use http::{ForgeClient, DEFAULT_FORGE_URL};

pub const SEARCH_ENDPOINT: &str = "modules.json";
pub const RELEASES_ENDPOINT: &str = "api/v1/releases.json";

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Request to {url} failed: {status}")]
    Request { url: String, status: String },
    #[error("Unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only access to a module forge.
pub trait Registry {
    /// Issues a GET against `endpoint` with the given query parameters and
    /// parses the response body as JSON.
    fn query(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, TransportError>;

    /// Downloads `path`, relative to the forge base URL.
    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, TransportError>;
}

impl<R: Registry + ?Sized> Registry for &R {
    fn query(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, TransportError> {
        (**self).query(endpoint, params)
    }

    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch_bytes(path)
    }
}

impl<R: Registry + ?Sized> Registry for Box<R> {
    fn query(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, TransportError> {
        (**self).query(endpoint, params)
    }

    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        (**self).fetch_bytes(path)
    }
}

fn query_as<T: DeserializeOwned, R: Registry + ?Sized>(
    registry: &R,
    endpoint: &str,
    params: &[(&str, &str)],
) -> Result<T, TransportError> {
    let value = registry.query(endpoint, params)?;
    serde_json::from_value(value).map_err(|source| TransportError::Decode {
        endpoint: endpoint.to_owned(),
        source,
    })
}

/// Free-text module search.
pub fn search<R: Registry + ?Sized>(
    registry: &R,
    term: &str,
) -> Result<Vec<SearchHit>, TransportError> {
    debug!("Searching the forge for {:?}", term);
    query_as(registry, SEARCH_ENDPOINT, &[("q", term)])
}

/// Releases of `module` and of every module in its dependency graph.
pub fn releases<R: Registry + ?Sized>(
    registry: &R,
    module: &str,
    version: Option<&str>,
) -> Result<ReleaseIndex, TransportError> {
    let mut params = vec![("module", module)];
    if let Some(version) = version {
        params.push(("version", version));
    }
    query_as(registry, RELEASES_ENDPOINT, &params)
}
