use log::{debug, trace};
use reqwest::blocking::Client;

use super::{Registry, TransportError};

pub const DEFAULT_FORGE_URL: &str = "https://forge.puppetlabs.com";

/// Blocking HTTP client for a forge instance.
pub struct ForgeClient {
    base_url: String,
    client: Client,
}

impl ForgeClient {
    pub fn new(base_url: impl Into<String>) -> Result<ForgeClient, TransportError> {
        let base_url = base_url.into();
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| TransportError::Request {
                url: base_url.clone(),
                status: error.to_string(),
            })?;
        Ok(ForgeClient { base_url, client })
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<u8>, TransportError> {
        let url = self.url(path);
        debug!("GET {} {:?}", url, params);

        let request_error = |error: reqwest::Error| TransportError::Request {
            url: url.clone(),
            status: error.to_string(),
        };

        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .map_err(request_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Request {
                url: response.url().to_string(),
                status: status.to_string(),
            });
        }

        let body = response.bytes().map_err(request_error)?;
        trace!("Received {} bytes from {}", body.len(), url);
        Ok(body.to_vec())
    }
}

impl Registry for ForgeClient {
    fn query(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<serde_json::Value, TransportError> {
        let body = self.get(endpoint, params)?;
        serde_json::from_slice(&body).map_err(|source| TransportError::Decode {
            endpoint: endpoint.to_owned(),
            source,
        })
    }

    fn fetch_bytes(&self, path: &str) -> Result<Vec<u8>, TransportError> {
        self.get(path, &[])
    }
}
