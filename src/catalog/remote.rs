//! Remote catalog service client.

use std::time::Duration;

use tracing::debug;

use crate::catalog::source::{parse_payload, CatalogSource, SourceError};
use crate::models::RawCatalogRecord;

/// Path of the color collection below the service base URL.
const COLLECTION_PATH: &str = "pantone_colors";

/// Fetches the catalog from an HTTP JSON service.
///
/// Issues `GET <base_url>/pantone_colors` with an optional bearer token.
pub struct RemoteSource {
    base_url: Option<String>,
    api_key: Option<String>,
    agent: ureq::Agent,
}

impl RemoteSource {
    /// Creates a client. A `None` or blank base URL leaves the source
    /// unconfigured; every fetch then fails with [`SourceError::NotConfigured`].
    pub fn new(base_url: Option<String>, api_key: Option<String>, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            base_url: base_url.filter(|url| !url.trim().is_empty()),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            agent,
        }
    }

    /// Full URL of the color collection, if a base URL is configured.
    pub fn endpoint(&self) -> Option<String> {
        self.base_url
            .as_deref()
            .map(|base| format!("{}/{}", base.trim().trim_end_matches('/'), COLLECTION_PATH))
    }
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish_non_exhaustive()
    }
}

impl CatalogSource for RemoteSource {
    fn name(&self) -> &str {
        "remote"
    }

    fn fetch(&self) -> Result<Vec<RawCatalogRecord>, SourceError> {
        let url = self
            .endpoint()
            .ok_or_else(|| SourceError::NotConfigured("remote catalog URL is not set".into()))?;

        let mut request = self.agent.get(&url).set("Accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.set("Authorization", &format!("Bearer {key}"));
        }

        debug!(url = %url, "Fetching remote catalog");
        let response = request.call().map_err(|e| match e {
            ureq::Error::Status(code, _) => SourceError::Status(code),
            ureq::Error::Transport(transport) => SourceError::Transport(transport.to_string()),
        })?;

        let body = response
            .into_string()
            .map_err(|e| SourceError::Transport(e.to_string()))?;
        parse_payload(&body)
    }
}
