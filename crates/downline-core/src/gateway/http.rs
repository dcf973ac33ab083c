//! REST backend gateway.
//!
//! Implements [`TreeFetchGateway`] against the genealogy endpoint:
//! `GET {base_url}/genealogy/tree?depth=N[&rootId=ID]`.

use std::fmt;
use std::time::Duration;

use downline_config::GatewayConfig;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;
use zeroize::Zeroizing;

use crate::BoxFuture;
use crate::model::DomainNode;
use crate::navigation::FetchKey;

use super::fetch::{FetchError, TreeFetchGateway};
use super::parse_tree_document;

const TREE_PATH: &str = "genealogy/tree";

/// Gateway that fetches trees from the REST backend.
pub struct HttpGateway {
    client: Client,
    base_url: String,
    api_token: Option<Zeroizing<String>>,
}

impl HttpGateway {
    /// Create a gateway for `base_url` with the given request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Network(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_token: None,
        })
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self, FetchError> {
        let mut gateway = Self::new(&config.base_url, Duration::from_secs(config.timeout_secs))?;
        if let Some(token) = &config.api_token {
            gateway = gateway.with_token(token.as_str());
        }
        Ok(gateway)
    }

    /// Send `Authorization: Bearer <token>` with every request.
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.api_token = Some(Zeroizing::new(token.into()));
        self
    }

    /// Build the request URL for a fetch key.
    fn tree_url(&self, key: &FetchKey) -> Result<Url, FetchError> {
        let mut url = Url::parse(&format!("{}/{TREE_PATH}", self.base_url))
            .map_err(|e| FetchError::Network(format!("invalid base URL {:?}: {e}", self.base_url)))?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("depth", &key.depth.to_string());
            if let Some(root_id) = &key.root_id {
                query.append_pair("rootId", root_id);
            }
        }
        Ok(url)
    }
}

impl fmt::Debug for HttpGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpGateway")
            .field("base_url", &self.base_url)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Map a non-success HTTP status to a fetch error.
fn status_error(status: StatusCode, key: &FetchKey, body: String) -> FetchError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            FetchError::Auth(format!("backend rejected credentials ({status})"))
        }
        StatusCode::NOT_FOUND => FetchError::NotFound(
            key.root_id
                .clone()
                .unwrap_or_else(|| "<viewer>".to_string()),
        ),
        _ => FetchError::Status {
            status: status.as_u16(),
            message: body,
        },
    }
}

impl TreeFetchGateway for HttpGateway {
    fn name(&self) -> &str {
        "http"
    }

    fn fetch(&self, key: &FetchKey) -> BoxFuture<'_, Result<Option<DomainNode>, FetchError>> {
        let key = key.clone();
        Box::pin(async move {
            let url = self.tree_url(&key)?;
            debug!(%url, %key, "Tree fetch request");

            let mut request = self.client.get(url).header("accept", "application/json");
            if let Some(token) = &self.api_token {
                request = request.bearer_auth(token.as_str());
            }

            let resp = request.send().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(status_error(status, &key, body));
            }

            let body = resp.bytes().await.map_err(|e| {
                if e.is_timeout() {
                    FetchError::Timeout
                } else {
                    FetchError::Network(e.to_string())
                }
            })?;
            parse_tree_document(&body)
        })
    }
}
