//! Tree fetch gateways — where display trees come from.
//!
//! Navigation only produces [`FetchKey`](crate::navigation::FetchKey)s; a
//! gateway turns a key into a depth-bounded [`DomainNode`] document.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐     ┌──────────────────┐
//! │ TreeSession  │────▶│ TreeFetchGateway │  (trait)
//! └──────────────┘     └────────┬─────────┘
//!                               │
//!                     ┌─────────▼─────────┐
//!                     │   CachedGateway   │  (optional TTL)
//!                     └─────────┬─────────┘
//!                     ┌─────────┴─────────┐
//!                     ▼                   ▼
//!             ┌──────────────┐   ┌────────────────┐
//!             │ HttpGateway  │   │ FixtureGateway │
//!             │ (REST API)   │   │ (JSON on disk) │
//!             └──────────────┘   └────────────────┘
//! ```

pub mod cache;
pub mod fetch;
pub mod fixture;
pub mod http;

use std::path::Path;
use std::time::Duration;

use downline_config::{GatewayBackend, GatewayConfig};
use serde_json::Value;

use crate::model::DomainNode;

pub use cache::CachedGateway;
pub use fetch::{FetchError, TreeFetchGateway};
pub use fixture::FixtureGateway;
pub use http::HttpGateway;

/// Build the gateway described by the `[gateway]` config section.
///
/// Wraps it in a [`CachedGateway`] unless `cache_ttl_secs` is 0.
pub async fn create_gateway(
    config: &GatewayConfig,
) -> Result<Box<dyn TreeFetchGateway>, FetchError> {
    let gateway: Box<dyn TreeFetchGateway> = match config.backend {
        GatewayBackend::Http => Box::new(HttpGateway::from_config(config)?),
        GatewayBackend::Fixture => {
            let path = config
                .fixture_path
                .as_deref()
                .ok_or_else(|| FetchError::Fixture("gateway.fixture_path is not set".to_string()))?;
            Box::new(FixtureGateway::load(Path::new(path)).await?)
        }
    };

    if config.cache_ttl_secs == 0 {
        return Ok(gateway);
    }
    Ok(Box::new(CachedGateway::new(
        gateway,
        Duration::from_secs(config.cache_ttl_secs),
    )))
}

/// Parse a tree document: either a bare node (or `null`) or an envelope
/// of the form `{"data": <node | null>}`.
pub fn parse_tree_document(body: &[u8]) -> Result<Option<DomainNode>, FetchError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    let document = match value {
        Value::Object(mut map) if !map.contains_key("memberId") && map.contains_key("data") => {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    };

    serde_json::from_value(document).map_err(|e| FetchError::Parse(e.to_string()))
}
