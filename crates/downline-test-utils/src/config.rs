//! Configuration builders for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries.

use downline_config::{AppConfig, GatewayBackend};

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .fixture_path("/tmp/tree.json")
///     .default_depth(4)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.gateway.backend = GatewayBackend::Http;
        self.config.gateway.base_url = url.to_string();
        self
    }

    pub fn api_token(mut self, token: &str) -> Self {
        self.config.gateway.api_token = Some(token.to_string());
        self
    }

    /// Switch to the fixture backend reading `path`.
    pub fn fixture_path(mut self, path: &str) -> Self {
        self.config.gateway.backend = GatewayBackend::Fixture;
        self.config.gateway.fixture_path = Some(path.to_string());
        self
    }

    pub fn cache_ttl_secs(mut self, secs: u64) -> Self {
        self.config.gateway.cache_ttl_secs = secs;
        self
    }

    pub fn default_depth(mut self, depth: u32) -> Self {
        self.config.tree.default_depth = depth;
        self
    }

    pub fn advisory_depth_threshold(mut self, threshold: u32) -> Self {
        self.config.tree.advisory_depth_threshold = threshold;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
