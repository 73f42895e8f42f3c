use crate::core::config::ExchangeConfig;
use crate::core::errors::ExchangeError;
use crate::core::kernel::{ReqwestRest, RestClientBuilder, RestClientConfig};
use crate::exchanges::cryptsy::{connector::CryptsyConnector, signer::CryptsySigner};
use std::sync::Arc;
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.cryptsy.com";
pub const API_PATH: &str = "/api";

/// Builder for creating Cryptsy connectors
///
/// Credentials are mandatory: the venue exposes no public endpoint through this API.
pub struct CryptsyBuilder {
    config: ExchangeConfig,
    pool_max_idle_per_host: usize,
}

impl Default for CryptsyBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptsyBuilder {
    pub fn new() -> Self {
        Self {
            config: ExchangeConfig::new(String::new(), String::new()),
            pool_max_idle_per_host: 5,
        }
    }

    /// Set the exchange configuration
    pub fn with_config(mut self, config: ExchangeConfig) -> Self {
        self.config = config;
        self
    }

    /// Set API credentials, keeping the rest of the configuration
    pub fn with_credentials(mut self, api_key: String, secret_key: String) -> Self {
        let previous = self.config;
        self.config = ExchangeConfig {
            base_url: previous.base_url,
            timeout_seconds: previous.timeout_seconds,
            accept_invalid_certs: previous.accept_invalid_certs,
            pin_resolved_host: previous.pin_resolved_host,
            ..ExchangeConfig::new(api_key, secret_key)
        };
        self
    }

    /// Set base URL for the REST API
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.config.base_url = Some(base_url);
        self
    }

    /// Set REST client timeout in seconds
    pub fn with_rest_timeout(mut self, timeout: u64) -> Self {
        self.config.timeout_seconds = timeout;
        self
    }

    pub fn with_pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    /// Resolve the API host once at build time
    pub fn with_pinned_resolution(mut self, pin: bool) -> Self {
        self.config.pin_resolved_host = pin;
        self
    }

    /// Disable TLS certificate validation
    ///
    /// Only for talking to a test double behind a self-signed certificate.
    pub fn danger_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.config.accept_invalid_certs = accept;
        self
    }

    pub fn build(self) -> Result<CryptsyConnector<ReqwestRest>, ExchangeError> {
        if !self.config.has_credentials() {
            return Err(ExchangeError::ConfigurationError(
                "Cryptsy API key and secret key are required".to_string(),
            ));
        }

        if self.config.accept_invalid_certs {
            warn!("TLS certificate validation is disabled");
        }

        let base_url = self
            .config
            .base_url
            .clone()
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let rest_config = RestClientConfig::new(base_url, "cryptsy".to_string())
            .with_api_path(API_PATH.to_string())
            .with_timeout(self.config.timeout_seconds)
            .with_pool_max_idle_per_host(self.pool_max_idle_per_host)
            .with_accept_invalid_certs(self.config.accept_invalid_certs)
            .with_pinned_resolution(self.config.pin_resolved_host);

        let signer = Arc::new(CryptsySigner::new(
            self.config.api_key().to_string(),
            self.config.secret_key().to_string(),
        ));

        let rest = RestClientBuilder::new(rest_config)
            .with_signer(signer)
            .build()?;

        Ok(CryptsyConnector::new(rest))
    }
}

/// Create a Cryptsy connector from a configuration
pub fn build_connector(
    config: ExchangeConfig,
) -> Result<CryptsyConnector<ReqwestRest>, ExchangeError> {
    CryptsyBuilder::new().with_config(config).build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_without_credentials() {
        let config = ExchangeConfig::new(String::new(), String::new());
        let result = build_connector(config);
        assert!(matches!(result, Err(ExchangeError::ConfigurationError(_))));
    }

    #[test]
    fn test_build_with_credentials() {
        let config = ExchangeConfig::new("public".to_string(), "private".to_string());
        assert!(build_connector(config).is_ok());
    }

    #[test]
    fn test_builder_keeps_settings_across_credentials() {
        let builder = CryptsyBuilder::new()
            .with_base_url("http://127.0.0.1:1".to_string())
            .with_rest_timeout(12)
            .with_credentials("public".to_string(), "private".to_string());
        assert_eq!(builder.config.base_url.as_deref(), Some("http://127.0.0.1:1"));
        assert_eq!(builder.config.timeout_seconds, 12);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_builder_tls_validation_on_by_default() {
        let builder = CryptsyBuilder::new();
        assert!(!builder.config.accept_invalid_certs);
        let builder = builder.danger_accept_invalid_certs(true);
        assert!(builder.config.accept_invalid_certs);
    }
}
