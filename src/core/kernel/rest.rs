use crate::core::config::DEFAULT_TIMEOUT_SECONDS;
use crate::core::errors::ExchangeError;
use crate::core::kernel::signer::{RequestParams, Signer};
use async_trait::async_trait;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::{Client, Response, Url};
use std::net::{SocketAddr, ToSocketAddrs};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, trace};

/// REST client trait for the venue's single private endpoint
///
/// Every private call is a signed form POST to one fixed URL; the API method is
/// selected by the `method` parameter. Implementations sign, send and hand back
/// the raw response body. Interpreting that body is the caller's job.
#[async_trait]
pub trait RestClient: Send + Sync {
    /// Sign `params` and POST them
    ///
    /// # Returns
    /// The raw response body of a 2xx response
    async fn post_form(&self, params: RequestParams) -> Result<String, ExchangeError>;
}

/// Configuration for the REST client
#[derive(Clone, Debug)]
pub struct RestClientConfig {
    /// Scheme and host, e.g. `https://api.cryptsy.com`
    pub base_url: String,
    /// Path of the private endpoint
    pub api_path: String,
    /// Exchange name for logging and tracing
    pub exchange_name: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// Idle keep-alive connections kept per host
    pub pool_max_idle_per_host: usize,
    /// User agent string to include in requests
    pub user_agent: String,
    /// Disable certificate validation (never the default)
    pub accept_invalid_certs: bool,
    /// Resolve the host once at build time and pin the connection to that address
    pub pin_resolved_host: bool,
}

impl RestClientConfig {
    /// Create a new configuration
    ///
    /// # Arguments
    /// * `base_url` - Base URL for the API
    /// * `exchange_name` - Name of the exchange
    pub fn new(base_url: String, exchange_name: String) -> Self {
        Self {
            base_url,
            api_path: "/api".to_string(),
            exchange_name,
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            pool_max_idle_per_host: 5,
            user_agent: "cryptsy-connector/0.1".to_string(),
            accept_invalid_certs: false,
            pin_resolved_host: false,
        }
    }

    /// Set the endpoint path
    pub fn with_api_path(mut self, api_path: String) -> Self {
        self.api_path = api_path;
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Set the idle connection pool size per host
    pub fn with_pool_max_idle_per_host(mut self, max_idle: usize) -> Self {
        self.pool_max_idle_per_host = max_idle;
        self
    }

    /// Set the user agent string
    pub fn with_user_agent(mut self, user_agent: String) -> Self {
        self.user_agent = user_agent;
        self
    }

    /// Accept invalid TLS certificates
    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Pin the API host to the address it resolves to at build time
    pub fn with_pinned_resolution(mut self, pin: bool) -> Self {
        self.pin_resolved_host = pin;
        self
    }

    /// Full URL of the private endpoint
    pub fn endpoint_url(&self) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), self.api_path)
    }
}

/// Builder for creating REST client instances
pub struct RestClientBuilder {
    config: RestClientConfig,
    signer: Option<Arc<dyn Signer>>,
}

impl RestClientBuilder {
    /// Create a new builder with the given configuration
    pub fn new(config: RestClientConfig) -> Self {
        Self {
            config,
            signer: None,
        }
    }

    /// Set the signer for authenticated requests
    pub fn with_signer(mut self, signer: Arc<dyn Signer>) -> Self {
        self.signer = Some(signer);
        self
    }

    /// Build the REST client
    pub fn build(self) -> Result<ReqwestRest, ExchangeError> {
        let signer = self.signer.ok_or_else(|| {
            ExchangeError::ConfigurationError(
                "A signer is required: every endpoint is private".to_string(),
            )
        })?;

        let mut builder = Client::builder()
            .timeout(Duration::from_secs(self.config.timeout_seconds))
            .pool_max_idle_per_host(self.config.pool_max_idle_per_host)
            .user_agent(&self.config.user_agent)
            .danger_accept_invalid_certs(self.config.accept_invalid_certs);

        let resolved_addr = if self.config.pin_resolved_host {
            let (host, addr) = resolve_host(&self.config.base_url)?;
            debug!(host = %host, addr = %addr, "pinned API host");
            builder = builder.resolve(&host, addr);
            Some(addr)
        } else {
            None
        };

        let client = builder.build().map_err(|e| {
            ExchangeError::ConfigurationError(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(ReqwestRest {
            client,
            config: self.config,
            signer,
            resolved_addr,
        })
    }
}

/// Look up `base_url`'s host once; DNS failure is a transport error
fn resolve_host(base_url: &str) -> Result<(String, SocketAddr), ExchangeError> {
    let url = Url::parse(base_url).map_err(|e| {
        ExchangeError::ConfigurationError(format!("Invalid base URL '{}': {}", base_url, e))
    })?;
    let host = url
        .host_str()
        .ok_or_else(|| {
            ExchangeError::ConfigurationError(format!("Base URL '{}' has no host", base_url))
        })?
        .to_string();
    let port = url.port_or_known_default().unwrap_or(443);

    let addr = (host.as_str(), port)
        .to_socket_addrs()
        .map_err(|e| ExchangeError::NetworkError(format!("Failed to resolve {}: {}", host, e)))?
        .next()
        .ok_or_else(|| ExchangeError::NetworkError(format!("No address found for {}", host)))?;

    Ok((host, addr))
}

/// Implementation of `RestClient` using reqwest
///
/// Clones share the connection pool and the signer, and with it the nonce sequence.
#[derive(Clone)]
pub struct ReqwestRest {
    client: Client,
    config: RestClientConfig,
    signer: Arc<dyn Signer>,
    resolved_addr: Option<SocketAddr>,
}

impl std::fmt::Debug for ReqwestRest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestRest")
            .field("config", &self.config)
            .field("resolved_addr", &self.resolved_addr)
            .finish_non_exhaustive()
    }
}

impl ReqwestRest {
    pub fn config(&self) -> &RestClientConfig {
        &self.config
    }

    /// Address the host was pinned to at build time, if pinning was requested
    pub fn resolved_addr(&self) -> Option<SocketAddr> {
        self.resolved_addr
    }

    /// Handle the response and extract the body
    #[instrument(
        skip(self, response),
        fields(exchange = %self.config.exchange_name, status = %response.status())
    )]
    async fn handle_response(&self, response: Response) -> Result<String, ExchangeError> {
        let status = response.status();
        let response_text = response.text().await.map_err(|e| {
            ExchangeError::NetworkError(format!("Failed to read response body: {}", e))
        })?;

        trace!("Response body: {}", response_text);

        if status.is_success() {
            Ok(response_text)
        } else {
            Err(ExchangeError::HttpStatus {
                status: status.as_u16(),
                body: response_text,
            })
        }
    }
}

#[async_trait]
impl RestClient for ReqwestRest {
    #[instrument(skip(self, params), fields(exchange = %self.config.exchange_name))]
    async fn post_form(&self, params: RequestParams) -> Result<String, ExchangeError> {
        let method = params.method().to_string();
        let signed = self.signer.sign_request(params)?;
        debug!(method = %method, nonce = signed.nonce, "sending private request");

        let mut request = self
            .client
            .post(self.config.endpoint_url())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header(CACHE_CONTROL, "no-cache, must-revalidate");

        for (key, value) in &signed.headers {
            request = request.header(key.as_str(), value.as_str());
        }

        let response = request
            .body(signed.body)
            .send()
            .await
            .map_err(|e| ExchangeError::NetworkError(format!("Request failed: {}", e)))?;

        self.handle_response(response).await
    }
}
