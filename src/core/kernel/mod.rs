/// Transport kernel shared by exchange modules
///
/// The kernel holds only transport and authentication plumbing; nothing in here
/// knows what a balance or an order book is.
///
/// # Components
///
/// - `RequestParams`: the sorted name/value set of one private call
/// - `Signer`: stamps a nonce onto the parameters and authenticates them
/// - `NonceGenerator`: strictly increasing, race-free nonces for one credential
/// - `RestClient` / `ReqwestRest`: signed form POST returning the raw body
///
/// # Example
///
/// ```rust,no_run
/// use cryptsy_connector::core::kernel::*;
/// use cryptsy_connector::exchanges::cryptsy::signer::CryptsySigner;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let signer = Arc::new(CryptsySigner::new("public".to_string(), "private".to_string()));
/// let config =
///     RestClientConfig::new("https://api.cryptsy.com".to_string(), "cryptsy".to_string());
/// let rest = RestClientBuilder::new(config).with_signer(signer).build()?;
///
/// let body = rest.post_form(RequestParams::new("getinfo")).await?;
/// println!("{}", body);
/// # Ok(())
/// # }
/// ```
pub mod nonce;
pub mod rest;
pub mod signer;

pub use nonce::NonceGenerator;
pub use rest::{ReqwestRest, RestClient, RestClientBuilder, RestClientConfig};
pub use signer::{hmac_sha512_hex, RequestParams, SignatureResult, SignedRequest, Signer};
