use crate::core::errors::ExchangeError;
use hmac::{Hmac, Mac};
use sha2::Sha512;
use std::collections::{BTreeMap, HashMap};

type HmacSha512 = Hmac<Sha512>;

/// Result type for signing operations
pub type SignatureResult = Result<SignedRequest, ExchangeError>;

/// Name/value parameters of a private call
///
/// Backed by a `BTreeMap`, so the encoded form is always sorted by key no matter
/// the order parameters were added in.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    params: BTreeMap<String, String>,
}

impl RequestParams {
    /// Start a parameter set for the given API method
    pub fn new(method: &str) -> Self {
        let mut params = BTreeMap::new();
        params.insert("method".to_string(), method.to_string());
        Self { params }
    }

    /// Add or replace a parameter
    #[must_use]
    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.params.insert(key.to_string(), value.into());
        self
    }

    pub fn set_nonce(&mut self, nonce: u64) {
        self.params.insert("nonce".to_string(), nonce.to_string());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn method(&self) -> &str {
        self.get("method").unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Canonical `application/x-www-form-urlencoded` form, sorted by key
    pub fn encode(&self) -> Result<String, ExchangeError> {
        serde_urlencoded::to_string(&self.params).map_err(|e| {
            ExchangeError::InvalidParameters(format!("Failed to encode parameters: {}", e))
        })
    }
}

/// A request ready to be sent: the nonce used, auth headers and the exact signed body
#[derive(Debug, Clone)]
pub struct SignedRequest {
    pub nonce: u64,
    pub headers: HashMap<String, String>,
    pub body: String,
}

/// Signer trait for request authentication
///
/// Implementations own the nonce sequence of their credential: `sign_request`
/// stamps a fresh nonce onto the parameters before computing the signature.
pub trait Signer: Send + Sync {
    fn sign_request(&self, params: RequestParams) -> SignatureResult;
}

/// Lowercase hex HMAC-SHA512 of `payload` keyed by `key`
pub fn hmac_sha512_hex(key: &[u8], payload: &[u8]) -> Result<String, ExchangeError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| ExchangeError::AuthError(format!("Invalid secret key: {}", e)))?;
    mac.update(payload);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_encode_sorted() {
        let mut params = RequestParams::new("depth").with("marketid", "3");
        params.set_nonce(42);
        assert_eq!(params.encode().unwrap(), "marketid=3&method=depth&nonce=42");
        assert_eq!(params.method(), "depth");
        assert_eq!(params.len(), 3);
    }

    #[test]
    fn test_params_percent_encoding() {
        let params = RequestParams::new("getinfo").with("note", "a b&c=d/é");
        assert_eq!(
            params.encode().unwrap(),
            "method=getinfo&note=a+b%26c%3Dd%2F%C3%A9"
        );
    }

    #[test]
    fn test_params_replace_value() {
        let params = RequestParams::new("cancelorder")
            .with("orderid", "1")
            .with("orderid", "2");
        assert_eq!(params.get("orderid"), Some("2"));
        assert_eq!(params.len(), 2);
    }

    #[test]
    fn test_hmac_sha512_known_vector() {
        let signature =
            hmac_sha512_hex(b"secret", b"method=getinfo&nonce=1700000000000000000").unwrap();
        assert_eq!(
            signature,
            "594fdf69112cbbf61cc4415df14a4e147fbbf16a74c9b6fddb9228f9516c90a6\
             a3a91221b0fb520822fe593817385705af61720ccf753f042e3b15d3dfc5d2ba"
        );
    }

    #[test]
    fn test_hmac_sha512_is_lowercase_hex() {
        let signature = hmac_sha512_hex(b"k", b"payload").unwrap();
        assert_eq!(signature.len(), 128);
        assert!(signature
            .chars()
            .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    }
}
