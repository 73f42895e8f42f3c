use crate::core::errors::ExchangeError;
use crate::core::kernel::{hmac_sha512_hex, NonceGenerator, RequestParams, SignedRequest, Signer};
use secrecy::{ExposeSecret, Secret};
use std::collections::HashMap;

pub const KEY_HEADER: &str = "Key";
pub const SIGN_HEADER: &str = "Sign";

/// HMAC-SHA512 signer for Cryptsy private calls
///
/// The signed payload is the form-encoded body itself, nonce included. The public
/// key travels in the `Key` header and the hex digest in `Sign`; the private key
/// never leaves the process.
pub struct CryptsySigner {
    api_key: String,
    secret_key: Secret<String>,
    nonces: NonceGenerator,
}

impl CryptsySigner {
    pub fn new(api_key: String, secret_key: String) -> Self {
        Self::with_nonces(api_key, secret_key, NonceGenerator::new())
    }

    pub fn with_nonces(api_key: String, secret_key: String, nonces: NonceGenerator) -> Self {
        Self {
            api_key,
            secret_key: Secret::new(secret_key),
            nonces,
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Sign with an explicit nonce
    ///
    /// Pure function of the parameters, nonce and key; `sign_request` is this plus
    /// a fresh nonce.
    pub fn sign_with_nonce(
        &self,
        mut params: RequestParams,
        nonce: u64,
    ) -> Result<SignedRequest, ExchangeError> {
        params.set_nonce(nonce);
        let body = params.encode()?;
        let signature =
            hmac_sha512_hex(self.secret_key.expose_secret().as_bytes(), body.as_bytes())?;

        let mut headers = HashMap::new();
        headers.insert(KEY_HEADER.to_string(), self.api_key.clone());
        headers.insert(SIGN_HEADER.to_string(), signature);

        Ok(SignedRequest {
            nonce,
            headers,
            body,
        })
    }
}

impl Signer for CryptsySigner {
    fn sign_request(&self, params: RequestParams) -> Result<SignedRequest, ExchangeError> {
        let nonce = self.nonces.next();
        self.sign_with_nonce(params, nonce)
    }
}
