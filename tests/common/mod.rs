#![allow(dead_code)]

use async_trait::async_trait;
use cryptsy_connector::core::errors::ExchangeError;
use cryptsy_connector::core::kernel::{RequestParams, RestClient};
use cryptsy_connector::exchanges::cryptsy::CryptsyConnector;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

pub const NONCE_ERROR: &str = "Invalid nonce parameter; nonce was too small.";

/// In-memory `RestClient` answering each API method with a canned body
#[derive(Clone, Default)]
pub struct MockRest {
    responses: Arc<Mutex<HashMap<String, String>>>,
    fallback: Arc<Mutex<Option<String>>>,
    calls: Arc<Mutex<Vec<RequestParams>>>,
}

impl MockRest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer every method with `body`
    pub fn always(body: &str) -> Self {
        let mock = Self::new();
        *mock.fallback.lock().unwrap() = Some(body.to_string());
        mock
    }

    pub fn respond(self, method: &str, body: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(method.to_string(), body.to_string());
        self
    }

    pub fn calls(&self) -> Vec<RequestParams> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> RequestParams {
        self.calls().pop().expect("no request was sent")
    }
}

#[async_trait]
impl RestClient for MockRest {
    async fn post_form(&self, params: RequestParams) -> Result<String, ExchangeError> {
        let method = params.method().to_string();
        self.calls.lock().unwrap().push(params);

        let canned = self.responses.lock().unwrap().get(&method).cloned();
        canned
            .or_else(|| self.fallback.lock().unwrap().clone())
            .ok_or_else(|| {
                ExchangeError::NetworkError(format!("no canned response for {}", method))
            })
    }
}

pub fn connector(mock: &MockRest) -> CryptsyConnector<MockRest> {
    CryptsyConnector::new(mock.clone())
}
