use crate::core::errors::ExchangeError;
use crate::core::kernel::{RequestParams, RestClient};
use crate::core::types::{validate_amount, ActionType};
use crate::exchanges::cryptsy::types::{
    BalancesPayload, CryptsyResponse, DepthPayload, MarketEntry, NumberOrString, OrderEntry,
    TradeEntry,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{instrument, warn};

/// Parse a raw body into the envelope and enforce the success flag
///
/// A body that is not a well-formed envelope is a decode error. A well-formed
/// envelope with `success != "1"` is a protocol error carrying the venue's
/// `error` text unchanged.
pub fn decode_envelope(body: &str) -> Result<CryptsyResponse, ExchangeError> {
    let response: CryptsyResponse = serde_json::from_str(body).map_err(|e| {
        ExchangeError::DeserializationError(format!("Failed to parse Cryptsy response: {}", e))
    })?;

    if !response.is_success() {
        let message = response.error.unwrap_or_default();
        warn!(success = %response.success, error = %message, "Cryptsy rejected request");
        return Err(ExchangeError::ApiError { message });
    }

    Ok(response)
}

/// Reclassify a non-2xx answer
///
/// A body that is a venue rejection is the venue's answer and stays a protocol
/// error. Anything else keeps the HTTP status.
pub fn decode_status_error(status: u16, body: String) -> ExchangeError {
    match decode_envelope(&body) {
        Err(err @ ExchangeError::ApiError { .. }) => err,
        _ => ExchangeError::HttpStatus { status, body },
    }
}

/// Deserialize the `return` payload of a successful envelope into `T`
pub fn decode_payload<T: DeserializeOwned>(
    method: &str,
    response: CryptsyResponse,
) -> Result<T, ExchangeError> {
    let payload = response.payload.ok_or_else(|| {
        ExchangeError::DeserializationError(format!("{} response has no 'return' payload", method))
    })?;

    serde_json::from_value(payload).map_err(|e| {
        ExchangeError::DeserializationError(format!("Unexpected {} payload: {}", method, e))
    })
}

/// Newly assigned order id from a `createorder` envelope
///
/// The venue puts it next to `success`; a `return` object or scalar is accepted too.
pub fn decode_created_order_id(
    response: &CryptsyResponse,
) -> Result<NumberOrString, ExchangeError> {
    let raw = response
        .extra_field("orderid")
        .or_else(|| match &response.payload {
            Some(Value::Object(map)) => map
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case("orderid"))
                .map(|(_, value)| value),
            Some(scalar @ (Value::String(_) | Value::Number(_))) => Some(scalar),
            _ => None,
        })
        .ok_or_else(|| {
            ExchangeError::DeserializationError("createorder response has no orderid".to_string())
        })?;

    serde_json::from_value(raw.clone()).map_err(|e| {
        ExchangeError::DeserializationError(format!("Invalid createorder orderid: {}", e))
    })
}

/// Format an amount the way `createorder` expects: fixed point, 8 fractional digits
pub fn format_amount(value: f64) -> String {
    format!("{:.8}", value)
}

/// Validate and format an order amount
///
/// The check applies to the value as sent, so an amount that rounds to zero at
/// 8 digits is refused.
pub fn wire_amount(field: &str, value: f64) -> Result<String, ExchangeError> {
    validate_amount(field, value)?;
    let formatted = format_amount(value);
    if !matches!(formatted.parse::<f64>(), Ok(sent) if sent > 0.0) {
        return Err(ExchangeError::InvalidParameters(format!(
            "{} {} rounds to {}",
            field, value, formatted
        )));
    }
    Ok(formatted)
}

/// Thin typed wrapper around `RestClient` for the Cryptsy private API
#[derive(Debug, Clone)]
pub struct CryptsyRest<R: RestClient> {
    client: R,
}

impl<R: RestClient> CryptsyRest<R> {
    pub fn new(client: R) -> Self {
        Self { client }
    }

    async fn call(&self, params: RequestParams) -> Result<CryptsyResponse, ExchangeError> {
        let body = match self.client.post_form(params).await {
            Ok(body) => body,
            Err(ExchangeError::HttpStatus { status, body }) => {
                return Err(decode_status_error(status, body));
            }
            Err(e) => return Err(e),
        };
        decode_envelope(&body)
    }

    async fn call_payload<T: DeserializeOwned>(
        &self,
        params: RequestParams,
    ) -> Result<T, ExchangeError> {
        let method = params.method().to_string();
        let response = self.call(params).await?;
        decode_payload(&method, response)
    }

    /// `getinfo`: balances by category
    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn get_info(&self) -> Result<BalancesPayload, ExchangeError> {
        self.call_payload(RequestParams::new("getinfo")).await
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn get_markets(&self) -> Result<Vec<MarketEntry>, ExchangeError> {
        self.call_payload(RequestParams::new("getmarkets")).await
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn get_all_my_orders(&self) -> Result<Vec<OrderEntry>, ExchangeError> {
        self.call_payload(RequestParams::new("allmyorders")).await
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn get_my_orders(&self, market_id: u64) -> Result<Vec<OrderEntry>, ExchangeError> {
        self.call_payload(RequestParams::new("myorders").with("marketid", market_id.to_string()))
            .await
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn get_depth(&self, market_id: u64) -> Result<DepthPayload, ExchangeError> {
        self.call_payload(RequestParams::new("depth").with("marketid", market_id.to_string()))
            .await
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn get_market_trades(
        &self,
        market_id: u64,
    ) -> Result<Vec<TradeEntry>, ExchangeError> {
        self.call_payload(
            RequestParams::new("markettrades").with("marketid", market_id.to_string()),
        )
        .await
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn create_order(
        &self,
        market_id: u64,
        action: ActionType,
        quantity: f64,
        price: f64,
    ) -> Result<NumberOrString, ExchangeError> {
        let params = RequestParams::new("createorder")
            .with("marketid", market_id.to_string())
            .with("ordertype", action.as_str())
            .with("quantity", wire_amount("quantity", quantity)?)
            .with("price", wire_amount("price", price)?);

        let response = self.call(params).await?;
        decode_created_order_id(&response)
    }

    /// `cancelorder`: success alone is the result
    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn cancel_order(&self, order_id: u64) -> Result<(), ExchangeError> {
        self.call(RequestParams::new("cancelorder").with("orderid", order_id.to_string()))
            .await
            .map(|_| ())
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    pub async fn cancel_all_orders(&self) -> Result<(), ExchangeError> {
        self.call(RequestParams::new("cancelallorders"))
            .await
            .map(|_| ())
    }
}
