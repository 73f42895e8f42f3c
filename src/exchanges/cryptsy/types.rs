use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::collections::HashMap;

/// Generic response envelope shared by every private call
///
/// Field names are matched in both the lowercase and the capitalized form the
/// venue has used. Top-level fields outside the envelope (such as the `orderid`
/// of a `createorder` answer) are kept in `extra`.
#[derive(Debug, Clone, Deserialize)]
pub struct CryptsyResponse {
    #[serde(alias = "Success", deserialize_with = "deserialize_flag")]
    pub success: String,
    #[serde(alias = "Error", default)]
    pub error: Option<String>,
    #[serde(rename = "return", alias = "Return", default)]
    pub payload: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CryptsyResponse {
    pub fn is_success(&self) -> bool {
        self.success == "1"
    }

    /// Top-level field looked up without regard to case
    pub fn extra_field(&self, name: &str) -> Option<&Value> {
        self.extra
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value)
    }
}

/// Success flag as text: `"1"`, `1` and `true` all read as `"1"`
fn deserialize_flag<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(String::from(if b { "1" } else { "0" })),
        other => Err(de::Error::custom(format!(
            "success flag must be a string or number, got {}",
            other
        ))),
    }
}

/// Numeric field the venue sends either quoted or bare
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumberOrString {
    Number(serde_json::Number),
    String(String),
}

impl NumberOrString {
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Number(n) => Cow::Owned(n.to_string()),
            Self::String(s) => Cow::Borrowed(s.trim()),
        }
    }
}

impl From<&str> for NumberOrString {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

/// The venue encodes an empty object as `[]`; accept both for map-shaped fields
fn map_or_empty_list<'de, D, T>(deserializer: D) -> Result<HashMap<String, T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        Value::Array(items) if items.is_empty() => Ok(HashMap::new()),
        Value::Null => Ok(HashMap::new()),
        other @ Value::Object(_) => serde_json::from_value(other).map_err(de::Error::custom),
        other => Err(de::Error::custom(format!(
            "expected a currency map, got {}",
            other
        ))),
    }
}

/// `getinfo` payload
#[derive(Debug, Clone, Deserialize)]
pub struct BalancesPayload {
    #[serde(deserialize_with = "map_or_empty_list")]
    pub balances_available: HashMap<String, NumberOrString>,
}

/// One `getmarkets` entry
#[derive(Debug, Clone, Deserialize)]
pub struct MarketEntry {
    pub marketid: NumberOrString,
    pub label: String,
    pub primary_currency_code: String,
    pub primary_currency_name: String,
    pub secondary_currency_code: String,
    pub secondary_currency_name: String,
    #[serde(default)]
    pub current_volume: Option<NumberOrString>,
}

/// Book side that must be present but may be `null` when empty
fn required_side<'de, D>(deserializer: D) -> Result<Vec<Vec<NumberOrString>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<Vec<NumberOrString>>>::deserialize(deserializer)?.unwrap_or_default())
}

/// `depth` payload: `[price, quantity, ...]` rows per side
///
/// Both keys are required. A payload without them is not an empty book.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DepthPayload {
    #[serde(deserialize_with = "required_side")]
    pub buy: Vec<Vec<NumberOrString>>,
    #[serde(deserialize_with = "required_side")]
    pub sell: Vec<Vec<NumberOrString>>,
}

/// One `allmyorders` / `myorders` entry; only the id is read
#[derive(Debug, Clone, Deserialize)]
pub struct OrderEntry {
    pub orderid: NumberOrString,
}

/// One `markettrades` entry
#[derive(Debug, Clone, Deserialize)]
pub struct TradeEntry {
    pub tradeid: NumberOrString,
    pub datetime: String,
    pub tradeprice: NumberOrString,
    pub quantity: NumberOrString,
    #[serde(default)]
    pub initiate_ordertype: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_envelope_field_casing() {
        let upper: CryptsyResponse =
            serde_json::from_str(r#"{"Success":"1","Error":"","Return":{"a":1}}"#).unwrap();
        let lower: CryptsyResponse =
            serde_json::from_str(r#"{"success":"1","return":{"a":1}}"#).unwrap();
        assert!(upper.is_success());
        assert!(lower.is_success());
        assert_eq!(upper.payload, lower.payload);
        assert!(upper.extra.is_empty());
    }

    #[test]
    fn test_envelope_numeric_flag() {
        let response: CryptsyResponse =
            serde_json::from_str(r#"{"success":0,"error":"nope"}"#).unwrap();
        assert!(!response.is_success());
        assert_eq!(response.error.as_deref(), Some("nope"));
        assert!(response.payload.is_none());
    }

    #[test]
    fn test_envelope_keeps_extra_fields() {
        let response: CryptsyResponse = serde_json::from_str(
            r#"{"success":"1","orderid":"1234","moreinfo":"Your order was placed"}"#,
        )
        .unwrap();
        assert_eq!(response.extra_field("OrderId"), Some(&json!("1234")));
        assert!(response.extra_field("missing").is_none());
    }

    #[test]
    fn test_envelope_requires_success() {
        assert!(serde_json::from_str::<CryptsyResponse>(r#"{"error":""}"#).is_err());
        assert!(serde_json::from_str::<CryptsyResponse>(r#"{"success":null}"#).is_err());
    }

    #[test]
    fn test_number_or_string() {
        let values: Vec<NumberOrString> =
            serde_json::from_value(json!(["1.5", 2, 0.25, " 3 "])).unwrap();
        let texts: Vec<_> = values.iter().map(|v| v.as_text().into_owned()).collect();
        assert_eq!(texts, vec!["1.5", "2", "0.25", "3"]);
        assert!(serde_json::from_value::<NumberOrString>(json!([1])).is_err());
    }

    #[test]
    fn test_depth_sides_required() {
        let payload: DepthPayload =
            serde_json::from_value(json!({"buy": null, "sell": [["1", "2"]]})).unwrap();
        assert!(payload.buy.is_empty());
        assert_eq!(payload.sell.len(), 1);

        for value in [
            json!({}),
            json!({"bids": [["1", "2"]]}),
            json!({"buy": []}),
            json!([]),
        ] {
            assert!(serde_json::from_value::<DepthPayload>(value).is_err());
        }
    }

    #[test]
    fn test_balances_accepts_empty_list() {
        let payload: BalancesPayload =
            serde_json::from_value(json!({"balances_available": []})).unwrap();
        assert!(payload.balances_available.is_empty());

        let err = serde_json::from_value::<BalancesPayload>(json!({"balances_available": "x"}));
        assert!(err.is_err());
    }
}
