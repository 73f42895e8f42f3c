use crate::core::errors::ExchangeError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::str::FromStr;

/// Available balance of one currency
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Balance {
    /// Currency code, e.g. `BTC`
    pub name: String,
    pub available: f64,
}

/// Stable identity of a tradeable pair, independent of the venue's numeric id
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MarketKey {
    pub primary: String,
    pub secondary: String,
    /// The pair addressed in the opposite quote direction
    pub reversed: bool,
}

impl MarketKey {
    pub fn new(primary: impl Into<String>, secondary: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            secondary: secondary.into(),
            reversed: false,
        }
    }

    /// Same pair, opposite quote direction
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self {
            primary: self.primary.clone(),
            secondary: self.secondary.clone(),
            reversed: !self.reversed,
        }
    }
}

impl fmt::Display for MarketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.reversed {
            write!(f, "{}/{}", self.secondary, self.primary)
        } else {
            write!(f, "{}/{}", self.primary, self.secondary)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub key: MarketKey,
    pub label: String,
    pub primary_name: String,
    pub primary_code: String,
    pub secondary_name: String,
    pub secondary_code: String,
    /// Venue-assigned numeric id, used as `marketid` in requests
    pub market_id: u64,
    pub volume: Option<f64>,
    /// Fee rates as normalized fractions. `getmarkets` carries no fee data,
    /// so these stay `None` until a real source exists.
    pub buy_fee: Option<f64>,
    pub sell_fee: Option<f64>,
}

/// Markets by stable key
pub type Markets = HashMap<MarketKey, Market>;

/// Resting order book entry; its side is given by the list it sits in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub price: f64,
    pub quantity: f64,
}

/// Order book depth, each side in venue order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Depth {
    pub buy: Vec<Order>,
    pub sell: Vec<Order>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Buy,
    Sell,
}

impl ActionType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buy => "buy",
            Self::Sell => "sell",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionType {
    type Err = ExchangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "buy" => Ok(Self::Buy),
            "sell" => Ok(Self::Sell),
            other => Err(ExchangeError::InvalidParameters(format!(
                "Order type must be 'buy' or 'sell', got '{}'",
                other
            ))),
        }
    }
}

/// Request to buy or sell `quantity` at `price` in a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderAction {
    pub market: MarketKey,
    pub action: ActionType,
    pub price: f64,
    pub quantity: f64,
}

impl OrderAction {
    /// Reject non-finite or non-positive amounts before anything is sent
    pub fn validate(&self) -> Result<(), ExchangeError> {
        validate_amount("price", self.price)?;
        validate_amount("quantity", self.quantity)
    }
}

pub(crate) fn validate_amount(field: &str, value: f64) -> Result<(), ExchangeError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ExchangeError::InvalidParameters(format!(
            "{} must be a positive finite number, got {}",
            field, value
        )))
    }
}

/// Ids of the account's open orders
pub type OrderIds = BTreeSet<u64>;

/// Executed trade in a market
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: u64,
    /// Venue server time, no zone attached
    pub time: NaiveDateTime,
    pub price: f64,
    pub quantity: f64,
    pub initiated_by: Option<ActionType>,
}
