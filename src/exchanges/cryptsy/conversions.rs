use super::types::{
    BalancesPayload, DepthPayload, MarketEntry, NumberOrString, OrderEntry, TradeEntry,
};
use crate::core::errors::ExchangeError;
use crate::core::types::{
    ActionType, Balance, Depth, Market, MarketKey, Markets, Order, OrderIds, Trade,
};
use chrono::NaiveDateTime;

/// Venue timestamp format for trades
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse a decimal field; anything that is not a finite number fails the call
pub fn parse_f64(field: &str, value: &NumberOrString) -> Result<f64, ExchangeError> {
    let text = value.as_text();
    let parsed = text
        .parse::<f64>()
        .map_err(|e| ExchangeError::ParseError(format!("Invalid {} '{}': {}", field, text, e)))?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(ExchangeError::ParseError(format!(
            "Invalid {} '{}': not a finite number",
            field, text
        )))
    }
}

/// Parse a non-negative integer id
pub fn parse_u64(field: &str, value: &NumberOrString) -> Result<u64, ExchangeError> {
    let text = value.as_text();
    text.parse::<u64>()
        .map_err(|e| ExchangeError::ParseError(format!("Invalid {} '{}': {}", field, text, e)))
}

/// One balance per currency in `balances_available`, sorted by currency code
pub fn convert_balances(payload: BalancesPayload) -> Result<Vec<Balance>, ExchangeError> {
    let mut balances = payload
        .balances_available
        .into_iter()
        .map(|(name, amount)| {
            let available = parse_f64(&format!("balance of {}", name), &amount)?;
            Ok(Balance { name, available })
        })
        .collect::<Result<Vec<_>, ExchangeError>>()?;

    balances.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(balances)
}

pub fn convert_market(entry: MarketEntry) -> Result<Market, ExchangeError> {
    let market_id = parse_u64("marketid", &entry.marketid)?;
    let volume = entry
        .current_volume
        .as_ref()
        .map(|v| parse_f64("current_volume", v))
        .transpose()?;

    Ok(Market {
        key: MarketKey::new(
            entry.primary_currency_code.clone(),
            entry.secondary_currency_code.clone(),
        ),
        label: entry.label,
        primary_name: entry.primary_currency_name,
        primary_code: entry.primary_currency_code,
        secondary_name: entry.secondary_currency_name,
        secondary_code: entry.secondary_currency_code,
        market_id,
        volume,
        buy_fee: None,
        sell_fee: None,
    })
}

/// Markets keyed by `(primary, secondary, reversed = false)`
pub fn convert_markets(entries: Vec<MarketEntry>) -> Result<Markets, ExchangeError> {
    entries
        .into_iter()
        .map(|entry| convert_market(entry).map(|market| (market.key.clone(), market)))
        .collect()
}

fn convert_side(side: &str, rows: Vec<Vec<NumberOrString>>) -> Result<Vec<Order>, ExchangeError> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row.as_slice() {
            [price, quantity, ..] => Ok(Order {
                price: parse_f64(&format!("{} price", side), price)?,
                quantity: parse_f64(&format!("{} quantity", side), quantity)?,
            }),
            _ => Err(ExchangeError::DeserializationError(format!(
                "{} row {} has {} fields, expected [price, quantity]",
                side,
                i,
                row.len()
            ))),
        })
        .collect()
}

/// Both book sides, rows kept in the order the venue sent them
pub fn convert_depth(payload: DepthPayload) -> Result<Depth, ExchangeError> {
    Ok(Depth {
        buy: convert_side("buy", payload.buy)?,
        sell: convert_side("sell", payload.sell)?,
    })
}

pub fn convert_order_ids(entries: &[OrderEntry]) -> Result<OrderIds, ExchangeError> {
    entries
        .iter()
        .map(|entry| parse_u64("orderid", &entry.orderid))
        .collect()
}

fn convert_initiator(raw: &str) -> Result<ActionType, ExchangeError> {
    if raw.eq_ignore_ascii_case("buy") {
        Ok(ActionType::Buy)
    } else if raw.eq_ignore_ascii_case("sell") {
        Ok(ActionType::Sell)
    } else {
        Err(ExchangeError::ParseError(format!(
            "Invalid initiate_ordertype '{}'",
            raw
        )))
    }
}

pub fn convert_trade(entry: &TradeEntry) -> Result<Trade, ExchangeError> {
    let time = NaiveDateTime::parse_from_str(entry.datetime.trim(), DATETIME_FORMAT).map_err(|e| {
        ExchangeError::ParseError(format!("Invalid trade datetime '{}': {}", entry.datetime, e))
    })?;

    Ok(Trade {
        trade_id: parse_u64("tradeid", &entry.tradeid)?,
        time,
        price: parse_f64("tradeprice", &entry.tradeprice)?,
        quantity: parse_f64("quantity", &entry.quantity)?,
        initiated_by: entry
            .initiate_ordertype
            .as_deref()
            .map(convert_initiator)
            .transpose()?,
    })
}

pub fn convert_trades(entries: &[TradeEntry]) -> Result<Vec<Trade>, ExchangeError> {
    entries.iter().map(convert_trade).collect()
}
