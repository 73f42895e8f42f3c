use crate::core::{
    errors::ExchangeError,
    types::{ActionType, Balance, Depth, Markets, OrderIds, Trade},
};
use async_trait::async_trait;

#[async_trait]
pub trait MarketDataSource {
    /// Get all available markets keyed by pair
    async fn get_markets(&self) -> Result<Markets, ExchangeError>;

    /// Get resting buy and sell orders of one market
    async fn get_depth(&self, market_id: u64) -> Result<Depth, ExchangeError>;

    /// Get recent trades of one market
    async fn get_market_trades(&self, market_id: u64) -> Result<Vec<Trade>, ExchangeError>;
}

#[async_trait]
pub trait OrderPlacer {
    /// Place a limit order, returning the venue-assigned order id
    async fn create_order(
        &self,
        market_id: u64,
        action: ActionType,
        quantity: f64,
        price: f64,
    ) -> Result<u64, ExchangeError>;

    async fn cancel_order(&self, order_id: u64) -> Result<(), ExchangeError>;

    async fn cancel_all_orders(&self) -> Result<(), ExchangeError>;
}

#[async_trait]
pub trait AccountInfo {
    async fn get_balances(&self) -> Result<Vec<Balance>, ExchangeError>;

    /// Ids of all open orders across markets
    async fn get_open_order_ids(&self) -> Result<OrderIds, ExchangeError>;

    async fn get_open_order_ids_for_market(&self, market_id: u64)
        -> Result<OrderIds, ExchangeError>;
}

pub trait ExchangeConnector: MarketDataSource + OrderPlacer + AccountInfo {}

impl<T: MarketDataSource + OrderPlacer + AccountInfo> ExchangeConnector for T {}
