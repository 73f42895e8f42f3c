use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::{AccountInfo, MarketDataSource, OrderPlacer};
use crate::core::types::{ActionType, Balance, Depth, Markets, OrderAction, OrderIds, Trade};
use async_trait::async_trait;

pub mod account;
pub mod market_data;
pub mod trading;

pub use account::Account;
pub use market_data::MarketData;
pub use trading::Trading;

/// Cryptsy connector that composes all sub-trait implementations
///
/// All three components share one `RestClient`, and through it one signer, so
/// every call made from this connector draws from a single nonce sequence.
pub struct CryptsyConnector<R: RestClient> {
    pub market: MarketData<R>,
    pub trading: Trading<R>,
    pub account: Account<R>,
}

impl<R: RestClient + Clone> CryptsyConnector<R> {
    pub fn new(rest: R) -> Self {
        Self {
            market: MarketData::new(&rest),
            trading: Trading::new(&rest),
            account: Account::new(&rest),
        }
    }
}

impl<R: RestClient> CryptsyConnector<R> {
    /// Resolve `order.market` within `markets` and place the order
    pub async fn place_order(
        &self,
        order: &OrderAction,
        markets: &Markets,
    ) -> Result<u64, ExchangeError> {
        self.trading.place_order(order, markets).await
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for CryptsyConnector<R> {
    async fn get_balances(&self) -> Result<Vec<Balance>, ExchangeError> {
        self.account.get_balances().await
    }

    async fn get_open_order_ids(&self) -> Result<OrderIds, ExchangeError> {
        self.account.get_open_order_ids().await
    }

    async fn get_open_order_ids_for_market(
        &self,
        market_id: u64,
    ) -> Result<OrderIds, ExchangeError> {
        self.account.get_open_order_ids_for_market(market_id).await
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for CryptsyConnector<R> {
    async fn get_markets(&self) -> Result<Markets, ExchangeError> {
        self.market.get_markets().await
    }

    async fn get_depth(&self, market_id: u64) -> Result<Depth, ExchangeError> {
        self.market.get_depth(market_id).await
    }

    async fn get_market_trades(&self, market_id: u64) -> Result<Vec<Trade>, ExchangeError> {
        self.market.get_market_trades(market_id).await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for CryptsyConnector<R> {
    async fn create_order(
        &self,
        market_id: u64,
        action: ActionType,
        quantity: f64,
        price: f64,
    ) -> Result<u64, ExchangeError> {
        self.trading
            .create_order(market_id, action, quantity, price)
            .await
    }

    async fn cancel_order(&self, order_id: u64) -> Result<(), ExchangeError> {
        self.trading.cancel_order(order_id).await
    }

    async fn cancel_all_orders(&self) -> Result<(), ExchangeError> {
        self.trading.cancel_all_orders().await
    }
}
