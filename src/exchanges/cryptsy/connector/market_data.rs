use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::MarketDataSource;
use crate::core::types::{Depth, Markets, Trade};
use crate::exchanges::cryptsy::{conversions, rest::CryptsyRest};
use async_trait::async_trait;
use tracing::instrument;

/// Market data implementation for Cryptsy
pub struct MarketData<R: RestClient> {
    rest: CryptsyRest<R>,
}

impl<R: RestClient + Clone> MarketData<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: CryptsyRest::new(rest.clone()),
        }
    }
}

#[async_trait]
impl<R: RestClient> MarketDataSource for MarketData<R> {
    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn get_markets(&self) -> Result<Markets, ExchangeError> {
        let entries = self.rest.get_markets().await?;
        conversions::convert_markets(entries)
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn get_depth(&self, market_id: u64) -> Result<Depth, ExchangeError> {
        let payload = self.rest.get_depth(market_id).await?;
        conversions::convert_depth(payload)
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn get_market_trades(&self, market_id: u64) -> Result<Vec<Trade>, ExchangeError> {
        let entries = self.rest.get_market_trades(market_id).await?;
        conversions::convert_trades(&entries)
    }
}
