use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::OrderPlacer;
use crate::core::types::{ActionType, Markets, OrderAction};
use crate::exchanges::cryptsy::{conversions, rest::CryptsyRest};
use async_trait::async_trait;
use tracing::{info, instrument};

/// Trading implementation for Cryptsy
pub struct Trading<R: RestClient> {
    rest: CryptsyRest<R>,
}

impl<R: RestClient + Clone> Trading<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: CryptsyRest::new(rest.clone()),
        }
    }
}

impl<R: RestClient> Trading<R> {
    /// Place `order` in the market its key resolves to within `markets`
    ///
    /// Nothing is sent when the key is unknown or the amounts are invalid.
    #[instrument(skip(self, markets), fields(exchange = "cryptsy", market = %order.market))]
    pub async fn place_order(
        &self,
        order: &OrderAction,
        markets: &Markets,
    ) -> Result<u64, ExchangeError> {
        order.validate()?;
        let market = markets.get(&order.market).ok_or_else(|| {
            ExchangeError::InvalidParameters(format!("Unknown market {}", order.market))
        })?;

        self.create_order(market.market_id, order.action, order.quantity, order.price)
            .await
    }
}

#[async_trait]
impl<R: RestClient> OrderPlacer for Trading<R> {
    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn create_order(
        &self,
        market_id: u64,
        action: ActionType,
        quantity: f64,
        price: f64,
    ) -> Result<u64, ExchangeError> {
        let raw_id = self
            .rest
            .create_order(market_id, action, quantity, price)
            .await?;
        let order_id = conversions::parse_u64("orderid", &raw_id)?;
        info!(order_id, "order created");
        Ok(order_id)
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn cancel_order(&self, order_id: u64) -> Result<(), ExchangeError> {
        self.rest.cancel_order(order_id).await
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn cancel_all_orders(&self) -> Result<(), ExchangeError> {
        self.rest.cancel_all_orders().await
    }
}
