use crate::core::errors::ExchangeError;
use crate::core::kernel::RestClient;
use crate::core::traits::AccountInfo;
use crate::core::types::{Balance, OrderIds};
use crate::exchanges::cryptsy::{conversions, rest::CryptsyRest};
use async_trait::async_trait;
use tracing::instrument;

/// Cryptsy account implementation
pub struct Account<R: RestClient> {
    rest: CryptsyRest<R>,
}

impl<R: RestClient + Clone> Account<R> {
    pub fn new(rest: &R) -> Self {
        Self {
            rest: CryptsyRest::new(rest.clone()),
        }
    }
}

#[async_trait]
impl<R: RestClient> AccountInfo for Account<R> {
    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn get_balances(&self) -> Result<Vec<Balance>, ExchangeError> {
        let payload = self.rest.get_info().await?;
        conversions::convert_balances(payload)
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn get_open_order_ids(&self) -> Result<OrderIds, ExchangeError> {
        let entries = self.rest.get_all_my_orders().await?;
        conversions::convert_order_ids(&entries)
    }

    #[instrument(skip(self), fields(exchange = "cryptsy"))]
    async fn get_open_order_ids_for_market(
        &self,
        market_id: u64,
    ) -> Result<OrderIds, ExchangeError> {
        let entries = self.rest.get_my_orders(market_id).await?;
        conversions::convert_order_ids(&entries)
    }
}
