pub mod core;
pub mod exchanges;

pub use crate::core::{
    errors::{ErrorKind, ExchangeError},
    traits::{AccountInfo, ExchangeConnector, MarketDataSource, OrderPlacer},
    types::*,
};
pub use crate::exchanges::cryptsy::{CryptsyBuilder, CryptsyConnector};
