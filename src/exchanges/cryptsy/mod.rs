pub mod conversions;
pub mod signer;
pub mod types;

pub mod builder;
pub mod connector;
pub mod rest;

// Re-export main components
pub use builder::{build_connector, CryptsyBuilder};
pub use connector::{Account, CryptsyConnector, MarketData, Trading};
pub use rest::CryptsyRest;
pub use signer::CryptsySigner;
pub use types::{
    BalancesPayload, CryptsyResponse, DepthPayload, MarketEntry, NumberOrString, OrderEntry,
    TradeEntry,
};
