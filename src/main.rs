use anyhow::Context;
use cryptsy_connector::core::config::ExchangeConfig;
use cryptsy_connector::core::traits::{AccountInfo, MarketDataSource};
use cryptsy_connector::exchanges::cryptsy::build_connector;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    // Reads CRYPTSY_API_KEY / CRYPTSY_SECRET_KEY, and a .env file when present
    #[cfg(feature = "env-file")]
    let config = ExchangeConfig::from_env_file("CRYPTSY")?;
    #[cfg(not(feature = "env-file"))]
    let config = ExchangeConfig::from_env("CRYPTSY")?;

    let cryptsy = build_connector(config).context("failed to build Cryptsy connector")?;

    println!("Fetching balances...");
    for balance in cryptsy.get_balances().await? {
        if balance.available > 0.0 {
            println!("{:>8} {:.8}", balance.name, balance.available);
        }
    }

    println!("Fetching markets...");
    let markets = cryptsy.get_markets().await?;
    println!("Found {} markets", markets.len());
    let mut keys: Vec<_> = markets.keys().collect();
    keys.sort();
    for key in keys.into_iter().take(5) {
        let market = &markets[key];
        println!("Market: {} (id {})", market.label, market.market_id);
    }

    let open = cryptsy.get_open_order_ids().await?;
    println!("Open orders: {:?}", open);

    // Example order (commented out for safety)
    /*
    use cryptsy_connector::{ActionType, MarketKey, OrderAction};
    let order = OrderAction {
        market: MarketKey::new("LTC", "BTC"),
        action: ActionType::Buy,
        price: 0.001,
        quantity: 1.0,
    };
    let order_id = cryptsy.place_order(&order, &markets).await?;
    println!("Order placed: {}", order_id);
    */

    Ok(())
}
