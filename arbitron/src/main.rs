// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
#![forbid(unsafe_code)]
//! Process entry point: loads [`Config`] from the environment, wires the
//! [`Engine`], and drives it until a shutdown signal arrives.
//!
//! Real venue WebSocket/REST adapters and trading clients are the thin
//! wire-protocol layer this workspace treats as an external collaborator (spec
//! section 1's non-goals); this binary wires [`MockTradingClient`] per
//! configured venue so the engine, risk gates and journal run end-to-end
//! without live exchange connectivity. A deployment swapping in real adapters
//! only needs to populate [`EngineDeps::adapters`] and
//! [`EngineDeps::trading_clients`] with its own [`ExchangeAdapter`]/
//! [`TradingClient`] implementations; nothing else in `main` changes.

use arbitron_core::{Config, CoreError, Engine, EngineDeps};
use arbitron_data::adapter::ExchangeAdapter;
use arbitron_data::event::AdapterEvent;
use arbitron_detect::{LegDirection, TriangularPath};
use arbitron_execution::{MockTradingClient, TradingClient};
use arbitron_integration::channel::UnboundedTx;
use arbitron_markets::{ExchangeId, Symbol};
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

fn mock_trading_clients(config: &Config) -> Vec<Arc<dyn TradingClient>> {
    config
        .credentials
        .keys()
        .map(|venue| Arc::new(MockTradingClient::new(*venue, dec!(1))) as Arc<dyn TradingClient>)
        .collect()
}

/// A single illustrative BTC/USDT/ETH conversion cycle on Binance. Real
/// deployments derive their path set from the venue's tradable-pair listing;
/// this default keeps the engine exercising the triangular detector out of
/// the box, in test mode, without that external bookkeeping.
fn default_triangular_paths() -> Vec<TriangularPath> {
    vec![TriangularPath {
        venue: ExchangeId::Binance,
        legs: [Symbol::new("BTC", "USDT"), Symbol::new("ETH", "BTC"), Symbol::new("ETH", "USDT")],
        directions: [LegDirection::Buy, LegDirection::Buy, LegDirection::Sell],
        min_amount: dec!(10),
    }]
}

fn adapters() -> Vec<Arc<dyn ExchangeAdapter>> {
    // Real per-venue adapters are supplied by the deployment embedding this
    // engine; see the module doc comment above.
    Vec::new()
}

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    let config = Config::from_env()?;
    arbitron_core::logging::init_logging();

    arbitron_core::engine::check_bootstrap(&config)?;

    let deps = EngineDeps {
        adapters: adapters(),
        trading_clients: mock_trading_clients(&config),
        triangular_paths: default_triangular_paths(),
    };
    let engine = Arc::new(Engine::new(&config, deps));

    let (raw_tx, rx) = tokio::sync::mpsc::unbounded_channel::<AdapterEvent>();
    let tx = UnboundedTx::new(raw_tx, "adapter-events");
    engine.spawn_adapters(tx);

    let journal = Arc::clone(engine.journal());
    let summary_task = tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(3600));
        loop {
            ticker.tick().await;
            let today = journal.today();
            if let Err(error) = journal.write_summary(today).await {
                error!(%error, "failed to write hourly trade summary");
            }
        }
    });

    info!("arbitron engine starting");
    engine.clone().run(rx, arbitron_core::shutdown::wait_for_signal()).await;
    info!("arbitron engine stopped, writing final summary");

    summary_task.abort();
    if let Err(error) = engine.journal().write_summary(engine.journal().today()).await {
        error!(%error, "failed to write final trade summary");
    }

    Ok(())
}
