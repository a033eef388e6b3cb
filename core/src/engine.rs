// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! # Engine
//!
//! Wires every subsystem together and drives the event loop described in spec
//! section 5: adapters push normalized [`AdapterEvent`]s onto a channel, the
//! engine applies book deltas to the shared registries, re-runs the detectors on
//! every fresh tick, and spawns a bounded trade task per emitted opportunity.

use crate::config::Config;
use crate::error::CoreError;
use arbitron_data::adapter::reconstruct::{self, BookReconstructor};
use arbitron_data::adapter::ExchangeAdapter;
use arbitron_data::book::registry::{BookRegistry, PriceRegistry};
use arbitron_data::error::DataError;
use arbitron_data::event::AdapterEvent;
use arbitron_detect::{CrossVenueConfig, CrossVenueDetector, TriangularConfig, TriangularDetector, TriangularPath};
use arbitron_execution::{ClientRegistry, OrderExecutor, TradeOrchestrator, TradingClient, TransactionJournal};
use arbitron_integration::channel::UnboundedTx;
use arbitron_markets::{ExchangeId, Symbol};
use arbitron_risk::{BalanceLedger, DailyLedger, RiskManager};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::{Mutex, Semaphore};
use tracing::{error, info, warn};

/// Everything the engine needs that the caller assembles before startup: the
/// live venue connections and, for triangular detection, the closed conversion
/// cycles to evaluate on every tick.
pub struct EngineDeps {
    pub adapters: Vec<Arc<dyn ExchangeAdapter>>,
    pub trading_clients: Vec<Arc<dyn TradingClient>>,
    pub triangular_paths: Vec<TriangularPath>,
}

/// The wired system: registries, both detectors, both strategies' risk managers
/// and orchestrators, and the concurrency gates that bound in-flight trades.
pub struct Engine {
    prices: Arc<PriceRegistry>,
    books: Arc<BookRegistry>,
    reconstructors: Mutex<HashMap<(ExchangeId, Symbol), Box<dyn BookReconstructor>>>,
    cross_detector: Arc<CrossVenueDetector>,
    triangular_detector: Arc<TriangularDetector>,
    cross_orchestrator: Arc<TradeOrchestrator>,
    triangular_orchestrator: Arc<TradeOrchestrator>,
    journal: Arc<TransactionJournal>,
    cross_permits: Arc<Semaphore>,
    triangular_permits: Arc<Semaphore>,
    trading_enabled: Arc<AtomicBool>,
    cross_enabled: Arc<AtomicBool>,
    triangular_enabled: Arc<AtomicBool>,
    adapters: Vec<Arc<dyn ExchangeAdapter>>,
}

impl Engine {
    pub fn new(config: &Config, deps: EngineDeps) -> Self {
        let prices = Arc::new(PriceRegistry::new());
        let books = Arc::new(BookRegistry::new());

        let daily = Arc::new(DailyLedger::new(config.max_daily_trades, config.max_daily_loss));
        let balances = Arc::new(BalanceLedger::new());

        let mut cross_risk = RiskManager::new(Arc::clone(&daily), Arc::clone(&balances), config.cross.max_position_size);
        let mut triangular_risk =
            RiskManager::new(Arc::clone(&daily), Arc::clone(&balances), config.triangular.max_position_size);
        for venue in &config.blacklisted_exchanges {
            cross_risk.blacklist_venue(*venue);
            triangular_risk.blacklist_venue(*venue);
        }
        for symbol in &config.blacklisted_symbols {
            cross_risk.blacklist_symbol(symbol.clone());
            triangular_risk.blacklist_symbol(symbol.clone());
        }

        let mut clients = ClientRegistry::new();
        for client in deps.trading_clients {
            clients.register(client);
        }
        let executor = Arc::new(OrderExecutor::new(Arc::new(clients)));
        let journal = Arc::new(TransactionJournal::new(config.journal_dir.clone()));

        let cross_orchestrator = Arc::new(
            TradeOrchestrator::new(Arc::clone(&executor), Arc::new(cross_risk), Arc::clone(&journal))
                .with_order_timeout(config.orders.timeout),
        );
        let triangular_orchestrator = Arc::new(
            TradeOrchestrator::new(executor, Arc::new(triangular_risk), Arc::clone(&journal))
                .with_order_timeout(config.orders.timeout),
        );

        let cross_detector = Arc::new(CrossVenueDetector::new(
            Arc::clone(&prices),
            Arc::clone(&books),
            CrossVenueConfig {
                max_investment: config.cross.max_position_size,
                min_profit_percent: config.cross.min_profit_percent,
                ..CrossVenueConfig::default()
            },
        ));
        let triangular_detector = Arc::new(TriangularDetector::new(
            Arc::clone(&prices),
            Arc::clone(&books),
            deps.triangular_paths,
            TriangularConfig {
                min_profit_percent: config.triangular.min_profit_percent,
                ..TriangularConfig::default()
            },
        ));

        Self {
            prices,
            books,
            reconstructors: Mutex::new(HashMap::new()),
            cross_detector,
            triangular_detector,
            cross_orchestrator,
            triangular_orchestrator,
            journal,
            cross_permits: Arc::new(Semaphore::new(config.cross.max_concurrent)),
            triangular_permits: Arc::new(Semaphore::new(config.triangular.max_concurrent)),
            trading_enabled: Arc::new(AtomicBool::new(config.trading_enabled)),
            cross_enabled: Arc::new(AtomicBool::new(config.cross.enabled)),
            triangular_enabled: Arc::new(AtomicBool::new(config.triangular.enabled)),
            adapters: deps.adapters,
        }
    }

    pub fn set_trading_enabled(&self, enabled: bool) {
        self.trading_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn set_cross_enabled(&self, enabled: bool) {
        self.cross_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn set_triangular_enabled(&self, enabled: bool) {
        self.triangular_enabled.store(enabled, Ordering::Relaxed);
    }

    pub fn prices(&self) -> &Arc<PriceRegistry> {
        &self.prices
    }

    pub fn books(&self) -> &Arc<BookRegistry> {
        &self.books
    }

    /// The shared journal both orchestrators write to. `main` reads this to drive
    /// the end-of-day and on-shutdown summary write (spec 4.9).
    pub fn journal(&self) -> &Arc<TransactionJournal> {
        &self.journal
    }

    /// Spawns every adapter's `run` loop onto the runtime, feeding `tx`.
    pub fn spawn_adapters(&self, tx: UnboundedTx<AdapterEvent>) {
        for adapter in &self.adapters {
            let adapter = Arc::clone(adapter);
            let tx = tx.clone();
            tokio::spawn(async move {
                if let Err(error) = adapter.run(tx).await {
                    error!(venue = %adapter.venue(), %error, "adapter terminated");
                }
            });
        }
    }

    /// Drains `rx` until it closes (every adapter sender dropped) or `shutdown`
    /// resolves, applying book deltas and running detection on every tick.
    pub async fn run(self: Arc<Self>, mut rx: UnboundedReceiver<AdapterEvent>, shutdown: impl std::future::Future<Output = ()>) {
        tokio::pin!(shutdown);
        loop {
            tokio::select! {
                event = rx.recv() => {
                    match event {
                        Some(event) => self.dispatch(event).await,
                        None => {
                            info!("adapter event channel closed, stopping engine loop");
                            break;
                        }
                    }
                }
                _ = &mut shutdown => {
                    info!("shutdown signal received, draining engine loop");
                    break;
                }
            }
        }
    }

    async fn dispatch(&self, event: AdapterEvent) {
        match event {
            AdapterEvent::Tick(tick) => {
                let symbol = tick.symbol.clone();
                self.prices.update(tick);
                self.on_symbol_updated(&symbol).await;
            }
            AdapterEvent::Book { venue, symbol, delta } => {
                self.apply_book_delta(venue, symbol, delta).await;
            }
            AdapterEvent::BookInvalidate { venue, symbol } => {
                warn!(%venue, %symbol, "book invalidated upstream");
                self.books.invalidate(venue, &symbol);
                self.reconstructors.lock().await.remove(&(venue, symbol));
            }
            AdapterEvent::ConnectionLost { venue } => {
                error!(%venue, "adapter exhausted its reconnect budget");
            }
        }
    }

    async fn apply_book_delta(&self, venue: ExchangeId, symbol: Symbol, delta: arbitron_data::event::BookDelta) {
        let key = (venue, symbol.clone());
        let mut guard = self.reconstructors.lock().await;
        let reconstructor = guard.entry(key).or_insert_with(|| reconstruct::for_venue(venue));

        let result = self.books.with_mut(venue, &symbol, |replica| reconstructor.ingest(replica, venue, &symbol, delta));
        if let Err(DataError::BookInconsistency { reason, .. }) = result {
            warn!(%venue, %symbol, %reason, "book inconsistency, discarding replica");
            self.books.invalidate(venue, &symbol);
            reconstructor.reset();
        }
    }

    async fn on_symbol_updated(&self, symbol: &Symbol) {
        if !self.trading_enabled.load(Ordering::Relaxed) {
            return;
        }

        if self.cross_enabled.load(Ordering::Relaxed) {
            for opportunity in self.cross_detector.on_tick(symbol) {
                let orchestrator = Arc::clone(&self.cross_orchestrator);
                let permits = Arc::clone(&self.cross_permits);
                tokio::spawn(async move {
                    let Ok(_permit) = permits.acquire_owned().await else {
                        return;
                    };
                    orchestrator.execute_cross_venue(opportunity).await;
                });
            }
        }

        if self.triangular_enabled.load(Ordering::Relaxed) {
            for opportunity in self.triangular_detector.on_tick(symbol) {
                let orchestrator = Arc::clone(&self.triangular_orchestrator);
                let permits = Arc::clone(&self.triangular_permits);
                tokio::spawn(async move {
                    let Ok(_permit) = permits.acquire_owned().await else {
                        return;
                    };
                    orchestrator.execute_triangular(opportunity).await;
                });
            }
        }
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("trading_enabled", &self.trading_enabled.load(Ordering::Relaxed))
            .field("cross_enabled", &self.cross_enabled.load(Ordering::Relaxed))
            .field("triangular_enabled", &self.triangular_enabled.load(Ordering::Relaxed))
            .field("adapters", &self.adapters.len())
            .finish_non_exhaustive()
    }
}

/// Emergency stop: the daily ledger latches once `max_daily_loss` is breached,
/// which `RiskManager::evaluate` already checks on every request (spec 7,
/// `DailyLimitBreached`); this just re-surfaces it so bootstrap code can
/// `tracing::error!` once. No separate error type - the behaviour is
/// observed through the ledger, never propagated as an engine-fatal error.
pub fn check_bootstrap(config: &Config) -> Result<(), CoreError> {
    if config.credentials.is_empty() && !config.test_mode {
        return Err(CoreError::Config("no venue credentials configured and TEST_MODE is off".to_string()));
    }
    Ok(())
}
