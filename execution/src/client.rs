// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! The uniform trading-venue contract every real or mock execution backend
//! implements, and a deterministic in-memory mock for tests and paper trading.

use crate::error::ExecutionError;
use crate::order::{ExecutedOrder, OrderKind, OrderStatus};
use arbitron_markets::{ExchangeId, Side, Symbol};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// The trading operations the rest of the execution layer needs from a venue:
/// place a market or limit order, poll or cancel an existing one, and read a
/// balance. Every concrete venue integration (REST + auth signing, in this
/// repo's scope) implements this against its own wire format.
#[async_trait]
pub trait TradingClient: Send + Sync + std::fmt::Debug {
    fn venue(&self) -> ExchangeId;

    async fn create_market_order(
        &self,
        symbol: &Symbol,
        side: Side,
        quantity: Decimal,
    ) -> Result<ExecutedOrder, ExecutionError>;

    async fn create_limit_order(
        &self,
        symbol: &Symbol,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<ExecutedOrder, ExecutionError>;

    async fn fetch_order(&self, symbol: &Symbol, venue_order_id: &str) -> Result<ExecutedOrder, ExecutionError>;

    async fn cancel_order(&self, symbol: &Symbol, venue_order_id: &str) -> Result<(), ExecutionError>;

    async fn fetch_balance(&self, asset: &str) -> Result<Decimal, ExecutionError>;
}

/// A deterministic, in-process stand-in for a venue. Market orders fill
/// immediately and completely at a caller-supplied reference price; limit
/// orders are accepted open and must be advanced explicitly via
/// [`MockTradingClient::fill`] in tests. Balances are seeded with
/// [`MockTradingClient::set_balance`].
#[derive(Debug)]
pub struct MockTradingClient {
    venue: ExchangeId,
    reference_price: Decimal,
    fee_rate: Decimal,
    next_order_id: AtomicU64,
    orders: Mutex<HashMap<String, ExecutedOrder>>,
    balances: Mutex<HashMap<String, Decimal>>,
}

impl MockTradingClient {
    pub fn new(venue: ExchangeId, reference_price: Decimal) -> Self {
        Self {
            venue,
            reference_price,
            fee_rate: venue.taker_fee_rate(),
            next_order_id: AtomicU64::new(1),
            orders: Mutex::new(HashMap::new()),
            balances: Mutex::new(HashMap::new()),
        }
    }

    pub fn set_balance(&self, asset: impl Into<String>, amount: Decimal) {
        self.balances.lock().insert(asset.into(), amount);
    }

    fn allocate_order_id(&self) -> String {
        format!("mock-{}-{}", self.venue.as_str(), self.next_order_id.fetch_add(1, Ordering::Relaxed))
    }

    /// Test-only hook: advances an order that was left `Open` (a limit order) to
    /// `Filled` at its requested price.
    pub fn fill(&self, venue_order_id: &str) {
        let mut orders = self.orders.lock();
        if let Some(order) = orders.get_mut(venue_order_id) {
            order.filled_quantity = order.requested_quantity;
            order.average_fill_price = order.average_fill_price.max(Decimal::ZERO);
            order.status = OrderStatus::Filled;
            order.updated_at = Utc::now();
        }
    }
}

#[async_trait]
impl TradingClient for MockTradingClient {
    fn venue(&self) -> ExchangeId {
        self.venue
    }

    async fn create_market_order(
        &self,
        symbol: &Symbol,
        side: Side,
        quantity: Decimal,
    ) -> Result<ExecutedOrder, ExecutionError> {
        let now = Utc::now();
        let fee = self.reference_price * quantity * self.fee_rate;
        let order = ExecutedOrder::new(
            self.venue,
            symbol.clone(),
            self.allocate_order_id(),
            side,
            OrderKind::Market,
            quantity,
            quantity,
            self.reference_price,
            fee,
            OrderStatus::Filled,
            now,
            now,
        );
        self.orders.lock().insert(order.venue_order_id.clone(), order.clone());
        Ok(order)
    }

    async fn create_limit_order(
        &self,
        symbol: &Symbol,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<ExecutedOrder, ExecutionError> {
        let now = Utc::now();
        let order = ExecutedOrder::new(
            self.venue,
            symbol.clone(),
            self.allocate_order_id(),
            side,
            OrderKind::Limit,
            quantity,
            Decimal::ZERO,
            price,
            Decimal::ZERO,
            OrderStatus::Open,
            now,
            now,
        );
        self.orders.lock().insert(order.venue_order_id.clone(), order.clone());
        Ok(order)
    }

    async fn fetch_order(&self, _symbol: &Symbol, venue_order_id: &str) -> Result<ExecutedOrder, ExecutionError> {
        self.orders
            .lock()
            .get(venue_order_id)
            .cloned()
            .ok_or_else(|| ExecutionError::NotFound {
                venue: self.venue,
                venue_order_id: venue_order_id.to_string(),
            })
    }

    async fn cancel_order(&self, _symbol: &Symbol, venue_order_id: &str) -> Result<(), ExecutionError> {
        let mut orders = self.orders.lock();
        let order = orders.get_mut(venue_order_id).ok_or_else(|| ExecutionError::NotFound {
            venue: self.venue,
            venue_order_id: venue_order_id.to_string(),
        })?;
        if !order.status.is_terminal() {
            order.status = OrderStatus::Canceled;
            order.updated_at = Utc::now();
        }
        Ok(())
    }

    async fn fetch_balance(&self, asset: &str) -> Result<Decimal, ExecutionError> {
        Ok(self.balances.lock().get(asset).copied().unwrap_or(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn market_order_fills_immediately_at_reference_price() {
        let client = MockTradingClient::new(ExchangeId::Binance, dec!(60000));
        let symbol = Symbol::new("BTC", "USDT");
        let order = client.create_market_order(&symbol, Side::Buy, dec!(0.01)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Filled);
        assert_eq!(order.filled_quantity, dec!(0.01));
    }

    #[tokio::test]
    async fn limit_order_stays_open_until_filled() {
        let client = MockTradingClient::new(ExchangeId::Binance, dec!(60000));
        let symbol = Symbol::new("BTC", "USDT");
        let order = client.create_limit_order(&symbol, Side::Buy, dec!(0.01), dec!(59000)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Open);

        client.fill(&order.venue_order_id);
        let refreshed = client.fetch_order(&symbol, &order.venue_order_id).await.unwrap();
        assert_eq!(refreshed.status, OrderStatus::Filled);
    }

    #[tokio::test]
    async fn cancel_is_idempotent_on_a_terminal_order() {
        let client = MockTradingClient::new(ExchangeId::Binance, dec!(60000));
        let symbol = Symbol::new("BTC", "USDT");
        let order = client.create_market_order(&symbol, Side::Buy, dec!(0.01)).await.unwrap();
        client.cancel_order(&symbol, &order.venue_order_id).await.unwrap();
        client.cancel_order(&symbol, &order.venue_order_id).await.unwrap();
        let refreshed = client.fetch_order(&symbol, &order.venue_order_id).await.unwrap();
        assert_eq!(refreshed.status, OrderStatus::Filled);
    }
}
