// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Order lifecycle: place, poll, cancel, and wait-for-terminal, delegating the wire
//! work to whichever [`TradingClient`] is registered for the order's venue.

use crate::client::TradingClient;
use crate::error::ExecutionError;
use crate::order::{ExecutedOrder, OrderRequest, OrderKind};
use arbitron_markets::ExchangeId;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

/// Venue → client lookup. Built once at startup from every configured trading
/// client and shared by every [`OrderExecutor`] and the orchestrator.
#[derive(Debug, Default, Clone)]
pub struct ClientRegistry {
    clients: HashMap<ExchangeId, Arc<dyn TradingClient>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, client: Arc<dyn TradingClient>) {
        self.clients.insert(client.venue(), client);
    }

    pub fn get(&self, venue: ExchangeId) -> Result<&Arc<dyn TradingClient>, ExecutionError> {
        self.clients.get(&venue).ok_or(ExecutionError::UnknownVenue(venue))
    }
}

/// The single operation surface the orchestrator drives: place, poll, cancel, and
/// wait-for-terminal. Owns no retry policy of its own — callers compose retries.
#[derive(Debug, Clone)]
pub struct OrderExecutor {
    clients: Arc<ClientRegistry>,
}

impl OrderExecutor {
    pub fn new(clients: Arc<ClientRegistry>) -> Self {
        Self { clients }
    }

    pub async fn place(&self, request: OrderRequest) -> Result<ExecutedOrder, ExecutionError> {
        let client = self.clients.get(request.venue)?;
        match request.kind {
            OrderKind::Market => client.create_market_order(&request.symbol, request.side, request.quantity).await,
            OrderKind::Limit => {
                let price = request.price.ok_or_else(|| ExecutionError::Rejected {
                    venue: request.venue,
                    reason: "limit order requires a price".to_string(),
                })?;
                client
                    .create_limit_order(&request.symbol, request.side, request.quantity, price)
                    .await
            }
        }
    }

    pub async fn poll(&self, order: &ExecutedOrder) -> Result<ExecutedOrder, ExecutionError> {
        let client = self.clients.get(order.venue)?;
        client.fetch_order(&order.symbol, &order.venue_order_id).await
    }

    pub async fn cancel(&self, order: &ExecutedOrder) -> Result<(), ExecutionError> {
        let client = self.clients.get(order.venue)?;
        client.cancel_order(&order.symbol, &order.venue_order_id).await
    }

    /// Polls `order` every `poll_interval` until it reaches a terminal state or
    /// `timeout` elapses. Market orders are expected to terminate on the very first
    /// poll; this loop exists primarily for limit orders and venue latency.
    pub async fn wait_for_terminal(
        &self,
        order: ExecutedOrder,
        timeout: Duration,
        poll_interval: Duration,
    ) -> Result<ExecutedOrder, ExecutionError> {
        if order.status.is_terminal() {
            return Ok(order);
        }

        let deadline = tokio::time::Instant::now() + timeout;
        let mut current = order;
        loop {
            current = self.poll(&current).await?;
            if current.status.is_terminal() {
                return Ok(current);
            }
            if tokio::time::Instant::now() >= deadline {
                return Err(ExecutionError::Timeout {
                    venue: current.venue,
                    venue_order_id: current.venue_order_id,
                    timeout_ms: timeout.as_millis() as u64,
                });
            }
            tokio::time::sleep(poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockTradingClient;
    use arbitron_markets::{Side, Symbol};
    use rust_decimal_macros::dec;

    fn executor_for(venue: ExchangeId, reference_price: Decimal) -> (OrderExecutor, Arc<MockTradingClient>) {
        let client = Arc::new(MockTradingClient::new(venue, reference_price));
        let mut registry = ClientRegistry::new();
        registry.register(client.clone());
        (OrderExecutor::new(Arc::new(registry)), client)
    }

    #[tokio::test]
    async fn market_order_terminates_on_first_poll() {
        let (executor, _client) = executor_for(ExchangeId::Binance, dec!(60000));
        let symbol = Symbol::new("BTC", "USDT");
        let request = OrderRequest::new(ExchangeId::Binance, symbol, Side::Buy, OrderKind::Market, dec!(0.01), None);
        let placed = executor.place(request).await.unwrap();
        let terminal = executor
            .wait_for_terminal(placed, Duration::from_millis(50), Duration::from_millis(5))
            .await
            .unwrap();
        assert!(terminal.status.is_terminal());
    }

    #[tokio::test]
    async fn wait_for_terminal_times_out_on_an_order_left_open() {
        let (executor, _client) = executor_for(ExchangeId::Binance, dec!(60000));
        let symbol = Symbol::new("BTC", "USDT");
        let request = OrderRequest::new(
            ExchangeId::Binance,
            symbol,
            Side::Buy,
            OrderKind::Limit,
            dec!(0.01),
            Some(dec!(59000)),
        );
        let placed = executor.place(request).await.unwrap();
        let result = executor
            .wait_for_terminal(placed, Duration::from_millis(20), Duration::from_millis(5))
            .await;
        assert!(matches!(result, Err(ExecutionError::Timeout { .. })));
    }

    #[tokio::test]
    async fn unknown_venue_is_reported_rather_than_panicking() {
        let registry = ClientRegistry::new();
        let executor = OrderExecutor::new(Arc::new(registry));
        let symbol = Symbol::new("BTC", "USDT");
        let request = OrderRequest::new(ExchangeId::Kraken, symbol, Side::Buy, OrderKind::Market, dec!(0.01), None);
        let result = executor.place(request).await;
        assert!(matches!(result, Err(ExecutionError::UnknownVenue(ExchangeId::Kraken))));
    }
}
