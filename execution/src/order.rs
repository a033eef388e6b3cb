// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Order requests and the normalized order record every [`TradingClient`](crate::client::TradingClient)
//! returns, regardless of venue.

use arbitron_markets::{ExchangeId, Side, Symbol};
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderKind {
    Market,
    Limit,
}

/// What [`TradingClient::create_market_order`](crate::client::TradingClient::create_market_order)
/// or `create_limit_order` is asked to place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Constructor)]
pub struct OrderRequest {
    pub venue: ExchangeId,
    pub symbol: Symbol,
    pub side: Side,
    pub kind: OrderKind,
    pub quantity: Decimal,
    /// Required for [`OrderKind::Limit`], ignored for [`OrderKind::Market`].
    pub price: Option<Decimal>,
}

/// Where an order sits in its lifecycle at the venue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderStatus {
    Open,
    PartiallyFilled,
    Filled,
    Canceled,
    Rejected,
}

impl OrderStatus {
    /// `true` once the venue will not change this order's state again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Filled | OrderStatus::Canceled | OrderStatus::Rejected)
    }
}

/// The normalized view of an order, as reported by the venue at submission, poll, or
/// cancel time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Constructor)]
pub struct ExecutedOrder {
    pub venue: ExchangeId,
    pub symbol: Symbol,
    pub venue_order_id: String,
    pub side: Side,
    pub kind: OrderKind,
    pub requested_quantity: Decimal,
    pub filled_quantity: Decimal,
    pub average_fill_price: Decimal,
    pub fee: Decimal,
    pub status: OrderStatus,
    pub submitted_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ExecutedOrder {
    pub fn cost(&self) -> Decimal {
        self.filled_quantity * self.average_fill_price
    }
}
