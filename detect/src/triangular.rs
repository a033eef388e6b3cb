// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Triangular arbitrage detection: a fixed set of three-leg conversion cycles on a
//! single venue, simulated sequentially with depth-walked effective prices.

use crate::opportunity::{Confidence, LegDirection, LegResult, OpportunityId, TriangularOpportunity};
use crate::registry::OpportunityStore;
use arbitron_data::book::registry::{BookRegistry, PriceRegistry};
use arbitron_markets::{ExchangeId, Side, Symbol};
use chrono::{Duration, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// One closed three-leg cycle, e.g. `USDT -> BTC -> ETH -> USDT` expressed as the
/// three pair symbols traded and the direction traded on each.
#[derive(Debug, Clone)]
pub struct TriangularPath {
    pub venue: ExchangeId,
    pub legs: [Symbol; 3],
    pub directions: [LegDirection; 3],
    pub min_amount: Decimal,
}

#[derive(Debug, Clone)]
pub struct TriangularConfig {
    pub taker_fee_rate: Decimal,
    pub max_slippage_per_leg_percent: Decimal,
    pub max_total_slippage_percent: Decimal,
    pub min_profit_percent: Decimal,
    pub min_confidence: f64,
    pub tick_ttl: Duration,
    pub opportunity_ttl: Duration,
}

impl Default for TriangularConfig {
    fn default() -> Self {
        Self {
            taker_fee_rate: dec!(0.0010),
            max_slippage_per_leg_percent: dec!(1.0),
            max_total_slippage_percent: dec!(2.0),
            min_profit_percent: dec!(0.8),
            min_confidence: 60.0,
            tick_ttl: Duration::seconds(2),
            opportunity_ttl: Duration::seconds(30),
        }
    }
}

type PathKey = (ExchangeId, [Symbol; 3], [LegDirection; 3]);

#[derive(Debug)]
pub struct TriangularDetector {
    prices: Arc<PriceRegistry>,
    books: Arc<BookRegistry>,
    paths: Vec<TriangularPath>,
    config: TriangularConfig,
    store: OpportunityStore<PathKey, TriangularOpportunity>,
}

impl TriangularDetector {
    pub fn new(
        prices: Arc<PriceRegistry>,
        books: Arc<BookRegistry>,
        paths: Vec<TriangularPath>,
        config: TriangularConfig,
    ) -> Self {
        Self {
            prices,
            books,
            paths,
            config,
            store: OpportunityStore::new(),
        }
    }

    pub fn opportunities(&self) -> Vec<TriangularOpportunity> {
        self.store.snapshot()
    }

    /// Re-evaluates every configured path touching `symbol`, registering any newly
    /// qualifying opportunity and returning the ones just inserted.
    pub fn on_tick(&self, symbol: &Symbol) -> Vec<TriangularOpportunity> {
        let now = Utc::now();
        let mut inserted = Vec::new();

        for path in self.paths.iter().filter(|p| p.legs.contains(symbol)) {
            if let Some(opportunity) = self.evaluate_path(path, now) {
                let key = opportunity.dedup_key();
                let candidate = opportunity.clone();
                let replaced = self
                    .store
                    .upsert_if_better(key, opportunity, |new, old| new.net_profit() > old.net_profit());
                if replaced {
                    inserted.push(candidate);
                }
            }
        }

        self.store
            .gc(now, self.config.opportunity_ttl, |opp, now, ttl| opp.is_stale(now, ttl));
        inserted
    }

    fn evaluate_path(&self, path: &TriangularPath, now: chrono::DateTime<Utc>) -> Option<TriangularOpportunity> {
        let ticks: Vec<_> = path
            .legs
            .iter()
            .map(|symbol| self.prices.get(path.venue, symbol))
            .collect::<Option<Vec<_>>>()?;
        if ticks.iter().any(|t| t.is_stale(now, self.config.tick_ttl)) {
            return None;
        }

        let mut amount = path.min_amount;
        let mut legs: Vec<LegResult> = Vec::with_capacity(3);
        let mut total_slippage_percent = Decimal::ZERO;

        for (i, symbol) in path.legs.iter().enumerate() {
            let tick = &ticks[i];
            let direction = path.directions[i];
            let book_side_price = match direction {
                LegDirection::Buy => tick.ask,
                LegDirection::Sell => tick.bid,
            };
            // Spec 4.4 step 3's fallback chain: book -> ask/bid -> last * (1 +/- 0.0005).
            let quoted_price = if !book_side_price.is_zero() {
                book_side_price
            } else {
                match direction {
                    LegDirection::Buy => tick.last * (Decimal::ONE + dec!(0.0005)),
                    LegDirection::Sell => tick.last * (Decimal::ONE - dec!(0.0005)),
                }
            };
            if quoted_price.is_zero() {
                return None;
            }

            let target_base = amount / quoted_price;
            let side = match direction {
                LegDirection::Buy => Side::Buy,
                LegDirection::Sell => Side::Sell,
            };
            let (effective_price, had_book) = match self.books.with(path.venue, symbol, |r| r.walk_depth(side, target_base)) {
                Some(Some(walk)) if walk.filled_size >= target_base => (walk.average_price, true),
                _ => (quoted_price, false),
            };

            let slippage_percent = ((effective_price - quoted_price) / quoted_price * Decimal::from(100)).abs();
            if slippage_percent > self.config.max_slippage_per_leg_percent {
                return None;
            }
            total_slippage_percent += slippage_percent;

            let (converted, fee) = match direction {
                LegDirection::Buy => {
                    let gross = amount / effective_price;
                    let fee = gross * self.config.taker_fee_rate;
                    (gross - fee, fee)
                }
                LegDirection::Sell => {
                    let gross = amount * effective_price;
                    let fee = gross * self.config.taker_fee_rate;
                    (gross - fee, fee)
                }
            };

            legs.push(LegResult {
                symbol: symbol.clone(),
                direction,
                quoted_price,
                effective_price,
                slippage_percent,
                fee,
                had_book,
            });
            amount = converted;
        }

        if total_slippage_percent > self.config.max_total_slippage_percent {
            return None;
        }

        let start_amount = path.min_amount;
        let end_amount = amount;
        if end_amount <= start_amount {
            return None;
        }
        let profit_percent = (end_amount - start_amount) / start_amount * Decimal::from(100);
        if profit_percent < self.config.min_profit_percent {
            return None;
        }

        let confidence = self.confidence(&ticks, &legs, start_amount, end_amount, total_slippage_percent, now);
        if !confidence.meets(self.config.min_confidence) {
            return None;
        }

        let legs: [LegResult; 3] = legs.try_into().ok()?;
        Some(TriangularOpportunity {
            id: OpportunityId::next(),
            venue: path.venue,
            legs,
            start_amount,
            end_amount,
            confidence,
            created_at: now,
        })
    }

    fn confidence(
        &self,
        ticks: &[arbitron_data::event::PriceTick],
        legs: &[LegResult],
        start_amount: Decimal,
        end_amount: Decimal,
        total_slippage_percent: Decimal,
        now: chrono::DateTime<Utc>,
    ) -> Confidence {
        let avg_tick_age_ms = ticks.iter().map(|t| t.age_ms(now) as f64).sum::<f64>() / ticks.len() as f64;
        let profit_percent = if start_amount.is_zero() {
            0.0
        } else {
            ((end_amount - start_amount) / start_amount * Decimal::from(100))
                .to_f64()
                .unwrap_or(0.0)
        };
        let max_slippage = self.config.max_total_slippage_percent.to_f64().unwrap_or(1.0).max(f64::EPSILON);
        let slippage_ratio = total_slippage_percent.to_f64().unwrap_or(0.0) / max_slippage;

        let mut score = 100.0;
        score -= (avg_tick_age_ms / 100.0).min(20.0);
        score -= slippage_ratio * 30.0;
        score += (profit_percent * 4.0).min(20.0);

        let book_penalty: f64 = legs
            .iter()
            .map(|leg| {
                if !leg.had_book {
                    5.0
                } else {
                    let spread_percent = leg.slippage_percent.to_f64().unwrap_or(0.0).abs();
                    spread_percent.min(10.0)
                }
            })
            .sum::<f64>()
            .min(20.0);
        score -= book_penalty;

        Confidence::new(score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitron_data::event::PriceTick;
    use rust_decimal_macros::dec;

    fn tick(venue: ExchangeId, symbol: Symbol, last: Decimal, bid: Decimal, ask: Decimal) -> PriceTick {
        PriceTick::new(venue, symbol, last, bid, ask, dec!(1_000_000), Utc::now())
    }

    fn happy_path() -> TriangularPath {
        TriangularPath {
            venue: ExchangeId::Binance,
            legs: [
                Symbol::new("BTC", "USDT"),
                Symbol::new("ETH", "BTC"),
                Symbol::new("ETH", "USDT"),
            ],
            directions: [LegDirection::Buy, LegDirection::Buy, LegDirection::Sell],
            min_amount: dec!(100),
        }
    }

    #[test]
    fn rejects_when_legs_do_not_clear_fees() {
        let prices = Arc::new(PriceRegistry::new());
        let books = Arc::new(BookRegistry::new());
        let path = happy_path();

        prices.update(tick(ExchangeId::Binance, path.legs[0].clone(), dec!(60000), dec!(59995), dec!(60005)));
        prices.update(tick(ExchangeId::Binance, path.legs[1].clone(), dec!(0.041), dec!(0.0409), dec!(0.0411)));
        prices.update(tick(ExchangeId::Binance, path.legs[2].clone(), dec!(2460), dec!(2458), dec!(2462)));

        let detector = TriangularDetector::new(prices, books, vec![path.clone()], TriangularConfig::default());
        let found = detector.on_tick(&path.legs[0]);
        assert!(found.is_empty());
    }

    #[test]
    fn skips_path_with_stale_leg() {
        let prices = Arc::new(PriceRegistry::new());
        let books = Arc::new(BookRegistry::new());
        let path = happy_path();

        let stale = PriceTick::new(
            ExchangeId::Binance,
            path.legs[0].clone(),
            dec!(60000),
            dec!(59995),
            dec!(60005),
            dec!(1_000_000),
            Utc::now() - chrono::Duration::seconds(5),
        );
        prices.update(stale);
        prices.update(tick(ExchangeId::Binance, path.legs[1].clone(), dec!(0.041), dec!(0.0409), dec!(0.0411)));
        prices.update(tick(ExchangeId::Binance, path.legs[2].clone(), dec!(2460), dec!(2458), dec!(2462)));

        let detector = TriangularDetector::new(prices, books, vec![path.clone()], TriangularConfig::default());
        let found = detector.on_tick(&path.legs[0]);
        assert!(found.is_empty());
    }
}
