// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Canonical symbol representation and the per-venue translation contract.
//!
//! Every venue casing and separator convention (`BTCUSDT`, `BTC-USD`, `XBT/USD`, ...)
//! is translated to and from this single canonical form at the adapter boundary, so
//! every other component only ever sees `BASE/QUOTE`.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Canonical `BASE/QUOTE` symbol, e.g. `BTC/USDT`.
///
/// Always uppercase; the base and quote asset are stored separately so components
/// don't need to re-split a formatted string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Symbol {
    pub base: String,
    pub quote: String,
}

impl Symbol {
    pub fn new(base: impl Into<String>, quote: impl Into<String>) -> Self {
        Self {
            base: base.into().to_uppercase(),
            quote: quote.into().to_uppercase(),
        }
    }

    /// Parses a canonical `BASE/QUOTE` string.
    pub fn parse_canonical(s: &str) -> Option<Self> {
        let (base, quote) = s.split_once('/')?;
        if base.is_empty() || quote.is_empty() {
            return None;
        }
        Some(Self::new(base, quote))
    }
}

impl Display for Symbol {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.base, self.quote)
    }
}

/// Translates between a venue's wire symbol format and the canonical [`Symbol`].
///
/// Each `ExchangeAdapter` owns one implementation, keyed to how that venue spells
/// and separates its trading pairs on the wire (e.g. Binance: `BTCUSDT`, Kraken:
/// `XBT/USD`, Coinbase: `BTC-USD`).
pub trait SymbolTranslator {
    /// Converts a canonical [`Symbol`] to this venue's wire format.
    fn to_venue(&self, symbol: &Symbol) -> String;

    /// Parses this venue's wire format into a canonical [`Symbol`].
    fn from_venue(&self, raw: &str) -> Option<Symbol>;
}

/// Translator for venues that concatenate base and quote with no separator
/// and uppercase everything (Binance, Bybit, Okx-perp style symbols).
///
/// Splitting an unseparated symbol is ambiguous without knowing the venue's
/// quote-asset universe (`BTCUSDT` could otherwise split as `BTCUSD` + `T`),
/// so each instance carries the quote assets to try, longest-first.
#[derive(Debug, Clone, Default)]
pub struct ConcatenatedTranslator {
    pub quote_assets: Vec<String>,
}

impl ConcatenatedTranslator {
    pub fn new(quote_assets: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            quote_assets: quote_assets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn split(raw: &str, quote_assets: &[String]) -> Option<(String, String)> {
        let upper = raw.to_uppercase();
        let mut candidates: Vec<&String> = quote_assets.iter().collect();
        candidates.sort_by_key(|q| std::cmp::Reverse(q.len()));
        for quote in candidates {
            if let Some(base) = upper.strip_suffix(quote.as_str()) {
                if !base.is_empty() {
                    return Some((base.to_string(), quote.clone()));
                }
            }
        }
        None
    }
}

impl SymbolTranslator for ConcatenatedTranslator {
    fn to_venue(&self, symbol: &Symbol) -> String {
        format!("{}{}", symbol.base, symbol.quote)
    }

    fn from_venue(&self, raw: &str) -> Option<Symbol> {
        let (base, quote) = Self::split(raw, &self.quote_assets)?;
        Some(Symbol::new(base, quote))
    }
}

/// Translator for venues that separate base/quote with a hyphen (Coinbase: `BTC-USD`).
#[derive(Debug, Clone, Copy, Default)]
pub struct HyphenSeparatedTranslator;

impl SymbolTranslator for HyphenSeparatedTranslator {
    fn to_venue(&self, symbol: &Symbol) -> String {
        format!("{}-{}", symbol.base, symbol.quote)
    }

    fn from_venue(&self, raw: &str) -> Option<Symbol> {
        let (base, quote) = raw.split_once('-')?;
        Some(Symbol::new(base, quote))
    }
}

/// Translator for venues that separate base/quote with a slash (Kraken: `XBT/USD`),
/// with an optional asset-code remap (Kraken spells Bitcoin `XBT`).
#[derive(Debug, Clone, Default)]
pub struct SlashSeparatedTranslator {
    pub remap_to_venue: Vec<(String, String)>,
}

impl SlashSeparatedTranslator {
    pub fn with_remap(pairs: impl IntoIterator<Item = (&'static str, &'static str)>) -> Self {
        Self {
            remap_to_venue: pairs
                .into_iter()
                .map(|(a, b)| (a.to_string(), b.to_string()))
                .collect(),
        }
    }

    fn remap(&self, asset: &str, to_venue: bool) -> String {
        for (canonical, venue) in &self.remap_to_venue {
            let (from, to) = if to_venue {
                (canonical, venue)
            } else {
                (venue, canonical)
            };
            if asset.eq_ignore_ascii_case(from) {
                return to.clone();
            }
        }
        asset.to_string()
    }
}

impl SymbolTranslator for SlashSeparatedTranslator {
    fn to_venue(&self, symbol: &Symbol) -> String {
        format!(
            "{}/{}",
            self.remap(&symbol.base, true),
            self.remap(&symbol.quote, true)
        )
    }

    fn from_venue(&self, raw: &str) -> Option<Symbol> {
        let (base, quote) = raw.split_once('/')?;
        Some(Symbol::new(self.remap(base, false), self.remap(quote, false)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_parse_and_display_round_trip() {
        let symbol = Symbol::parse_canonical("btc/usdt").unwrap();
        assert_eq!(symbol.base, "BTC");
        assert_eq!(symbol.quote, "USDT");
        assert_eq!(symbol.to_string(), "BTC/USDT");
    }

    #[test]
    fn concatenated_split_prefers_longest_quote() {
        let (base, quote) =
            ConcatenatedTranslator::split("BTCUSDT", &["USDT".to_string(), "USD".to_string(), "BTC".to_string()]).unwrap();
        assert_eq!(base, "BTC");
        assert_eq!(quote, "USDT");
    }

    #[test]
    fn concatenated_translator_round_trips() {
        let t = ConcatenatedTranslator::new(["USDT", "USD", "BTC"]);
        let symbol = Symbol::new("BTC", "USDT");
        assert_eq!(t.to_venue(&symbol), "BTCUSDT");
        assert_eq!(t.from_venue("BTCUSDT").unwrap(), symbol);
    }

    #[test]
    fn hyphen_translator_round_trips() {
        let t = HyphenSeparatedTranslator;
        let symbol = Symbol::new("BTC", "USD");
        assert_eq!(t.to_venue(&symbol), "BTC-USD");
        assert_eq!(t.from_venue("BTC-USD").unwrap(), symbol);
    }

    #[test]
    fn slash_translator_remaps_kraken_asset_codes() {
        let t = SlashSeparatedTranslator::with_remap([("BTC", "XBT")]);
        let symbol = Symbol::new("BTC", "USD");
        assert_eq!(t.to_venue(&symbol), "XBT/USD");
        assert_eq!(t.from_venue("XBT/USD").unwrap(), symbol);
    }
}
