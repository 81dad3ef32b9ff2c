//! Asset symbols and the mock asset table shared by the trade screens.

use std::collections::BTreeMap;
use std::io::Read;

use clap::ValueEnum;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::error::CoinvergeError;
use crate::result::Result;

/// Set of supported asset symbols.
#[allow(missing_docs)]
#[derive(
    Debug,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    ValueEnum,
    Display,
    EnumString,
    EnumIter,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Asset {
    BTC,
    ETH,
    LTC,
    XRP,
    SOL,
}

impl Asset {
    /// Resolve a user-supplied symbol, rejecting anything outside the closed set.
    pub fn from_symbol(symbol: &str) -> Result<Self> {
        symbol
            .trim()
            .parse::<Self>()
            .map_err(|_| CoinvergeError::UnknownAsset(symbol.trim().to_string()))
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Display metadata and unit price of a single asset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssetInfo {
    /// Symbol this entry describes.
    pub symbol: Asset,
    /// Human-readable name (e.g., `Bitcoin`).
    pub name: &'static str,
    /// Unit price in USD.
    pub unit_price: Decimal,
    /// 24h change in percent.
    pub change: Decimal,
    /// Accent color used when rendering the asset.
    pub display_color: &'static str,
    /// Single glyph shown next to the symbol.
    pub icon: &'static str,
}

impl AssetInfo {
    fn default_for(symbol: Asset) -> Self {
        let (name, unit_price, change, display_color, icon) = match symbol {
            Asset::BTC => ("Bitcoin", Decimal::new(26927, 0), Decimal::new(245, 2), "#f7931a", "\u{20bf}"),
            Asset::ETH => ("Ethereum", Decimal::new(1650, 0), Decimal::new(-123, 2), "#627eea", "\u{39e}"),
            Asset::LTC => ("Litecoin", Decimal::new(725, 1), Decimal::new(89, 2), "#bfbbbb", "\u{141}"),
            Asset::XRP => ("Ripple", Decimal::new(52, 2), Decimal::new(-45, 2), "#23292f", "X"),
            Asset::SOL => ("Solana", Decimal::new(985, 1), Decimal::new(312, 2), "#14f195", "\u{25ce}"),
        };
        AssetInfo {
            symbol,
            name,
            unit_price,
            change,
            display_color,
            icon,
        }
    }
}

/// Mapping from every supported `Asset` to its `AssetInfo`.
///
/// The book always holds an entry per asset, so lookups cannot miss. Prices can
/// be overridden one by one or from a JSON document of `{"BTC": "27642.01"}`
/// pairs.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetBook {
    entries: Vec<AssetInfo>,
}

impl Default for AssetBook {
    fn default() -> Self {
        Self {
            entries: Asset::iter().map(AssetInfo::default_for).collect(),
        }
    }
}

impl AssetBook {
    /// Metadata for `asset`.
    pub fn info(&self, asset: Asset) -> &AssetInfo {
        &self.entries[asset.index()]
    }

    /// Unit price for `asset`.
    pub fn price(&self, asset: Asset) -> Decimal {
        self.info(asset).unit_price
    }

    /// All entries in symbol order.
    pub fn iter(&self) -> impl Iterator<Item = &AssetInfo> {
        self.entries.iter()
    }

    /// Returns the book with `asset` priced at `unit_price`.
    pub fn with_price(mut self, asset: Asset, unit_price: Decimal) -> Self {
        self.entries[asset.index()].unit_price = unit_price;
        self
    }

    /// Applies price overrides read as JSON from `reader`.
    ///
    /// Keys are asset symbols (case-insensitive), values decimal strings. An
    /// unknown symbol fails the whole load.
    pub fn load_prices<R: Read>(self, reader: R) -> Result<Self> {
        let overrides: BTreeMap<String, Decimal> = serde_json::from_reader(reader)?;
        overrides.into_iter().try_fold(self, |book, (symbol, price)| {
            let asset = Asset::from_symbol(&symbol)?;
            debug!("Price override: {} = {}", asset, price);
            Ok(book.with_price(asset, price))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_symbols_case_insensitively() {
        assert_eq!(Asset::from_symbol("btc").unwrap(), Asset::BTC);
        assert_eq!(Asset::from_symbol(" Eth ").unwrap(), Asset::ETH);
    }

    #[test]
    fn rejects_unknown_symbols() {
        match Asset::from_symbol("DOGE") {
            Err(CoinvergeError::UnknownAsset(s)) => assert_eq!(s, "DOGE"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn default_book_matches_token_table() {
        let book = AssetBook::default();
        assert_eq!(book.iter().count(), 5);
        assert_eq!(book.price(Asset::BTC).to_string(), "26927");
        assert_eq!(book.price(Asset::LTC).to_string(), "72.5");
        assert_eq!(book.price(Asset::XRP).to_string(), "0.52");
        assert_eq!(book.info(Asset::SOL).name, "Solana");
        assert_eq!(book.info(Asset::ETH).symbol, Asset::ETH);
    }

    #[test]
    fn loads_price_overrides_from_json() {
        let json = r#"{"btc": "27642.01", "ETH": "1666.36"}"#;
        let book = AssetBook::default().load_prices(json.as_bytes()).unwrap();
        assert_eq!(book.price(Asset::BTC).to_string(), "27642.01");
        assert_eq!(book.price(Asset::ETH).to_string(), "1666.36");
        assert_eq!(book.price(Asset::SOL).to_string(), "98.5");
    }

    #[test]
    fn price_file_with_unknown_symbol_fails() {
        let json = r#"{"PEPE": "0.0000089"}"#;
        assert!(matches!(
            AssetBook::default().load_prices(json.as_bytes()),
            Err(CoinvergeError::UnknownAsset(_))
        ));
    }
}
