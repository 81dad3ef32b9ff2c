//! Buy/sell order previews shown by the trading screen.
//!
//! No order is ever executed: a ticket only captures what the confirmation
//! dialog would display for the current amount and price fields.
use std::fmt;

use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::assets::Asset;
use crate::calculator::compute_destination_quantity;

/// Direction of an order.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum, Display, EnumString)]
#[clap(rename_all = "lower")]
#[strum(ascii_case_insensitive)]
pub enum Side {
    Buy,
    Sell,
}

/// Preview of a buy or sell order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderTicket {
    /// Buy or sell.
    pub side: Side,
    /// Asset traded.
    pub asset: Asset,
    /// Units of `asset`, to 6 digits.
    pub quantity: Decimal,
    /// USD amount as typed.
    pub amount: String,
    /// USD unit price as typed.
    pub price: String,
}

impl OrderTicket {
    /// Build the preview for spending/receiving `amount` USD at `price` USD per unit.
    pub fn preview(side: Side, asset: Asset, amount: &str, price: &str) -> Self {
        OrderTicket {
            side,
            asset,
            quantity: compute_destination_quantity(amount, price),
            amount: amount.trim().to_string(),
            price: price.trim().to_string(),
        }
    }

    /// Dialog title, e.g. `Buy Order`.
    pub fn title(&self) -> String {
        format!("{} Order", self.side)
    }
}

impl fmt::Display for OrderTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} for {} USD at {} USD per {}",
            self.side, self.quantity, self.asset, self.amount, self.price, self.asset
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buy_preview_message() {
        let ticket = OrderTicket::preview(Side::Buy, Asset::BTC, "345", "0.031");
        assert_eq!(ticket.title(), "Buy Order");
        assert_eq!(
            ticket.to_string(),
            "Buy 11129.032258 BTC for 345 USD at 0.031 USD per BTC"
        );
    }

    #[test]
    fn sell_preview_with_bad_price_quotes_zero() {
        let ticket = OrderTicket::preview(Side::Sell, Asset::ETH, "100", "");
        assert_eq!(ticket.title(), "Sell Order");
        assert_eq!(ticket.quantity.to_string(), "0.000000");
        assert_eq!(ticket.to_string(), "Sell 0.000000 ETH for 100 USD at  USD per ETH");
    }

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("SELL".parse::<Side>().unwrap(), Side::Sell);
    }
}
