//! Command-line arguments for the Coinverge CLI.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use coinverge_common::calculator::Percentage;
use coinverge_common::order::Side;
use coinverge_common::Asset;
use rust_decimal::Decimal;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// JSON file with unit price overrides, e.g. `{"BTC": "27642.01"}`.
    #[clap(long, global = true)]
    pub prices: Option<PathBuf>,

    /// What to compute.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands, one per trading screen action.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quantity received for a USD amount and the total value of the order.
    Quote {
        /// USD amount to spend.
        #[clap(long)]
        amount: String,
        /// USD unit price; defaults to the asset's table price.
        #[clap(long)]
        price: Option<String>,
        /// Asset to buy.
        #[clap(long, value_enum, ignore_case = true, default_value_t = Asset::BTC)]
        asset: Asset,
    },

    /// Amount filled in by a percentage shortcut.
    Percent {
        /// Share of the reference balance.
        #[clap(long, value_enum)]
        percentage: Percentage,
        /// Reference balance; defaults to 345.
        #[clap(long)]
        balance: Option<Decimal>,
    },

    /// Swap one asset for another at the table cross-rate.
    Swap {
        /// Asset given.
        #[clap(long, value_enum, ignore_case = true)]
        from: Asset,
        /// Asset received.
        #[clap(long, value_enum, ignore_case = true)]
        to: Asset,
        /// Units of `from` to swap.
        #[clap(long)]
        amount: String,
        /// Skip the confirmation prompt.
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Preview a buy or sell order.
    Order {
        /// Buy or sell.
        #[clap(value_enum, ignore_case = true)]
        side: Side,
        /// Asset traded.
        #[clap(long, value_enum, ignore_case = true)]
        asset: Asset,
        /// USD amount.
        #[clap(long)]
        amount: String,
        /// USD unit price.
        #[clap(long)]
        price: String,
    },

    /// List the asset table.
    Assets,
}
