//! Coinverge CLI. Drives the trading screen logic from a terminal. It computes
//! buy quotes, percentage shortcuts, swap estimates with a confirmation step,
//! and order previews against the built-in asset table, optionally repriced
//! from a JSON file.
//!
//! Usage example (CLI):
//! ```bash
//! coinverge quote --amount 345 --price 0.031 --asset btc
//! coinverge --prices ./prices.json swap --from btc --to eth --amount 1
//! coinverge order sell --asset eth --amount 100 --price 1650
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `info`).
#![warn(missing_docs)]
mod args;
mod commands;

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use crate::args::{Args, Command};
use clap::Parser;
use coinverge_common::AssetBook;
use coinverge_common::CoinvergeError;
use coinverge_common::Result;
use log::{error, info};

fn main() {
    init_logger();
    let args = Args::parse();
    if let Err(e) = run(args) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), CoinvergeError> {
    let book = match &args.prices {
        Some(path) => load_book(path)?,
        None => AssetBook::default(),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Command::Quote { amount, price, asset } => commands::quote(&book, asset, &amount, price.as_deref(), &mut out),
        Command::Percent { percentage, balance } => commands::percent(&book, percentage, balance, &mut out),
        Command::Swap { from, to, amount, yes } => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            commands::swap(&book, from, to, &amount, yes, &mut input, &mut out).map(|_| ())
        }
        Command::Order { side, asset, amount, price } => commands::order(side, asset, &amount, &price, &mut out),
        Command::Assets => commands::assets(&book, &mut out),
    }
}

fn load_book(path: &Path) -> Result<AssetBook, CoinvergeError> {
    let file = File::open(path)?;
    let book = AssetBook::default().load_prices(BufReader::new(file))?;
    info!("Loaded price overrides from {}", path.display());
    Ok(book)
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
