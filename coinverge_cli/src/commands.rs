//! Subcommand handlers.
//!
//! Each handler drives the same `TradeState` reducer a screen would and writes
//! the read-outs to `out`, so they can be exercised against in-memory buffers.
use std::io::{BufRead, Write};

use coinverge_common::calculator::{DEFAULT_REFERENCE_BALANCE, Percentage, Quote, QuoteInput};
use coinverge_common::order::{OrderTicket, Side};
use coinverge_common::trade::SwapPhase;
use coinverge_common::{Asset, AssetBook, CoinvergeError, Result, TradeAction, TradeState, reduce};
use log::{debug, info};
use rust_decimal::Decimal;

/// Print the quantity and total value for `amount` USD of `asset`.
pub fn quote<W: Write>(book: &AssetBook, asset: Asset, amount: &str, price: Option<&str>, out: &mut W) -> Result<()> {
    let table_price = book.price(asset).to_string();
    let input = QuoteInput {
        fiat_amount: amount.to_string(),
        unit_price: price.unwrap_or(table_price.as_str()).to_string(),
        source_asset: None,
        destination_asset: asset,
    };
    let quote = Quote::compute(&input);
    debug!("Quote for {:?}: {:?}", input, quote);
    writeln!(out, "You will receive: {} {}", quote.destination_quantity, asset)?;
    writeln!(out, "Total Value: ${} USD", quote.total_fiat_value)?;
    Ok(())
}

/// Print the amount a percentage shortcut fills in.
pub fn percent<W: Write>(
    book: &AssetBook,
    percentage: Percentage,
    balance: Option<Decimal>,
    out: &mut W,
) -> Result<()> {
    let state = TradeState {
        reference_balance: balance.unwrap_or(DEFAULT_REFERENCE_BALANCE),
        ..TradeState::default()
    };
    let state = reduce(&state, book, TradeAction::ApplyPercentage(percentage))?;
    writeln!(out, "{}% of {} = {}", percentage, state.reference_balance, state.amount)?;
    Ok(())
}

/// Run the swap flow, asking on `input` unless `assume_yes`.
pub fn swap<R: BufRead, W: Write>(
    book: &AssetBook,
    from: Asset,
    to: Asset,
    amount: &str,
    assume_yes: bool,
    input: &mut R,
    out: &mut W,
) -> Result<TradeState> {
    let state = [
        TradeAction::OpenSwap,
        TradeAction::SetSwapFrom(from),
        TradeAction::SetSwapTo(to),
        TradeAction::SetSwapAmount(amount.trim().to_string()),
        TradeAction::RequestSwap,
    ]
    .into_iter()
    .try_fold(TradeState::default(), |state, action| reduce(&state, book, action))?;

    let SwapPhase::ConfirmationPending { estimate } = state.swap.phase else {
        return Err(CoinvergeError::InvalidTransition {
            action: String::from("request-swap"),
            phase: state.swap.phase.to_string(),
        });
    };

    let message = format!("Swap {} {} for approximately {} {}", amount.trim(), from, estimate, to);
    let confirmed = assume_yes || confirm(input, out, &message)?;
    if !confirmed {
        info!("Swap cancelled");
        writeln!(out, "Swap cancelled")?;
        return reduce(&state, book, TradeAction::CancelSwap);
    }

    let applied = reduce(&state, book, TradeAction::ConfirmSwap)?;
    writeln!(
        out,
        "Successfully swapped {} {} for {} {}!",
        amount.trim(),
        from,
        estimate,
        to
    )?;
    writeln!(out, "Selected: {} amount={} price={}", applied.selected, applied.amount, applied.price)?;
    Ok(applied)
}

/// Print an order preview.
pub fn order<W: Write>(side: Side, asset: Asset, amount: &str, price: &str, out: &mut W) -> Result<()> {
    let ticket = OrderTicket::preview(side, asset, amount, price);
    writeln!(out, "{}: {}", ticket.title(), ticket)?;
    Ok(())
}

/// Print the asset table.
pub fn assets<W: Write>(book: &AssetBook, out: &mut W) -> Result<()> {
    for info in book.iter() {
        let sign = if info.change.is_sign_negative() { "" } else { "+" };
        writeln!(
            out,
            "{} {:<4} {:<10} ${} ({}{}%)",
            info.icon,
            info.symbol.to_string(),
            info.name,
            info.unit_price,
            sign,
            info.change
        )?;
    }
    Ok(())
}

/// Ask a yes/no question; anything but `y`/`yes` is a no.
fn confirm<R: BufRead, W: Write>(input: &mut R, out: &mut W, message: &str) -> Result<bool> {
    write!(out, "{}. Confirm swap? [y/N] ", message)?;
    out.flush()?;
    let mut answer = String::new();
    input.read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}
