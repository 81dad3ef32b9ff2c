//! Trade form state and its reducer.
//!
//! The trading screen's local state is an immutable `TradeState` record. Each
//! user action is a `TradeAction`, and [`reduce`] maps the current state plus
//! one action to the next state. Nothing here renders or persists anything;
//! a state lives only as long as the screen that owns it.
//!
//! Swap flow:
//!
//! ```text
//! Idle --SetSwapAmount--> AmountEntered --RequestSwap--> ConfirmationPending
//!                               ^                              |       |
//!                               +---------CancelSwap-----------+       |
//! Idle (form closed, new asset selected) <------ConfirmSwap------------+
//! ```
use log::{debug, info};
use rust_decimal::Decimal;
use serde::Serialize;
use strum_macros::{AsRefStr, Display};

use crate::assets::{Asset, AssetBook};
use crate::calculator::{
    self, FIAT_DP, Percentage, Quote, QuoteInput, DEFAULT_REFERENCE_BALANCE, compute_percentage_of_reference_balance,
    compute_swap_estimate, parse_amount, round_fixed,
};
use crate::error::CoinvergeError;
use crate::order::{OrderTicket, Side};
use crate::result::Result;

/// Where the swap form is in its confirm-then-apply flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum SwapPhase {
    /// Nothing typed yet.
    Idle,
    /// A source amount is present.
    AmountEntered,
    /// Waiting for the user to confirm `estimate` units of the destination asset.
    ConfirmationPending {
        /// Destination amount shown in the confirmation dialog.
        estimate: Decimal,
    },
}

/// Two assets being exchanged and their unit prices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SwapPair {
    /// Asset given.
    pub from: Asset,
    /// Asset received.
    pub to: Asset,
    /// USD price of one `from` unit.
    pub from_price: Decimal,
    /// USD price of one `to` unit.
    pub to_price: Decimal,
}

impl SwapPair {
    /// Pair `from -> to` priced from `book`.
    pub fn new(from: Asset, to: Asset, book: &AssetBook) -> Self {
        SwapPair {
            from,
            to,
            from_price: book.price(from),
            to_price: book.price(to),
        }
    }

    /// The same pair in the opposite direction.
    pub fn reversed(self) -> Self {
        SwapPair {
            from: self.to,
            to: self.from,
            from_price: self.to_price,
            to_price: self.from_price,
        }
    }

    /// Units of `to` received for `source_amount` units of `from`.
    pub fn estimate(&self, source_amount: &str) -> Decimal {
        compute_swap_estimate(source_amount, self.from_price, self.to_price)
    }
}

/// Swap form embedded in the trading screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SwapForm {
    /// Whether the form is shown.
    pub open: bool,
    /// Asset given.
    pub from: Asset,
    /// Asset received.
    pub to: Asset,
    /// Source amount as typed.
    pub amount: String,
    /// Flow position.
    pub phase: SwapPhase,
}

impl Default for SwapForm {
    fn default() -> Self {
        SwapForm {
            open: false,
            from: Asset::BTC,
            to: Asset::ETH,
            amount: String::new(),
            phase: SwapPhase::Idle,
        }
    }
}

impl SwapForm {
    /// Current pair priced from `book`.
    pub fn pair(&self, book: &AssetBook) -> SwapPair {
        SwapPair::new(self.from, self.to, book)
    }

    fn typed_phase(&self) -> SwapPhase {
        if self.amount.is_empty() {
            SwapPhase::Idle
        } else {
            SwapPhase::AmountEntered
        }
    }

    fn is_pending(&self) -> bool {
        matches!(self.phase, SwapPhase::ConfirmationPending { .. })
    }
}

/// State of the trading screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TradeState {
    /// Asset the amount and price fields refer to.
    pub selected: Asset,
    /// USD amount as typed.
    pub amount: String,
    /// USD unit price as typed.
    pub price: String,
    /// 100% basis of the percentage shortcuts.
    pub reference_balance: Decimal,
    /// Embedded swap form.
    pub swap: SwapForm,
}

impl Default for TradeState {
    fn default() -> Self {
        TradeState {
            selected: Asset::BTC,
            amount: String::from("345"),
            price: String::from("0.031"),
            reference_balance: DEFAULT_REFERENCE_BALANCE,
            swap: SwapForm::default(),
        }
    }
}

impl TradeState {
    /// Live calculator read-outs for the amount and price fields.
    pub fn quote(&self) -> Quote {
        Quote::compute(&QuoteInput {
            fiat_amount: self.amount.clone(),
            unit_price: self.price.clone(),
            source_asset: None,
            destination_asset: self.selected,
        })
    }

    /// Live destination read-out of the swap form.
    pub fn swap_preview(&self, book: &AssetBook) -> String {
        let pair = self.swap.pair(book);
        calculator::swap_preview(&self.swap.amount, pair.from_price, pair.to_price)
    }

    /// Preview of a buy or sell at the current fields.
    pub fn order(&self, side: Side) -> OrderTicket {
        OrderTicket::preview(side, self.selected, &self.amount, &self.price)
    }
}

/// One user action on the trading screen.
#[derive(Debug, Clone, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "kebab-case")]
pub enum TradeAction {
    /// Pick the asset shown by the amount and price fields.
    SelectAsset(Asset),
    /// Edit the USD amount.
    SetAmount(String),
    /// Edit the USD unit price.
    SetPrice(String),
    /// Fill the amount with a share of the reference balance.
    ApplyPercentage(Percentage),
    /// Show the swap form.
    OpenSwap,
    /// Hide the swap form, dropping a pending confirmation.
    CloseSwap,
    /// Change the asset given.
    SetSwapFrom(Asset),
    /// Change the asset received.
    SetSwapTo(Asset),
    /// Edit the swap source amount.
    SetSwapAmount(String),
    /// Exchange from and to, clearing the amount.
    ReverseSwap,
    /// Ask for confirmation of the current swap.
    RequestSwap,
    /// Apply the pending swap.
    ConfirmSwap,
    /// Dismiss the pending swap.
    CancelSwap,
}

fn invalid(action: &TradeAction, phase: SwapPhase) -> CoinvergeError {
    CoinvergeError::InvalidTransition {
        action: action.as_ref().to_string(),
        phase: phase.to_string(),
    }
}

/// Compute the state that follows `state` after `action`.
///
/// `book` supplies unit prices for swaps. Rejected actions return an error and
/// leave `state` untouched: a swap request with an empty, unparseable or
/// non-positive amount gives [`CoinvergeError::InvalidSwapAmount`]; an action
/// that does not fit the swap phase gives
/// [`CoinvergeError::InvalidTransition`].
pub fn reduce(state: &TradeState, book: &AssetBook, action: TradeAction) -> Result<TradeState> {
    let mut next = state.clone();
    debug!("Trade action {:?} in phase {}", action, state.swap.phase);

    match action {
        TradeAction::SelectAsset(asset) => next.selected = asset,
        TradeAction::SetAmount(amount) => next.amount = amount,
        TradeAction::SetPrice(price) => next.price = price,
        TradeAction::ApplyPercentage(percentage) => {
            next.amount = compute_percentage_of_reference_balance(percentage, state.reference_balance).to_string();
        }
        TradeAction::OpenSwap => next.swap.open = true,
        TradeAction::CloseSwap => {
            next.swap.open = false;
            next.swap.phase = next.swap.typed_phase();
        }
        ref action @ (TradeAction::SetSwapFrom(_)
        | TradeAction::SetSwapTo(_)
        | TradeAction::SetSwapAmount(_)
        | TradeAction::ReverseSwap) => {
            if state.swap.is_pending() {
                return Err(invalid(action, state.swap.phase));
            }
            match action {
                TradeAction::SetSwapFrom(asset) => next.swap.from = *asset,
                TradeAction::SetSwapTo(asset) => next.swap.to = *asset,
                TradeAction::SetSwapAmount(amount) => next.swap.amount = amount.clone(),
                _ => {
                    std::mem::swap(&mut next.swap.from, &mut next.swap.to);
                    next.swap.amount.clear();
                }
            }
            next.swap.phase = next.swap.typed_phase();
        }
        TradeAction::RequestSwap => {
            if !state.swap.open || state.swap.is_pending() {
                return Err(invalid(&TradeAction::RequestSwap, state.swap.phase));
            }
            if state.swap.amount.trim().is_empty() || parse_amount(&state.swap.amount) <= Decimal::ZERO {
                return Err(CoinvergeError::InvalidSwapAmount);
            }
            let estimate = state.swap.pair(book).estimate(&state.swap.amount);
            next.swap.phase = SwapPhase::ConfirmationPending { estimate };
        }
        TradeAction::ConfirmSwap => {
            let SwapPhase::ConfirmationPending { estimate } = state.swap.phase else {
                return Err(invalid(&TradeAction::ConfirmSwap, state.swap.phase));
            };
            let to = state.swap.to;
            next.selected = to;
            next.amount = round_fixed(estimate, FIAT_DP).to_string();
            next.price = book.price(to).to_string();
            next.swap = SwapForm {
                open: false,
                amount: String::new(),
                phase: SwapPhase::Idle,
                ..state.swap.clone()
            };
            info!(
                "Swapped {} {} for {} {}",
                state.swap.amount, state.swap.from, estimate, to
            );
        }
        TradeAction::CancelSwap => {
            if !state.swap.is_pending() {
                return Err(invalid(&TradeAction::CancelSwap, state.swap.phase));
            }
            next.swap.phase = SwapPhase::AmountEntered;
        }
    }

    Ok(next)
}
