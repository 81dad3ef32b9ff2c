//! Client-side quote calculator used by the buy, sell and swap screens.
//!
//! Every function here is total: free-form text that does not parse, or a
//! non-positive unit price, yields zero instead of an error. Results carry a
//! fixed number of fractional digits so `to_string()` is the display form:
//!
//! - destination quantities and swap estimates: 6 digits,
//! - fiat values: 2 digits,
//! - percentage-of-balance amounts: 0 digits.
use clap::ValueEnum;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

use crate::assets::Asset;

/// Fractional digits of a destination quantity or swap estimate.
pub const QUANTITY_DP: u32 = 6;
/// Fractional digits of a fiat value.
pub const FIAT_DP: u32 = 2;
/// Balance used as the 100% basis when no real balance is known.
pub const DEFAULT_REFERENCE_BALANCE: Decimal = Decimal::from_parts(345, 0, 0, false, 0);

/// Percentage shortcuts offered next to the amount field.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum, Display, EnumString, EnumIter,
)]
pub enum Percentage {
    #[value(name = "25")]
    #[strum(serialize = "25")]
    /// A quarter of the reference balance.
    Quarter,
    #[value(name = "50")]
    #[strum(serialize = "50")]
    /// Half of the reference balance.
    Half,
    #[value(name = "75")]
    #[strum(serialize = "75")]
    /// Three quarters of the reference balance.
    ThreeQuarters,
    #[value(name = "100")]
    #[strum(serialize = "100")]
    /// The whole reference balance.
    Full,
}

impl Percentage {
    /// Numeric percentage, e.g. `25` for `Quarter`.
    pub fn value(self) -> u32 {
        match self {
            Percentage::Quarter => 25,
            Percentage::Half => 50,
            Percentage::ThreeQuarters => 75,
            Percentage::Full => 100,
        }
    }
}

/// Leniently parse decimal text the way an amount field is read.
///
/// Leading whitespace is skipped and the longest numeric prefix
/// (`[+-]digits[.digits][e[+-]digits]`) is used, so `"12abc"` reads as 12 and
/// `".5"` as 0.5. Empty, non-numeric or out-of-range text reads as 0.
pub fn parse_amount(text: &str) -> Decimal {
    let bytes = text.trim_start().as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_digits = &bytes[int_start..pos];

    let mut frac_digits: &[u8] = &[];
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_digits = &bytes[frac_start..frac_end];
        pos = frac_end;
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return Decimal::ZERO;
    }

    let exponent = parse_exponent(&bytes[pos..]);

    let mut mantissa = String::with_capacity(int_digits.len() + frac_digits.len() + 3);
    if negative {
        mantissa.push('-');
    }
    if int_digits.is_empty() {
        mantissa.push('0');
    } else {
        mantissa.push_str(&String::from_utf8_lossy(int_digits));
    }
    if !frac_digits.is_empty() {
        mantissa.push('.');
        mantissa.push_str(&String::from_utf8_lossy(frac_digits));
    }

    mantissa
        .parse::<Decimal>()
        .ok()
        .and_then(|m| apply_exponent(m, exponent.unwrap_or(0)))
        .unwrap_or(Decimal::ZERO)
}

/// Scale `mantissa` by `10^exp`; `None` on overflow.
fn apply_exponent(mantissa: Decimal, exp: i64) -> Option<Decimal> {
    if mantissa.is_zero() || exp == 0 {
        return Some(mantissa);
    }
    if exp.unsigned_abs() > 64 {
        return if exp > 0 { None } else { Some(Decimal::ZERO) };
    }
    (0..exp.unsigned_abs()).try_fold(mantissa, |v, _| {
        if exp > 0 {
            v.checked_mul(Decimal::TEN)
        } else {
            v.checked_div(Decimal::TEN)
        }
    })
}

/// Exponent suffix (`e3`, `E-2`) at the start of `rest`, if well-formed.
fn parse_exponent(rest: &[u8]) -> Option<i64> {
    let (first, tail) = rest.split_first()?;
    if !matches!(first, b'e' | b'E') {
        return None;
    }
    let (negative, digits) = match tail.first() {
        Some(b'-') => (true, &tail[1..]),
        Some(b'+') => (false, &tail[1..]),
        _ => (false, tail),
    };
    let len = digits.iter().take_while(|b| b.is_ascii_digit()).count();
    if len == 0 {
        return None;
    }
    // Anything this long is out of range for a Decimal anyway.
    let value: i64 = std::str::from_utf8(&digits[..len.min(9)]).ok()?.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Round half away from zero to exactly `dp` fractional digits.
///
/// The result keeps trailing zeros (`5` becomes `5.00` for `dp = 2`) and never
/// carries a negative sign on zero.
pub fn round_fixed(value: Decimal, dp: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(dp);
    if rounded.is_zero() {
        rounded.set_sign_positive(true);
    }
    rounded
}

fn zero(dp: u32) -> Decimal {
    round_fixed(Decimal::ZERO, dp)
}

/// Quantity of the asset bought with `fiat_amount` at `unit_price`.
///
/// Returns `fiat_amount / unit_price` to 6 digits when the price is positive,
/// `0.000000` otherwise.
pub fn compute_destination_quantity(fiat_amount: &str, unit_price: &str) -> Decimal {
    let amount = parse_amount(fiat_amount);
    let price = parse_amount(unit_price);
    if price <= Decimal::ZERO {
        return zero(QUANTITY_DP);
    }
    amount
        .checked_div(price)
        .map(|q| round_fixed(q, QUANTITY_DP))
        .unwrap_or_else(|| zero(QUANTITY_DP))
}

/// Fiat amount to 2 digits, `0.00` when unparseable.
pub fn compute_total_fiat_value(fiat_amount: &str) -> Decimal {
    round_fixed(parse_amount(fiat_amount), FIAT_DP)
}

/// `percentage` of `reference_balance`, rounded to a whole number.
pub fn compute_percentage_of_reference_balance(percentage: Percentage, reference_balance: Decimal) -> Decimal {
    reference_balance
        .checked_mul(Decimal::from(percentage.value()))
        .and_then(|v| v.checked_div(Decimal::ONE_HUNDRED))
        .map(|v| round_fixed(v, 0))
        .unwrap_or_else(|| zero(0))
}

/// Destination amount for swapping `source_amount` units at the cross-rate
/// `from_price / to_price`, to 6 digits.
///
/// The amount is not validated here; callers reject non-positive amounts
/// before asking for an estimate. A zero `to_price` yields zero.
pub fn compute_swap_estimate(source_amount: &str, from_price: Decimal, to_price: Decimal) -> Decimal {
    parse_amount(source_amount)
        .checked_mul(from_price)
        .and_then(|v| v.checked_div(to_price))
        .map(|v| round_fixed(v, QUANTITY_DP))
        .unwrap_or_else(|| zero(QUANTITY_DP))
}

/// Live read-out of the swap form's destination field.
///
/// Shows `0.0` until something is typed into the source amount.
pub fn swap_preview(source_amount: &str, from_price: Decimal, to_price: Decimal) -> String {
    if source_amount.is_empty() {
        return String::from("0.0");
    }
    compute_swap_estimate(source_amount, from_price, to_price).to_string()
}

/// Free-form inputs of a single quote.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteInput {
    /// Amount to spend, in USD.
    pub fiat_amount: String,
    /// Price of one unit of the destination asset, in USD.
    pub unit_price: String,
    /// Asset paid with.
    pub source_asset: Option<Asset>,
    /// Asset received.
    pub destination_asset: Asset,
}

/// Derived read-outs of a `QuoteInput`. Recomputed on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quote {
    /// Units of the destination asset received.
    pub destination_quantity: Decimal,
    /// Value of the order in USD.
    pub total_fiat_value: Decimal,
}

impl Quote {
    /// Compute both read-outs for `input`.
    pub fn compute(input: &QuoteInput) -> Self {
        Quote {
            destination_quantity: compute_destination_quantity(&input.fiat_amount, &input.unit_price),
            total_fiat_value: compute_total_fiat_value(&input.fiat_amount),
        }
    }
}
