use std::str::FromStr;
use std::sync::Arc;

use coinverge_common::auth::forms::SignUpForm;
use coinverge_common::auth::{AuthConfig, AuthProvider, InMemoryAuthProvider, MemoryStore};
use coinverge_common::calculator::Percentage;
use coinverge_common::order::Side;
use coinverge_common::shell::{Access, AppShell, Route};
use coinverge_common::trade::SwapPhase;
use coinverge_common::{Asset, AssetBook, CoinvergeError, TradeAction, TradeState, reduce};
use rust_decimal::Decimal;

fn apply(state: TradeState, book: &AssetBook, actions: Vec<TradeAction>) -> TradeState {
    actions
        .into_iter()
        .fold(state, |s, a| reduce(&s, book, a).expect("action accepted"))
}

#[test]
fn signed_in_user_swaps_btc_for_eth() {
    let config = AuthConfig::new("https://demo.supabase.co", "anon").unwrap();
    let auth = Arc::new(InMemoryAuthProvider::new(config, Box::new(MemoryStore::new())));
    let mut shell = AppShell::new(Arc::clone(&auth));
    shell.start().unwrap();
    assert_eq!(shell.route().unwrap(), Route::Login);

    let form = SignUpForm {
        email: String::from("trader@example.com"),
        password: String::from("hunter22"),
        confirm_password: String::from("hunter22"),
    };
    auth.sign_up(&form.validate().unwrap()).unwrap();
    assert_eq!(shell.guard(true, true).unwrap(), Access::Granted);

    let prices = r#"{"BTC": "27642.01", "ETH": "1666.36"}"#;
    let book = AssetBook::default().load_prices(prices.as_bytes()).unwrap();

    let state = apply(
        TradeState::default(),
        &book,
        vec![
            TradeAction::ApplyPercentage(Percentage::Full),
            TradeAction::OpenSwap,
            TradeAction::SetSwapAmount(String::from("1")),
        ],
    );
    assert_eq!(state.amount, "345");
    assert_eq!(state.swap_preview(&book), "16.588258");

    let rejected = reduce(
        &apply(state.clone(), &book, vec![TradeAction::SetSwapAmount(String::from("0"))]),
        &book,
        TradeAction::RequestSwap,
    );
    assert!(matches!(rejected, Err(CoinvergeError::InvalidSwapAmount)));

    let pending = reduce(&state, &book, TradeAction::RequestSwap).unwrap();
    assert_eq!(
        pending.swap.phase,
        SwapPhase::ConfirmationPending {
            estimate: Decimal::from_str("16.588258").unwrap()
        }
    );

    let applied = reduce(&pending, &book, TradeAction::ConfirmSwap).unwrap();
    assert_eq!(applied.selected, Asset::ETH);
    assert_eq!(applied.amount, "16.59");
    assert_eq!(applied.price, "1666.36");
    assert_eq!(
        applied.order(Side::Sell).to_string(),
        "Sell 0.009956 ETH for 16.59 USD at 1666.36 USD per ETH"
    );

    shell.provider().sign_out().unwrap();
    assert_eq!(shell.guard(true, false).unwrap(), Access::SignInRequired);
}
