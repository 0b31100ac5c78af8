//! Solvency invariant tests.
//!
//! Liquidation, shortfall, socialization, and collateral conservation:
//! the paths that keep the market solvent (or make insolvency explicit).

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use settle_core::*;

fn test_params() -> MarketParams {
    MarketParams {
        curve: UtilizationCurve {
            min_rate: Fixed18::ZERO,
            target_rate: Fixed18::new(dec!(0.10)),
            max_rate: Fixed18::new(dec!(1.00)),
            target_utilization: UFixed6::new_unchecked(dec!(0.50)),
        },
        maintenance: UFixed6::new_unchecked(dec!(0.20)),
        funding_fee: UFixed6::new_unchecked(dec!(0.10)),
        liquidation_fee: UFixed6::new_unchecked(dec!(0.05)),
        ..MarketParams::default()
    }
}

fn new_engine(price: Decimal) -> Engine<FeedOracle, MemoryLedger> {
    let oracle = FeedOracle::new(Fixed6::new(price), Timestamp::from_seconds(0));
    let mut ledger = MemoryLedger::new();
    for id in 1..=8 {
        ledger.mint(AccountId(id), UFixed6::new_unchecked(dec!(1_000_000)));
    }
    Engine::new(
        EngineConfig::default(),
        test_params(),
        ProtocolParams::default(),
        oracle,
        ledger,
    )
}

fn size(v: Decimal) -> UFixed6 {
    UFixed6::new_unchecked(v)
}

fn collateral(v: Decimal) -> Fixed6 {
    Fixed6::new(v)
}

// maker backs the book; trader longs 10 units @ $100 on 300 collateral
fn maker_and_thin_long(engine: &mut Engine<FeedOracle, MemoryLedger>) -> (AccountId, AccountId) {
    let maker = AccountId(1);
    let trader = AccountId(2);
    engine
        .update(maker, size(dec!(20)), size(dec!(0)), size(dec!(0)), collateral(dec!(20000)))
        .unwrap();
    engine
        .update(trader, size(dec!(0)), size(dec!(10)), size(dec!(0)), collateral(dec!(300)))
        .unwrap();
    (maker, trader)
}

#[test]
fn maintenance_breach_flags_but_settlement_completes() {
    let mut engine = new_engine(dec!(100));
    let (_, trader) = maker_and_thin_long(&mut engine);

    // zero elapsed: pure pnl, exact numbers. -$20 x 10 units = -200
    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(80)), Timestamp::from_seconds(0));
    let result = engine.settle_account(trader).unwrap();

    assert!(result.liquidating);
    let acct = engine.account(trader).unwrap();
    assert!(acct.liquidation);
    // the account still settled fully
    assert_eq!(acct.latest_version, Version(2));
    assert_eq!(acct.collateral.value(), dec!(100));
}

#[test]
fn update_blocked_while_liquidating() {
    let mut engine = new_engine(dec!(100));
    let (_, trader) = maker_and_thin_long(&mut engine);

    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(80)), Timestamp::from_seconds(0));
    engine.settle_account(trader).unwrap();

    let err = engine
        .update(trader, size(dec!(0)), size(dec!(5)), size(dec!(0)), collateral(dec!(0)))
        .unwrap_err();
    assert!(matches!(err, EngineError::InLiquidation(_)));
}

#[test]
fn liquidation_pays_caller_and_zeroes_position() {
    let mut engine = new_engine(dec!(100));
    let (_, trader) = maker_and_thin_long(&mut engine);
    let keeper = AccountId(3);

    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(80)), Timestamp::from_seconds(0));
    engine.settle_account(trader).unwrap();

    let keeper_before = engine.ledger().balance_of(keeper);
    let result = engine.liquidate(trader, keeper).unwrap();

    // 5% of 10 x $80 notional
    assert_eq!(result.fee.value(), dec!(40));
    assert_eq!(result.shortfall, UFixed6::ZERO);
    assert_eq!(
        engine.ledger().balance_of(keeper).value(),
        keeper_before.value() + dec!(40)
    );

    let acct = engine.account(trader).unwrap();
    assert_eq!(acct.collateral.value(), dec!(60));
    assert!(acct.liquidation);
    assert!(acct.target_position().is_empty());
    // the market-wide book no longer carries the exposure
    assert_eq!(engine.market().target_position().long, UFixed6::ZERO);

    // once the close folds, the flag clears and the account is usable again
    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(80)), Timestamp::from_seconds(0));
    engine.settle_account(trader).unwrap();
    assert!(!engine.account(trader).unwrap().liquidation);
    engine
        .update(trader, size(dec!(0)), size(dec!(1)), size(dec!(0)), collateral(dec!(100)))
        .unwrap();
}

#[test]
fn solvent_accounts_cannot_be_liquidated() {
    let mut engine = new_engine(dec!(100));
    let (maker, _) = maker_and_thin_long(&mut engine);

    let err = engine.liquidate(maker, AccountId(3)).unwrap_err();
    assert!(matches!(err, EngineError::NotLiquidatable(_)));

    // an empty account is not liquidatable either
    engine
        .update(AccountId(4), size(dec!(0)), size(dec!(0)), size(dec!(0)), collateral(dec!(500)))
        .unwrap();
    let err = engine.liquidate(AccountId(4), AccountId(3)).unwrap_err();
    assert!(matches!(err, EngineError::NotLiquidatable(_)));
}

#[test]
fn shortfall_is_explicit_not_clamped() {
    let mut engine = new_engine(dec!(100));
    let (_, trader) = maker_and_thin_long(&mut engine);
    let keeper = AccountId(3);

    // -$40 x 10 = -400 against 300 collateral
    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(60)), Timestamp::from_seconds(0));
    engine.settle_account(trader).unwrap();
    assert_eq!(engine.account(trader).unwrap().collateral.value(), dec!(-100));

    let result = engine.liquidate(trader, keeper).unwrap();
    // nothing left to pay the keeper with
    assert_eq!(result.fee, UFixed6::ZERO);
    assert_eq!(result.shortfall.value(), dec!(100));

    // the bad debt stays on the books through later settlements
    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(90)), Timestamp::from_seconds(0));
    engine.settle_account(trader).unwrap();
    let acct = engine.account(trader).unwrap();
    assert_eq!(acct.collateral.value(), dec!(-100));
    assert_eq!(acct.shortfall().value(), dec!(100));
    assert!(acct.position.is_empty());
}

#[test]
fn liquidation_event_records_the_close() {
    let mut engine = new_engine(dec!(100));
    let (_, trader) = maker_and_thin_long(&mut engine);
    let keeper = AccountId(3);

    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(60)), Timestamp::from_seconds(0));
    engine.settle_account(trader).unwrap();
    engine.liquidate(trader, keeper).unwrap();

    match &engine.events().last().unwrap().payload {
        EventPayload::Liquidation(event) => {
            assert_eq!(event.account, trader);
            assert_eq!(event.liquidator, keeper);
            assert_eq!(event.shortfall.value(), dec!(100));
        }
        other => panic!("expected Liquidation event, got {other:?}"),
    }
}

#[test]
fn socialization_freezes_accrual_once_makers_are_gone() {
    let mut engine = new_engine(dec!(100));
    let maker = AccountId(1);
    let long = AccountId(2);
    let keeper = AccountId(3);

    // thin maker: 10 units on 210 collateral
    engine
        .update(maker, size(dec!(10)), size(dec!(0)), size(dec!(0)), collateral(dec!(210)))
        .unwrap();
    engine
        .update(long, size(dec!(0)), size(dec!(8)), size(dec!(0)), collateral(dec!(5000)))
        .unwrap();

    // +$4 x 8 backed units = maker pays 32, breaching maintenance (208)
    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(104)), Timestamp::from_seconds(0));
    engine.settle_account(maker).unwrap();
    assert!(engine.account(maker).unwrap().liquidation);

    engine.liquidate(maker, keeper).unwrap();
    engine.settle_account(long).unwrap();
    let long_before = engine.account(long).unwrap().collateral;

    // with zero makers, the long's exposure has no counterparty: the next
    // move accrues nothing rather than manufacturing value
    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(112)), Timestamp::from_seconds(0));
    engine.settle_account(long).unwrap();
    assert_eq!(engine.account(long).unwrap().collateral, long_before);
}

#[test]
fn maker_payouts_never_exceed_maker_holdings() {
    let mut engine = new_engine(dec!(100));
    let maker = AccountId(1);
    let long = AccountId(2);

    engine
        .update(maker, size(dec!(10)), size(dec!(0)), size(dec!(0)), collateral(dec!(5000)))
        .unwrap();
    engine
        .update(long, size(dec!(0)), size(dec!(10)), size(dec!(0)), collateral(dec!(50000)))
        .unwrap();

    // huge move at full utilization: the transfer is bounded by maker
    // exposure, 10 units x $50
    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(150)), Timestamp::from_seconds(0));
    engine.settle_account(maker).unwrap();
    engine.settle_account(long).unwrap();

    assert_eq!(engine.account(maker).unwrap().collateral.value(), dec!(4500));
    assert_eq!(engine.account(long).unwrap().collateral.value(), dec!(50500));
}

#[test]
fn collateral_plus_fees_is_conserved() {
    let mut engine = new_engine(dec!(100));
    let maker = AccountId(1);
    let long = AccountId(2);
    let short = AccountId(3);
    let keeper = AccountId(4);

    engine
        .update(maker, size(dec!(20)), size(dec!(0)), size(dec!(0)), collateral(dec!(20000)))
        .unwrap();
    engine
        .update(long, size(dec!(0)), size(dec!(10)), size(dec!(0)), collateral(dec!(400)))
        .unwrap();
    engine
        .update(short, size(dec!(0)), size(dec!(0)), size(dec!(4)), collateral(dec!(2000)))
        .unwrap();

    let prices = [dec!(103), dec!(95), dec!(90), dec!(60)];
    for (step, price) in prices.iter().enumerate() {
        engine
            .oracle_mut()
            .stage(Fixed6::new(*price), Timestamp::from_seconds((step as i64 + 1) * 3600));
        engine.settle().unwrap();
        for id in [maker, long, short] {
            engine.settle_account(id).unwrap();
        }
        // the long is eventually underwater; close it out when flagged
        if engine.account(long).unwrap().liquidation {
            engine.liquidate(long, keeper).unwrap();
        }
    }

    // book equity (account collateral + unclaimed fees) must match what the
    // market actually holds, up to per-settlement truncation dust. the
    // keeper's fee already left custody through the ledger.
    let book: Decimal = [maker, long, short]
        .iter()
        .map(|id| engine.account(*id).unwrap().collateral.value())
        .sum::<Decimal>()
        + engine.market().protocol_fee.value()
        + engine.market().market_fee.value();

    let held = engine.ledger().market_balance().value();
    assert!(
        (held - book).abs() < dec!(0.0001),
        "held {held} vs book {book}"
    );
}
