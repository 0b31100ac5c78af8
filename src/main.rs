//! Settlement Engine Simulation.
//!
//! Walks the engine through its full lifecycle: maker/taker position
//! updates, version-by-version funding and PnL accrual, fee collection,
//! liquidation with explicit shortfall, and maker-side socialization.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use settle_core::*;

fn main() {
    println!("Perpetual Settlement Engine Simulation");
    println!("Single Market, Oracle-Versioned Accrual, Full Lifecycle\n");

    scenario_1_funding_accrual();
    scenario_2_price_pnl();
    scenario_3_liquidation_and_shortfall();
    scenario_4_socialization();

    println!("\nAll simulations completed successfully.");
}

fn new_engine(price: Decimal) -> Engine<FeedOracle, MemoryLedger> {
    let oracle = FeedOracle::new(Fixed6::new(price), Timestamp::from_seconds(0));
    let mut ledger = MemoryLedger::new();
    for id in 1..=4 {
        ledger.mint(AccountId(id), UFixed6::new_unchecked(dec!(1_000_000)));
    }
    Engine::new(
        EngineConfig::default(),
        MarketParams::default(),
        ProtocolParams::default(),
        oracle,
        ledger,
    )
}

fn size(v: Decimal) -> UFixed6 {
    UFixed6::new_unchecked(v)
}

/// Funding flows from the dominant taker side to makers, hour by hour.
fn scenario_1_funding_accrual() {
    println!("Scenario 1: Funding Accrual\n");

    let mut engine = new_engine(dec!(123));
    let maker = AccountId(1);
    let long = AccountId(2);

    engine
        .update(maker, size(dec!(10)), size(dec!(0)), size(dec!(0)), Fixed6::new(dec!(10000)))
        .unwrap();
    engine
        .update(long, size(dec!(0)), size(dec!(5)), size(dec!(0)), Fixed6::new(dec!(10000)))
        .unwrap();

    println!("  Maker posts 10 units, long takes 5 units @ $123");

    for hour in 1..=3 {
        engine
            .oracle_mut()
            .stage(Fixed6::new(dec!(123)), Timestamp::from_seconds(hour * 3600));
        engine.settle().unwrap();
    }
    engine.settle_account(maker).unwrap();
    engine.settle_account(long).unwrap();

    let maker_collateral = engine.account(maker).unwrap().collateral;
    let long_collateral = engine.account(long).unwrap().collateral;
    println!("  After 3 hours flat at $123:");
    println!("    maker collateral: {}", maker_collateral);
    println!("    long collateral:  {}", long_collateral);
    println!(
        "    accrued fees: protocol {}, market {}\n",
        engine.market().protocol_fee,
        engine.market().market_fee
    );
}

/// Price PnL moves value between takers and makers, zero-sum.
fn scenario_2_price_pnl() {
    println!("Scenario 2: Price PnL\n");

    let mut engine = new_engine(dec!(100));
    let maker = AccountId(1);
    let long = AccountId(2);

    engine
        .update(maker, size(dec!(20)), size(dec!(0)), size(dec!(0)), Fixed6::new(dec!(20000)))
        .unwrap();
    engine
        .update(long, size(dec!(0)), size(dec!(10)), size(dec!(0)), Fixed6::new(dec!(10000)))
        .unwrap();

    for (step, price) in [dec!(104), dec!(97)].iter().enumerate() {
        engine
            .oracle_mut()
            .stage(Fixed6::new(*price), Timestamp::from_seconds((step as i64 + 1) * 3600));
        engine.settle().unwrap();
        engine.settle_account(maker).unwrap();
        engine.settle_account(long).unwrap();

        println!(
            "  Price ${}: maker {}, long {}",
            price,
            engine.account(maker).unwrap().collateral,
            engine.account(long).unwrap().collateral
        );
    }
    println!();
}

/// Maintenance breach flags the account; liquidation closes it and leaves
/// any bad debt on the books as an explicit shortfall.
fn scenario_3_liquidation_and_shortfall() {
    println!("Scenario 3: Liquidation and Shortfall\n");

    let mut engine = new_engine(dec!(100));
    let maker = AccountId(1);
    let trader = AccountId(2);
    let keeper = AccountId(3);

    engine
        .update(maker, size(dec!(20)), size(dec!(0)), size(dec!(0)), Fixed6::new(dec!(20000)))
        .unwrap();
    engine
        .update(trader, size(dec!(0)), size(dec!(10)), size(dec!(0)), Fixed6::new(dec!(300)))
        .unwrap();

    println!("  Trader longs 10 units @ $100 on 300 collateral");

    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(60)), Timestamp::from_seconds(3600));
    let result = engine.settle_account(trader).unwrap();
    println!(
        "  Price crashes to $60: collateral {}, liquidating = {}",
        engine.account(trader).unwrap().collateral,
        result.liquidating
    );

    let liq = engine.liquidate(trader, keeper).unwrap();
    println!(
        "  Liquidated: fee {} to keeper, shortfall {} left as bad debt",
        liq.fee, liq.shortfall
    );
    println!(
        "  Trader collateral after close: {}\n",
        engine.account(trader).unwrap().collateral
    );
}

/// When makers cannot back the full net exposure, payouts scale down
/// instead of manufacturing value.
fn scenario_4_socialization() {
    println!("Scenario 4: Socialization\n");

    let mut engine = new_engine(dec!(100));
    let maker = AccountId(1);
    let long = AccountId(2);
    let keeper = AccountId(3);

    engine
        .update(maker, size(dec!(10)), size(dec!(0)), size(dec!(0)), Fixed6::new(dec!(210)))
        .unwrap();
    engine
        .update(long, size(dec!(0)), size(dec!(8)), size(dec!(0)), Fixed6::new(dec!(5000)))
        .unwrap();

    println!("  Thin maker: 10 units on 210 collateral; long takes 8 units");

    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(104)), Timestamp::from_seconds(3600));
    engine.settle_account(maker).unwrap();
    engine.settle_account(long).unwrap();
    println!(
        "  Price $104: maker {} (flagged: {})",
        engine.account(maker).unwrap().collateral,
        engine.account(maker).unwrap().liquidation
    );

    engine.liquidate(maker, keeper).unwrap();
    let long_before = engine.account(long).unwrap().collateral;

    engine
        .oracle_mut()
        .stage(Fixed6::new(dec!(110)), Timestamp::from_seconds(7200));
    engine.settle_account(long).unwrap();
    let long_after = engine.account(long).unwrap().collateral;

    println!("  Maker liquidated; next move $104 -> $110");
    println!(
        "  Long collateral {} -> {} (no makers left to pay, accrual scales to zero)\n",
        long_before, long_after
    );
}
