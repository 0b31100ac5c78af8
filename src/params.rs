// 5.0: parameter snapshots. the engine re-reads these at the start of every
// call; admin changes only affect versions settled afterwards.

use crate::curve::UtilizationCurve;
use crate::math::{UFixed18, UFixed6};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketParams {
    // collateral floor as a fraction of position notional
    pub maintenance: UFixed6,
    // slice of each funding transfer withheld as fee
    pub funding_fee: UFixed6,
    // open/close fee rates on per-side position deltas
    pub maker_fee: UFixed6,
    pub taker_fee: UFixed6,
    // fraction of notional paid to the liquidator, from the account's collateral
    pub liquidation_fee: UFixed6,
    // global maker cap
    pub maker_limit: UFixed6,
    // pre-trade utilization ceiling; accrual-time socialization handles
    // anything that slips past it (e.g. via maker liquidation)
    pub max_utilization: UFixed6,
    // per-second reward emission per side
    pub maker_reward_rate: UFixed18,
    pub long_reward_rate: UFixed18,
    pub short_reward_rate: UFixed18,
    pub curve: UtilizationCurve,
    // a closed market freezes funding and pnl and rejects new risk
    pub closed: bool,
}

impl Default for MarketParams {
    fn default() -> Self {
        Self {
            maintenance: UFixed6::new_unchecked(dec!(0.20)),
            funding_fee: UFixed6::new_unchecked(dec!(0.10)),
            maker_fee: UFixed6::ZERO,
            taker_fee: UFixed6::ZERO,
            liquidation_fee: UFixed6::new_unchecked(dec!(0.05)),
            maker_limit: UFixed6::new_unchecked(dec!(1_000_000)),
            max_utilization: UFixed6::ONE,
            maker_reward_rate: UFixed18::ZERO,
            long_reward_rate: UFixed18::ZERO,
            short_reward_rate: UFixed18::ZERO,
            curve: UtilizationCurve::default(),
            closed: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProtocolParams {
    // share of collected fees routed to the protocol; the rest stays with
    // the market
    pub protocol_fee: UFixed6,
    // accounts must hold either zero collateral or at least this much
    pub min_collateral: UFixed6,
    pub paused: bool,
}

impl Default for ProtocolParams {
    fn default() -> Self {
        Self {
            protocol_fee: UFixed6::new_unchecked(dec!(0.50)),
            min_collateral: UFixed6::new_unchecked(dec!(100)),
            paused: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let m = MarketParams::default();
        assert!(!m.closed);
        assert!(m.maintenance.value() > dec!(0));
        assert_eq!(m.max_utilization, UFixed6::ONE);

        let p = ProtocolParams::default();
        assert!(!p.paused);
        assert!(p.protocol_fee.value() <= dec!(1));
    }
}
