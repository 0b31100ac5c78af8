// 8.0: the version accumulator. for every settled oracle version it stores
// the cumulative per-unit value and reward accrued to each position side,
// so any account can catch up across arbitrarily many skipped versions with
// two lookups and a multiply. entries are written once and never mutated.

use crate::math::{Fixed18, MathError, UFixed18, UFixed6};
use crate::oracle::OracleVersion;
use crate::params::{MarketParams, ProtocolParams};
use crate::position::Position;
use crate::types::Version;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// cumulative per-unit totals up to and including a version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accumulation {
    pub maker_value: Fixed18,
    pub long_value: Fixed18,
    pub short_value: Fixed18,
    pub maker_reward: UFixed18,
    pub long_reward: UFixed18,
    pub short_reward: UFixed18,
}

impl Accumulation {
    pub const ZERO: Accumulation = Accumulation {
        maker_value: Fixed18::ZERO,
        long_value: Fixed18::ZERO,
        short_value: Fixed18::ZERO,
        maker_reward: UFixed18::ZERO,
        long_reward: UFixed18::ZERO,
        short_reward: UFixed18::ZERO,
    };
}

// fee slices produced by one transition, already split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccruedFees {
    pub protocol: UFixed18,
    pub market: UFixed18,
}

impl AccruedFees {
    pub const ZERO: AccruedFees = AccruedFees {
        protocol: UFixed18::ZERO,
        market: UFixed18::ZERO,
    };
}

#[derive(Debug, Clone)]
pub struct VersionAccumulator {
    entries: HashMap<Version, Accumulation>,
}

impl VersionAccumulator {
    pub fn new(genesis: Version) -> Self {
        let mut entries = HashMap::new();
        entries.insert(genesis, Accumulation::ZERO);
        Self { entries }
    }

    pub fn at(&self, version: Version) -> Option<&Accumulation> {
        self.entries.get(&version)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // 8.1: accrue one transition (from -> to) given the position that was
    // live during the interval, writing the cumulative entry at `to`.
    //
    // funding: rate(utilization) scaled by elapsed time, applied to the
    //   maker-backed taker exposure min(|net|, maker) at the entry price.
    //   the net-dominant taker side pays makers (or is paid when the rate is
    //   negative); a funding_fee slice is withheld from the receiving side.
    // price pnl: the matched long-vs-short portion exchanges the full price
    //   delta; the net portion settles against makers, capped at maker
    //   capacity (socialization). zero-sum before fees; nothing is
    //   manufactured for exposure makers do not back.
    // rewards: static per-second emission per side, pro-rata per unit.
    pub fn accumulate(
        &mut self,
        from: &OracleVersion,
        to: &OracleVersion,
        position: &Position,
        market: &MarketParams,
        protocol: &ProtocolParams,
    ) -> Result<AccruedFees, MathError> {
        if to.version == from.version {
            return Ok(AccruedFees::ZERO);
        }

        let prev = self
            .entries
            .get(&from.version)
            .copied()
            .unwrap_or(Accumulation::ZERO);
        debug_assert!(
            self.entries.contains_key(&from.version),
            "accumulating from an unsettled version"
        );

        let elapsed = from.timestamp.elapsed_seconds(&to.timestamp);

        let mut maker_total = Fixed18::ZERO;
        let mut long_total = Fixed18::ZERO;
        let mut short_total = Fixed18::ZERO;
        let mut fees = AccruedFees::ZERO;

        // a closed market freezes economic accrual entirely
        if !market.closed {
            let backed = position.socialized_taker();

            // funding
            if elapsed > 0 && !backed.is_zero() {
                let rate = market.curve.rate(position.utilization());
                let years = Fixed18::new(from.timestamp.elapsed_years(&to.timestamp));
                let transfer = rate
                    .mul(years)?
                    .mul(backed.to_fixed18())?
                    .mul(from.price.abs().to_fixed18())?;

                if !transfer.is_zero() {
                    let fee = transfer.abs().mul(market.funding_fee.to_ufixed18())?;
                    let credited = transfer.abs().sub(fee)?.to_fixed18();
                    let long_dominant = !position.net().is_negative();

                    if transfer.is_negative() {
                        // makers pay the dominant taker side
                        maker_total = maker_total.add(transfer)?;
                        if long_dominant {
                            long_total = long_total.add(credited)?;
                        } else {
                            short_total = short_total.add(credited)?;
                        }
                    } else {
                        // the dominant taker side pays makers
                        if long_dominant {
                            long_total = long_total.sub(transfer)?;
                        } else {
                            short_total = short_total.sub(transfer)?;
                        }
                        maker_total = maker_total.add(credited)?;
                    }

                    fees = split_fee(fee, protocol.protocol_fee)?;
                }
            }

            // price pnl
            let delta = to.price.to_fixed18().sub(from.price.to_fixed18())?;
            if !delta.is_zero() {
                let matched_pnl = position.matched().to_fixed18().mul(delta)?;
                let backed_pnl = backed.to_fixed18().mul(delta)?;

                if position.net().is_negative() {
                    // shorts dominate: longs are fully matched, shorts settle
                    // the net portion against makers
                    long_total = long_total.add(matched_pnl)?;
                    short_total = short_total.sub(matched_pnl)?.sub(backed_pnl)?;
                    maker_total = maker_total.add(backed_pnl)?;
                } else {
                    long_total = long_total.add(matched_pnl)?.add(backed_pnl)?;
                    short_total = short_total.sub(matched_pnl)?;
                    maker_total = maker_total.sub(backed_pnl)?;
                }
            }
        }

        // per-unit conversion; zero-size sides carry the previous cumulative
        // value forward untouched
        let mut next = prev;
        let elapsed_units = UFixed18::new_unchecked(Decimal::from(elapsed));

        if !position.maker.is_zero() {
            let per_unit = maker_total.div(position.maker.to_fixed18())?;
            next.maker_value = prev.maker_value.add(per_unit)?;
            next.maker_reward = prev.maker_reward.add(
                market
                    .maker_reward_rate
                    .mul(elapsed_units)?
                    .div(position.maker.to_ufixed18())?,
            )?;
        }
        if !position.long.is_zero() {
            let per_unit = long_total.div(position.long.to_fixed18())?;
            next.long_value = prev.long_value.add(per_unit)?;
            next.long_reward = prev.long_reward.add(
                market
                    .long_reward_rate
                    .mul(elapsed_units)?
                    .div(position.long.to_ufixed18())?,
            )?;
        }
        if !position.short.is_zero() {
            let per_unit = short_total.div(position.short.to_fixed18())?;
            next.short_value = prev.short_value.add(per_unit)?;
            next.short_reward = prev.short_reward.add(
                market
                    .short_reward_rate
                    .mul(elapsed_units)?
                    .div(position.short.to_ufixed18())?,
            )?;
        }

        self.entries.insert(to.version, next);
        Ok(fees)
    }
}

fn split_fee(fee: UFixed18, protocol_share: UFixed6) -> Result<AccruedFees, MathError> {
    let protocol = fee.mul(protocol_share.to_ufixed18())?;
    let market = fee.sub(protocol)?;
    Ok(AccruedFees { protocol, market })
}
