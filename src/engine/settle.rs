// 12.2: settlement. the global loop replays every published oracle version
// since the last settled one; account catch-up then reads the accumulator's
// cached per-unit values, so an account skipping a thousand versions pays
// the same price as one skipping none.

use super::core::Engine;
use super::results::{AccountSettleResult, EngineError, SettleResult};
use crate::accumulator::{Accumulation, VersionAccumulator};
use crate::ledger::CollateralLedger;
use crate::math::{Fixed18, MathError, UFixed18};
use crate::oracle::Oracle;
use crate::position::Position;
use crate::types::{AccountId, Version};

impl<O: Oracle, L: CollateralLedger> Engine<O, L> {
    /// Advance the global market to the oracle's latest version. Idempotent:
    /// with no pending work this is a cheap no-op.
    pub fn settle(&mut self) -> Result<SettleResult, EngineError> {
        let current = self.oracle.sync();
        let mut from = self.oracle.at_version(self.market.latest_version)?;
        let mut versions_settled = 0;

        while self.market.latest_version < current.version {
            let to = self.oracle.at_version(self.market.latest_version.next())?;

            // an order submitted at version V is live for intervals starting
            // at V, so it first earns or pays at V+1
            self.market.fold_matured(from.version);
            let live = self.market.position;

            let fees = self.market.accumulator.accumulate(
                &from,
                &to,
                &live,
                &self.market_params,
                &self.protocol_params,
            )?;
            self.market.protocol_fee = self.market.protocol_fee.add(fees.protocol)?;
            self.market.market_fee = self.market.market_fee.add(fees.market)?;

            self.market.latest_version = to.version;
            from = to;
            versions_settled += 1;
        }

        Ok(SettleResult {
            version: self.market.latest_version,
            versions_settled,
        })
    }

    /// Settle one account up to the market's latest version. Performs global
    /// settlement first, accrues the account's value and reward from the
    /// accumulator in O(1), folds its matured pending order, and evaluates
    /// the maintenance invariant (advisory: the flag is set, the call still
    /// completes).
    pub fn settle_account(&mut self, id: AccountId) -> Result<AccountSettleResult, EngineError> {
        self.settle()?;

        let target = self.market.latest_version;
        let price = self.oracle.at_version(target)?.price;
        let maintenance_ratio = self.market_params.maintenance;

        let accumulator = &self.market.accumulator;
        let acct = self
            .accounts
            .get_mut(&id)
            .ok_or(EngineError::AccountNotFound(id))?;

        let fold_version = acct
            .pending
            .as_ref()
            .map(|p| p.version)
            .filter(|v| *v <= target);

        let (value, reward) = match fold_version {
            Some(fold_at) => {
                // the position changes at the account's own pending-order
                // version; each sub-interval accrues with the position that
                // was authoritative during it
                let (v1, r1) = accrue(accumulator, acct.latest_version, fold_at, &acct.position)?;
                if let Some(pending) = acct.pending.take() {
                    acct.position = pending.position();
                }
                let (v2, r2) = accrue(accumulator, fold_at, target, &acct.position)?;
                (v1.add(v2)?, r1.add(r2)?)
            }
            None => accrue(accumulator, acct.latest_version, target, &acct.position)?,
        };

        let value_accrued = value.to_fixed6();
        acct.collateral = acct.collateral.add(value_accrued)?;
        acct.reward = acct.reward.add(reward)?;
        acct.latest_version = target;

        if acct.is_closed() {
            acct.liquidation = false;
        } else {
            let required = acct.position.maintenance(price, maintenance_ratio)?;
            acct.liquidation = acct.collateral < required.to_fixed6();
        }

        Ok(AccountSettleResult {
            version: target,
            value_accrued,
            reward_accrued: reward,
            liquidating: acct.liquidation,
        })
    }
}

// (cumulative(to) - cumulative(from)) . position, per side
fn accrue(
    accumulator: &VersionAccumulator,
    from: Version,
    to: Version,
    position: &Position,
) -> Result<(Fixed18, UFixed18), MathError> {
    if from == to || position.is_empty() {
        return Ok((Fixed18::ZERO, UFixed18::ZERO));
    }

    debug_assert!(
        accumulator.at(from).is_some() && accumulator.at(to).is_some(),
        "accruing across unsettled versions"
    );
    let start = accumulator.at(from).copied().unwrap_or(Accumulation::ZERO);
    let end = accumulator.at(to).copied().unwrap_or(Accumulation::ZERO);

    let value = end
        .maker_value
        .sub(start.maker_value)?
        .mul(position.maker.to_fixed18())?
        .add(
            end.long_value
                .sub(start.long_value)?
                .mul(position.long.to_fixed18())?,
        )?
        .add(
            end.short_value
                .sub(start.short_value)?
                .mul(position.short.to_fixed18())?,
        )?;

    let reward = end
        .maker_reward
        .sub(start.maker_reward)?
        .mul(position.maker.to_ufixed18())?
        .add(
            end.long_reward
                .sub(start.long_reward)?
                .mul(position.long.to_ufixed18())?,
        )?
        .add(
            end.short_reward
                .sub(start.short_reward)?
                .mul(position.short.to_ufixed18())?,
        )?;

    Ok((value, reward))
}
