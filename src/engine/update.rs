// 12.3: pending-order updates and liquidation. liquidation is not a separate
// transaction type, it is a forced close-to-zero update issued by any caller
// once the maintenance check fails.

use super::core::Engine;
use super::results::{EngineError, LiquidationResult, UpdateResult};
use crate::events::{EventPayload, LiquidationEvent, UpdatedEvent};
use crate::ledger::CollateralLedger;
use crate::math::{Fixed6, UFixed6};
use crate::oracle::Oracle;
use crate::position::{PendingOrder, Position};
use crate::types::AccountId;

impl<O: Oracle, L: CollateralLedger> Engine<O, L> {
    /// Overwrite the account's pending order with `(maker, long, short)` and
    /// move `collateral_delta` through the ledger (positive = deposit,
    /// negative = withdrawal). Every precondition is checked before any
    /// token movement or state write; a failure leaves the update unapplied.
    pub fn update(
        &mut self,
        id: AccountId,
        maker: UFixed6,
        long: UFixed6,
        short: UFixed6,
        collateral_delta: Fixed6,
    ) -> Result<UpdateResult, EngineError> {
        if self.protocol_params.paused {
            return Err(EngineError::Paused);
        }

        self.ensure_account(id);
        self.settle_account(id)?;

        let version = self.market.latest_version;
        let price = self.oracle.at_version(version)?.price;

        let acct = self
            .accounts
            .get(&id)
            .ok_or(EngineError::AccountNotFound(id))?;
        if acct.liquidation {
            return Err(EngineError::InLiquidation(id));
        }

        let old = acct.target_position();
        let new_position = Position::new(maker, long, short);

        let increasing = maker > old.maker || long > old.long || short > old.short;
        if self.market_params.closed && increasing {
            return Err(EngineError::Closed);
        }

        // prospective aggregate position after this update
        let global = self.market.target_position();
        let new_global = Position::new(
            global.maker.sub(old.maker)?.add(maker)?,
            global.long.sub(old.long)?.add(long)?,
            global.short.sub(old.short)?.add(short)?,
        );

        if maker > old.maker && new_global.maker > self.market_params.maker_limit {
            return Err(EngineError::MakerOverLimit {
                total: new_global.maker,
                limit: self.market_params.maker_limit,
            });
        }

        // pre-trade liquidity check, distinct from accrual-time
        // socialization: growing taker exposure or shrinking maker backing
        // must stay inside the utilization ceiling
        let taker_increasing = long > old.long || short > old.short;
        let maker_decreasing = maker < old.maker;
        if taker_increasing || maker_decreasing {
            let available = new_global.maker.mul(self.market_params.max_utilization)?;
            if new_global.taker() > available {
                return Err(EngineError::InsufficientLiquidity {
                    taker: new_global.taker(),
                    available,
                });
            }
        }

        // open/close fee on per-side deltas, charged at the current price
        let maker_delta = side_delta(maker, old.maker);
        let taker_delta = side_delta(long, old.long).add(side_delta(short, old.short))?;
        let fee = maker_delta
            .mul(price.abs())?
            .mul(self.market_params.maker_fee)?
            .add(
                taker_delta
                    .mul(price.abs())?
                    .mul(self.market_params.taker_fee)?,
            )?;

        let new_collateral = acct.collateral.add(collateral_delta)?.sub(fee.to_fixed6())?;
        if new_collateral.is_negative() {
            return Err(EngineError::InsufficientCollateral {
                collateral: new_collateral,
                required: self.protocol_params.min_collateral,
            });
        }
        // accounts hold either nothing or at least the protocol floor
        if !new_collateral.is_zero()
            && new_collateral < self.protocol_params.min_collateral.to_fixed6()
        {
            return Err(EngineError::InsufficientCollateral {
                collateral: new_collateral,
                required: self.protocol_params.min_collateral,
            });
        }
        let required = new_position.maintenance(price, self.market_params.maintenance)?;
        if new_collateral < required.to_fixed6() {
            return Err(EngineError::InsufficientCollateral {
                collateral: new_collateral,
                required,
            });
        }

        // checks passed: move tokens first so a ledger failure aborts the
        // whole call with nothing written
        if collateral_delta > Fixed6::ZERO {
            self.ledger.transfer_from(id, collateral_delta.abs())?;
        } else if collateral_delta < Fixed6::ZERO {
            self.ledger.transfer(id, collateral_delta.abs())?;
        }

        let acct = self
            .accounts
            .get_mut(&id)
            .ok_or(EngineError::AccountNotFound(id))?;
        acct.collateral = new_collateral;
        acct.pending = Some(PendingOrder::new(version, maker, long, short));

        self.market.pending = Some(PendingOrder::from_position(version, &new_global));

        if !fee.is_zero() {
            let fee18 = fee.to_ufixed18();
            let protocol_slice = fee18.mul(self.protocol_params.protocol_fee.to_ufixed18())?;
            self.market.protocol_fee = self.market.protocol_fee.add(protocol_slice)?;
            self.market.market_fee = self.market.market_fee.add(fee18.sub(protocol_slice)?)?;
        }

        self.emit_event(EventPayload::Updated(UpdatedEvent {
            account: id,
            version,
            maker,
            long,
            short,
            collateral: new_collateral,
        }));

        Ok(UpdateResult { version, fee })
    }

    /// Force-close an undercollateralized account. Callable by anyone; the
    /// caller collects the liquidation fee out of the account's collateral.
    /// Bypasses the closed-market and liquidity preconditions: any
    /// over-utilization left behind is handled by socialization, and a
    /// negative remainder stays on the books as an explicit shortfall.
    pub fn liquidate(
        &mut self,
        id: AccountId,
        liquidator: AccountId,
    ) -> Result<LiquidationResult, EngineError> {
        if self.protocol_params.paused {
            return Err(EngineError::Paused);
        }

        self.settle_account(id)?;

        let version = self.market.latest_version;
        let price = self.oracle.at_version(version)?.price;

        let acct = self
            .accounts
            .get(&id)
            .ok_or(EngineError::AccountNotFound(id))?;
        let position = acct.target_position();
        if position.is_empty() {
            return Err(EngineError::NotLiquidatable(id));
        }

        let required = position.maintenance(price, self.market_params.maintenance)?;
        if acct.collateral >= required.to_fixed6() {
            return Err(EngineError::NotLiquidatable(id));
        }

        // fee: a fraction of notional, capped at whatever collateral remains
        let notional = position.notional(price)?;
        let fee = notional
            .mul(self.market_params.liquidation_fee)?
            .min(acct.collateral.positive());

        let global = self.market.target_position();
        let new_global = Position::new(
            global.maker.sub(position.maker)?,
            global.long.sub(position.long)?,
            global.short.sub(position.short)?,
        );

        if !fee.is_zero() {
            self.ledger.transfer(liquidator, fee)?;
        }

        let acct = self
            .accounts
            .get_mut(&id)
            .ok_or(EngineError::AccountNotFound(id))?;
        acct.collateral = acct.collateral.sub(fee.to_fixed6())?;
        acct.pending = Some(PendingOrder::new(
            version,
            UFixed6::ZERO,
            UFixed6::ZERO,
            UFixed6::ZERO,
        ));
        acct.liquidation = true;
        let shortfall = acct.shortfall();

        self.market.pending = Some(PendingOrder::from_position(version, &new_global));

        self.emit_event(EventPayload::Liquidation(LiquidationEvent {
            account: id,
            liquidator,
            version,
            fee,
            shortfall,
        }));

        Ok(LiquidationResult {
            version,
            fee,
            shortfall,
        })
    }
}

fn side_delta(a: UFixed6, b: UFixed6) -> UFixed6 {
    a.max(b).sub(a.min(b)).unwrap_or(UFixed6::ZERO)
}
