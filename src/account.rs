// 9.0: participant-local state. the account holder owns the collateral, but
// every field here is mutated only through the settlement engine.

use crate::math::{Fixed6, UFixed18, UFixed6};
use crate::position::{PendingOrder, Position};
use crate::types::{AccountId, Version};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    pub id: AccountId,
    // latest settled, value-accruing position
    pub position: Position,
    // requested position not yet folded in
    pub pending: Option<PendingOrder>,
    // signed: stays negative after a liquidation shortfall
    pub collateral: Fixed6,
    pub reward: UFixed18,
    pub latest_version: Version,
    pub liquidation: bool,
}

impl Account {
    pub fn new(id: AccountId, version: Version) -> Self {
        Self {
            id,
            position: Position::ZERO,
            pending: None,
            collateral: Fixed6::ZERO,
            reward: UFixed18::ZERO,
            latest_version: version,
            liquidation: false,
        }
    }

    // the position the account is requesting to hold (pending if any)
    pub fn target_position(&self) -> Position {
        self.pending
            .as_ref()
            .map(PendingOrder::position)
            .unwrap_or(self.position)
    }

    pub fn is_closed(&self) -> bool {
        self.position.is_empty() && self.pending.is_none()
    }

    // unrecovered bad debt left behind by a liquidation
    pub fn shortfall(&self) -> UFixed6 {
        if self.collateral.is_negative() {
            self.collateral.abs()
        } else {
            UFixed6::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn new_account_is_flat() {
        let acct = Account::new(AccountId(7), Version(3));
        assert!(acct.is_closed());
        assert_eq!(acct.latest_version, Version(3));
        assert_eq!(acct.shortfall(), UFixed6::ZERO);
    }

    #[test]
    fn target_position_prefers_pending() {
        let mut acct = Account::new(AccountId(1), Version(1));
        acct.position = Position::new(
            UFixed6::new_unchecked(dec!(5)),
            UFixed6::ZERO,
            UFixed6::ZERO,
        );
        assert_eq!(acct.target_position().maker.value(), dec!(5));

        acct.pending = Some(PendingOrder::new(
            Version(2),
            UFixed6::new_unchecked(dec!(8)),
            UFixed6::ZERO,
            UFixed6::ZERO,
        ));
        assert_eq!(acct.target_position().maker.value(), dec!(8));
        assert!(!acct.is_closed());
    }

    #[test]
    fn shortfall_is_the_negative_part() {
        let mut acct = Account::new(AccountId(1), Version(1));
        acct.collateral = Fixed6::new(dec!(-37.5));
        assert_eq!(acct.shortfall().value(), dec!(37.5));

        acct.collateral = Fixed6::new(dec!(12));
        assert_eq!(acct.shortfall(), UFixed6::ZERO);
    }
}
