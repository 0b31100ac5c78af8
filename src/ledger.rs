// 7.0: collateral custody seam. MOCKED in-memory: the engine only moves
// balances; real token transfers live behind the trait. a failed transfer
// aborts the whole triggering call.

use crate::math::UFixed6;
use crate::types::AccountId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        requested: UFixed6,
        available: UFixed6,
    },
}

pub trait CollateralLedger {
    /// Pull `amount` from `payer` into the market's custody.
    fn transfer_from(&mut self, payer: AccountId, amount: UFixed6) -> Result<(), LedgerError>;

    /// Pay `amount` out of the market's custody to `payee`.
    fn transfer(&mut self, payee: AccountId, amount: UFixed6) -> Result<(), LedgerError>;

    /// Collateral currently held by the market.
    fn market_balance(&self) -> UFixed6;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryLedger {
    balances: HashMap<AccountId, UFixed6>,
    market: UFixed6,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, account: AccountId, amount: UFixed6) {
        let entry = self.balances.entry(account).or_default();
        *entry = entry.add(amount).unwrap_or(*entry);
    }

    pub fn balance_of(&self, account: AccountId) -> UFixed6 {
        self.balances.get(&account).copied().unwrap_or_default()
    }
}

impl CollateralLedger for MemoryLedger {
    fn transfer_from(&mut self, payer: AccountId, amount: UFixed6) -> Result<(), LedgerError> {
        let available = self.balance_of(payer);
        let remaining = available
            .sub(amount)
            .map_err(|_| LedgerError::InsufficientBalance {
                requested: amount,
                available,
            })?;
        self.balances.insert(payer, remaining);
        self.market = self
            .market
            .add(amount)
            .map_err(|_| LedgerError::InsufficientBalance {
                requested: amount,
                available: self.market,
            })?;
        Ok(())
    }

    fn transfer(&mut self, payee: AccountId, amount: UFixed6) -> Result<(), LedgerError> {
        let remaining = self
            .market
            .sub(amount)
            .map_err(|_| LedgerError::InsufficientBalance {
                requested: amount,
                available: self.market,
            })?;
        self.market = remaining;
        let entry = self.balances.entry(payee).or_default();
        *entry = entry.add(amount).unwrap_or(*entry);
        Ok(())
    }

    fn market_balance(&self) -> UFixed6 {
        self.market
    }
}
