// 12.0.2: result types and errors for engine operations.

use crate::ledger::LedgerError;
use crate::math::{Fixed6, MathError, UFixed18, UFixed6};
use crate::oracle::OracleError;
use crate::types::{AccountId, Version};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettleResult {
    pub version: Version,
    pub versions_settled: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSettleResult {
    pub version: Version,
    pub value_accrued: Fixed6,
    pub reward_accrued: UFixed18,
    pub liquidating: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateResult {
    pub version: Version,
    pub fee: UFixed6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LiquidationResult {
    pub version: Version,
    pub fee: UFixed6,
    pub shortfall: UFixed6,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("protocol is paused")]
    Paused,

    #[error("market is closed to new risk")]
    Closed,

    #[error("maker {total} would exceed limit {limit}")]
    MakerOverLimit { total: UFixed6, limit: UFixed6 },

    #[error("taker exposure {taker} exceeds available maker liquidity {available}")]
    InsufficientLiquidity { taker: UFixed6, available: UFixed6 },

    #[error("collateral {collateral} below requirement {required}")]
    InsufficientCollateral {
        collateral: Fixed6,
        required: UFixed6,
    },

    #[error("account {0} is being liquidated")]
    InLiquidation(AccountId),

    #[error("account {0} meets maintenance and cannot be liquidated")]
    NotLiquidatable(AccountId),

    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("invalid oracle version {0}")]
    InvalidOracleVersion(Version),

    #[error("math error: {0}")]
    Math(#[from] MathError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl From<OracleError> for EngineError {
    fn from(err: OracleError) -> Self {
        match err {
            OracleError::UnpublishedVersion(v) => EngineError::InvalidOracleVersion(v),
        }
    }
}
