// 12.0: the settlement engine. coordinates version advancement, account
// catch-up, pending-order updates, liquidations, and fee claims.
// deterministic: every input arrives through the oracle and ledger seams.

mod config;
mod core;
mod results;
mod settle;
mod update;

pub use config::EngineConfig;
pub use core::Engine;
pub use results::{
    AccountSettleResult, EngineError, LiquidationResult, SettleResult, UpdateResult,
};
