// settle-core: margined perpetual futures settlement engine.
// version-accumulator architecture: all value accrual flows through an
// append-only per-unit ledger keyed by oracle version, so settlement cost
// is independent of how many versions an account has skipped.
// all computation is deterministic with no external I/O.
//
// file map (search X.0 for structs, X.1+ for logic):
//   1.x  types.rs: primitives: AccountId, Version, Timestamp
//   2.x  math.rs: checked 6/18-digit fixed point, truncating conversions
//   3.x  curve.rs: utilization -> annualized funding rate
//   4.x  position.rs: maker/long/short triple, pending orders
//   5.x  params.rs: market + protocol parameter snapshots
//   6.x  oracle.rs: versioned price history seam (mocked feed included)
//   7.x  ledger.rs: collateral custody seam (mocked)
//   8.x  accumulator.rs: per-version cumulative per-unit value/reward ledger
//   9.x  account.rs: participant-local settled state
//   10.x market.rs: global aggregate state + fee totals
//   11.x events.rs: state transition events for audit
//   12.x engine/: settlement loop, updates, liquidation, fee claims

// core settlement modules
pub mod account;
pub mod accumulator;
pub mod engine;
pub mod events;
pub mod market;
pub mod math;
pub mod position;
pub mod types;

// pricing and parameters
pub mod curve;
pub mod params;

// collaborator seams
pub mod ledger;
pub mod oracle;

// re exports for convenience
pub use account::*;
pub use accumulator::*;
pub use curve::*;
pub use engine::*;
pub use events::*;
pub use ledger::*;
pub use market::*;
pub use math::*;
pub use oracle::*;
pub use params::*;
pub use position::*;
pub use types::*;
