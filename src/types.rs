// 1.0: shared primitives. IDs, oracle versions, timestamps.
// each is a newtype so the compiler catches type mixups.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SECONDS_PER_YEAR: i64 = 31_536_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccountId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "account-{}", self.0)
    }
}

// 1.1: oracle version number. strictly increasing once published; 0 is the
// pre-genesis sentinel and never carries a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Version(pub u64);

impl Version {
    pub const ZERO: Version = Version(0);

    pub fn next(&self) -> Version {
        Version(self.0 + 1)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

// 1.2: second-resolution timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    pub fn now() -> Self {
        Self(chrono::Utc::now().timestamp())
    }

    pub fn from_seconds(secs: i64) -> Self {
        Self(secs)
    }

    pub fn as_seconds(&self) -> i64 {
        self.0
    }

    // oracle timestamps are monotone; a non-positive gap clamps to zero
    pub fn elapsed_seconds(&self, later: &Timestamp) -> i64 {
        (later.0 - self.0).max(0)
    }

    pub fn elapsed_years(&self, later: &Timestamp) -> Decimal {
        Decimal::from(self.elapsed_seconds(later)) / Decimal::from(SECONDS_PER_YEAR)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
