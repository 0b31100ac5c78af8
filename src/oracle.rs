// 6.0: oracle abstraction. the engine only ever sees an immutable,
// monotonically versioned price history; where the prices come from
// (Pyth, Chainlink, a CEX aggregator) is someone else's problem.

use crate::math::Fixed6;
use crate::types::{Timestamp, Version};
use serde::{Deserialize, Serialize};

// a single published price record. immutable once published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OracleVersion {
    pub version: Version,
    pub timestamp: Timestamp,
    pub price: Fixed6,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum OracleError {
    #[error("oracle version {0} has not been published")]
    UnpublishedVersion(Version),
}

pub trait Oracle {
    /// Latest published version.
    fn current_version(&self) -> OracleVersion;

    /// Exact record for a previously published version.
    fn at_version(&self, version: Version) -> Result<OracleVersion, OracleError>;

    /// Request publication of a new version (if one is due) and return the
    /// latest.
    fn sync(&mut self) -> OracleVersion;
}

// 6.1: in-memory feed for tests and simulation. versions are contiguous
// from 1; `stage` queues the price that the next `sync` publishes.
#[derive(Debug, Clone)]
pub struct FeedOracle {
    versions: Vec<OracleVersion>,
    staged: Option<(Fixed6, Timestamp)>,
}

impl FeedOracle {
    pub fn new(price: Fixed6, timestamp: Timestamp) -> Self {
        let genesis = OracleVersion {
            version: Version(1),
            timestamp,
            price,
        };
        Self {
            versions: vec![genesis],
            staged: None,
        }
    }

    pub fn stage(&mut self, price: Fixed6, timestamp: Timestamp) {
        self.staged = Some((price, timestamp));
    }

    pub fn publish(&mut self, price: Fixed6, timestamp: Timestamp) -> OracleVersion {
        let next = OracleVersion {
            version: Version(self.versions.len() as u64 + 1),
            timestamp,
            price,
        };
        self.versions.push(next);
        next
    }
}

impl Oracle for FeedOracle {
    fn current_version(&self) -> OracleVersion {
        *self.versions.last().expect("feed always has a genesis version")
    }

    fn at_version(&self, version: Version) -> Result<OracleVersion, OracleError> {
        if version.0 == 0 || version.0 > self.versions.len() as u64 {
            return Err(OracleError::UnpublishedVersion(version));
        }
        Ok(self.versions[(version.0 - 1) as usize])
    }

    fn sync(&mut self) -> OracleVersion {
        match self.staged.take() {
            Some((price, timestamp)) => self.publish(price, timestamp),
            None => self.current_version(),
        }
    }
}
