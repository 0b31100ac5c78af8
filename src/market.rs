// 10.0: global market state. the aggregate position, the market-wide pending
// order, accrued fee totals, and the version accumulator all live here.

use crate::accumulator::VersionAccumulator;
use crate::math::UFixed18;
use crate::position::{PendingOrder, Position};
use crate::types::Version;

#[derive(Debug, Clone)]
pub struct Market {
    pub position: Position,
    pub pending: Option<PendingOrder>,
    pub latest_version: Version,
    // fee totals accrue at full precision; claiming truncates to the
    // settlement asset
    pub protocol_fee: UFixed18,
    pub market_fee: UFixed18,
    pub accumulator: VersionAccumulator,
}

impl Market {
    pub fn new(genesis: Version) -> Self {
        Self {
            position: Position::ZERO,
            pending: None,
            latest_version: genesis,
            protocol_fee: UFixed18::ZERO,
            market_fee: UFixed18::ZERO,
            accumulator: VersionAccumulator::new(genesis),
        }
    }

    // the aggregate position the market is headed toward
    pub fn target_position(&self) -> Position {
        self.pending
            .as_ref()
            .map(PendingOrder::position)
            .unwrap_or(self.position)
    }

    // fold the pending order once the settlement loop reaches an interval
    // that starts at or after its version
    pub(crate) fn fold_matured(&mut self, interval_start: Version) {
        if let Some(pending) = &self.pending {
            if pending.version <= interval_start {
                self.position = pending.position();
                self.pending = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::UFixed6;
    use rust_decimal_macros::dec;

    #[test]
    fn pending_folds_once_matured() {
        let mut market = Market::new(Version(1));
        market.pending = Some(PendingOrder::new(
            Version(2),
            UFixed6::new_unchecked(dec!(10)),
            UFixed6::ZERO,
            UFixed6::ZERO,
        ));

        // interval starting at v1: order submitted at v2 is not live yet
        market.fold_matured(Version(1));
        assert!(market.pending.is_some());
        assert!(market.position.is_empty());

        // interval starting at v2: order goes live
        market.fold_matured(Version(2));
        assert!(market.pending.is_none());
        assert_eq!(market.position.maker.value(), dec!(10));
    }

    #[test]
    fn target_position_tracks_pending() {
        let mut market = Market::new(Version(1));
        assert!(market.target_position().is_empty());

        market.pending = Some(PendingOrder::new(
            Version(1),
            UFixed6::ZERO,
            UFixed6::new_unchecked(dec!(3)),
            UFixed6::ZERO,
        ));
        assert_eq!(market.target_position().long.value(), dec!(3));
    }
}
