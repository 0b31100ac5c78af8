// 11.0: state transition events for audit trails and external observers.
// events never drive control flow; failures surface as typed errors instead.

use crate::math::{Fixed6, UFixed6};
use crate::types::{AccountId, Timestamp, Version};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(pub u64);

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub timestamp: Timestamp,
    pub payload: EventPayload,
}

impl Event {
    pub fn new(id: EventId, timestamp: Timestamp, payload: EventPayload) -> Self {
        Self {
            id,
            timestamp,
            payload,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventPayload {
    Updated(UpdatedEvent),
    Liquidation(LiquidationEvent),
    FeeClaimed(FeeClaimedEvent),
    ClosedUpdated(ClosedUpdatedEvent),
}

// a pending-order overwrite: the requested position and resulting collateral
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedEvent {
    pub account: AccountId,
    pub version: Version,
    pub maker: UFixed6,
    pub long: UFixed6,
    pub short: UFixed6,
    pub collateral: Fixed6,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiquidationEvent {
    pub account: AccountId,
    pub liquidator: AccountId,
    pub version: Version,
    pub fee: UFixed6,
    // bad debt left on the books, zero when the close was fully covered
    pub shortfall: UFixed6,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeeClaimedEvent {
    pub recipient: AccountId,
    pub protocol: UFixed6,
    pub market: UFixed6,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClosedUpdatedEvent {
    pub closed: bool,
    pub version: Version,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn events_serialize() {
        let event = Event::new(
            EventId(1),
            Timestamp::from_seconds(1000),
            EventPayload::Updated(UpdatedEvent {
                account: AccountId(1),
                version: Version(2),
                maker: UFixed6::new_unchecked(dec!(10)),
                long: UFixed6::ZERO,
                short: UFixed6::ZERO,
                collateral: Fixed6::new(dec!(10000)),
            }),
        );

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Updated"));
    }

    #[test]
    fn liquidation_event_carries_shortfall() {
        let liq = LiquidationEvent {
            account: AccountId(42),
            liquidator: AccountId(99),
            version: Version(7),
            fee: UFixed6::new_unchecked(dec!(44)),
            shortfall: UFixed6::new_unchecked(dec!(50)),
        };
        assert_eq!(liq.shortfall.value(), dec!(50));
    }
}
