// 4.0: the maker/long/short position triple and its derived quantities.
// 4.1 has the pending order: a requested position not yet accruing value.

use crate::math::{Fixed6, MathError, UFixed6};
use crate::types::Version;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub maker: UFixed6,
    pub long: UFixed6,
    pub short: UFixed6,
}

impl Position {
    pub const ZERO: Position = Position {
        maker: UFixed6::ZERO,
        long: UFixed6::ZERO,
        short: UFixed6::ZERO,
    };

    pub fn new(maker: UFixed6, long: UFixed6, short: UFixed6) -> Self {
        Self { maker, long, short }
    }

    pub fn is_empty(&self) -> bool {
        self.maker.is_zero() && self.long.is_zero() && self.short.is_zero()
    }

    // net taker exposure: long - short. positive = long-biased.
    pub fn net(&self) -> Fixed6 {
        Fixed6::new(self.long.value() - self.short.value())
    }

    // |net|, the exposure makers actually back
    pub fn taker(&self) -> UFixed6 {
        self.net().abs()
    }

    // the long-vs-short portion that needs no maker backing
    pub fn matched(&self) -> UFixed6 {
        self.long.min(self.short)
    }

    // taker / maker. zero when there are no makers; may exceed 1 when the
    // market is over-utilized.
    pub fn utilization(&self) -> UFixed6 {
        if self.maker.is_zero() {
            return UFixed6::ZERO;
        }
        self.taker()
            .div(self.maker)
            .unwrap_or(UFixed6::new_unchecked(Decimal::MAX))
    }

    // min(1, maker/taker): makers cannot be asked to pay out more than they
    // collectively hold
    pub fn socialization_factor(&self) -> UFixed6 {
        let taker = self.taker();
        if taker <= self.maker || taker.is_zero() {
            return UFixed6::ONE;
        }
        self.maker.div(taker).unwrap_or(UFixed6::ZERO)
    }

    // min(|net|, maker): the taker exposure that settles against makers
    pub fn socialized_taker(&self) -> UFixed6 {
        self.taker().min(self.maker)
    }

    pub fn notional(&self, price: Fixed6) -> Result<UFixed6, MathError> {
        self.maker
            .add(self.long)?
            .add(self.short)?
            .mul(price.abs())
    }

    // collateral floor for this position at the given price
    pub fn maintenance(&self, price: Fixed6, ratio: UFixed6) -> Result<UFixed6, MathError> {
        self.notional(price)?.mul(ratio)
    }
}

// 4.1: the position a participant (or the whole market) is requesting to
// hold as of `version`. folded into the settled position once the
// settlement loop reaches that version; overwritten by a same-version
// update. at most one exists per account and one for the market.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingOrder {
    pub version: Version,
    pub maker: UFixed6,
    pub long: UFixed6,
    pub short: UFixed6,
}

impl PendingOrder {
    pub fn new(version: Version, maker: UFixed6, long: UFixed6, short: UFixed6) -> Self {
        Self {
            version,
            maker,
            long,
            short,
        }
    }

    pub fn from_position(version: Version, position: &Position) -> Self {
        Self {
            version,
            maker: position.maker,
            long: position.long,
            short: position.short,
        }
    }

    pub fn position(&self) -> Position {
        Position {
            maker: self.maker,
            long: self.long,
            short: self.short,
        }
    }
}
