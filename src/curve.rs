// 3.0: utilization curve. maps maker utilization to an annualized funding
// rate. piecewise linear through (0, min), (target_u, target), (1, max);
// past full utilization the last segment keeps extrapolating.

use crate::math::{Fixed18, UFixed6};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct UtilizationCurve {
    pub min_rate: Fixed18,
    pub target_rate: Fixed18,
    pub max_rate: Fixed18,
    pub target_utilization: UFixed6,
}

impl Default for UtilizationCurve {
    fn default() -> Self {
        Self {
            min_rate: Fixed18::new(dec!(0.00)),
            target_rate: Fixed18::new(dec!(0.08)),
            max_rate: Fixed18::new(dec!(1.00)),
            target_utilization: UFixed6::new_unchecked(dec!(0.80)),
        }
    }
}

impl UtilizationCurve {
    // 3.1: pure interpolation, no state. utilization above 1 is legitimate
    // (socialization territory) and rides the second segment's slope.
    pub fn rate(&self, utilization: UFixed6) -> Fixed18 {
        let u = utilization.value();
        let target = self.target_utilization.value();

        if u <= target {
            if target.is_zero() {
                return self.target_rate;
            }
            let span = self.target_rate.value() - self.min_rate.value();
            match span.checked_mul(u).and_then(|v| v.checked_div(target)) {
                Some(offset) => Fixed18::new(self.min_rate.value() + offset),
                None => self.target_rate,
            }
        } else {
            let denom = Decimal::ONE - target;
            if denom <= Decimal::ZERO {
                return self.max_rate;
            }
            let span = self.max_rate.value() - self.target_rate.value();
            match span
                .checked_mul(u - target)
                .and_then(|v| v.checked_div(denom))
                .and_then(|v| self.target_rate.value().checked_add(v))
            {
                Some(rate) => Fixed18::new(rate),
                None => self.max_rate,
            }
        }
    }
}
