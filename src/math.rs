// 2.0: fixed point arithmetic. two precisions coexist: 6 digits for prices,
// position sizes and collateral, 18 digits for per-unit accrual math.
// every operation is checked and fails with a MathError instead of wrapping.
// division and 18 -> 6 narrowing truncate toward zero; widening is exact.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const SCALE_LOW: u32 = 6;
pub const SCALE_HIGH: u32 = 18;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    #[error("arithmetic overflow")]
    Overflow,

    #[error("arithmetic underflow")]
    Underflow,

    #[error("division by zero")]
    DivisionByZero,
}

// 2.1: unsigned 6-digit fixed point. position sizes, ratios, fee rates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct UFixed6(Decimal);

impl UFixed6 {
    pub const ZERO: UFixed6 = UFixed6(Decimal::ZERO);
    pub const ONE: UFixed6 = UFixed6(Decimal::ONE);

    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(value.trunc_with_scale(SCALE_LOW)))
        } else {
            None
        }
    }

    pub fn new_unchecked(value: Decimal) -> Self {
        debug_assert!(value >= Decimal::ZERO);
        Self(value.trunc_with_scale(SCALE_LOW))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: UFixed6) -> Result<UFixed6, MathError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MathError::Overflow)
    }

    pub fn sub(&self, other: UFixed6) -> Result<UFixed6, MathError> {
        if other.0 > self.0 {
            return Err(MathError::Underflow);
        }
        Ok(Self(self.0 - other.0))
    }

    pub fn mul(&self, other: UFixed6) -> Result<UFixed6, MathError> {
        self.0
            .checked_mul(other.0)
            .map(|v| Self(v.trunc_with_scale(SCALE_LOW)))
            .ok_or(MathError::Overflow)
    }

    pub fn div(&self, other: UFixed6) -> Result<UFixed6, MathError> {
        if other.0.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        self.0
            .checked_div(other.0)
            .map(|v| Self(v.trunc_with_scale(SCALE_LOW)))
            .ok_or(MathError::Overflow)
    }

    pub fn min(&self, other: UFixed6) -> UFixed6 {
        Self(self.0.min(other.0))
    }

    pub fn max(&self, other: UFixed6) -> UFixed6 {
        Self(self.0.max(other.0))
    }

    pub fn to_fixed6(&self) -> Fixed6 {
        Fixed6(self.0)
    }

    pub fn to_ufixed18(&self) -> UFixed18 {
        UFixed18(self.0)
    }

    pub fn to_fixed18(&self) -> Fixed18 {
        Fixed18(self.0)
    }
}

impl fmt::Display for UFixed6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 2.2: signed 6-digit fixed point. prices and collateral. collateral is
// signed so a post-liquidation shortfall stays visible on the books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Fixed6(Decimal);

impl Fixed6 {
    pub const ZERO: Fixed6 = Fixed6(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value.trunc_with_scale(SCALE_LOW))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> UFixed6 {
        UFixed6(self.0.abs())
    }

    // the non-negative part; a negative value clamps to zero
    pub fn positive(&self) -> UFixed6 {
        UFixed6(self.0.max(Decimal::ZERO))
    }

    pub fn neg(&self) -> Fixed6 {
        Fixed6(-self.0)
    }

    pub fn add(&self, other: Fixed6) -> Result<Fixed6, MathError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MathError::Overflow)
    }

    pub fn sub(&self, other: Fixed6) -> Result<Fixed6, MathError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(MathError::Overflow)
    }

    pub fn mul(&self, other: Fixed6) -> Result<Fixed6, MathError> {
        self.0
            .checked_mul(other.0)
            .map(|v| Self(v.trunc_with_scale(SCALE_LOW)))
            .ok_or(MathError::Overflow)
    }

    pub fn div(&self, other: Fixed6) -> Result<Fixed6, MathError> {
        if other.0.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        self.0
            .checked_div(other.0)
            .map(|v| Self(v.trunc_with_scale(SCALE_LOW)))
            .ok_or(MathError::Overflow)
    }

    pub fn to_fixed18(&self) -> Fixed18 {
        Fixed18(self.0)
    }
}

impl fmt::Display for Fixed6 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 2.3: signed 18-digit fixed point. per-unit accumulator values and all
// intermediate funding / pnl math.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Fixed18(Decimal);

impl Fixed18 {
    pub const ZERO: Fixed18 = Fixed18(Decimal::ZERO);

    pub fn new(value: Decimal) -> Self {
        Self(value.trunc_with_scale(SCALE_HIGH))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    pub fn abs(&self) -> UFixed18 {
        UFixed18(self.0.abs())
    }

    pub fn neg(&self) -> Fixed18 {
        Fixed18(-self.0)
    }

    pub fn add(&self, other: Fixed18) -> Result<Fixed18, MathError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MathError::Overflow)
    }

    pub fn sub(&self, other: Fixed18) -> Result<Fixed18, MathError> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(MathError::Overflow)
    }

    pub fn mul(&self, other: Fixed18) -> Result<Fixed18, MathError> {
        self.0
            .checked_mul(other.0)
            .map(|v| Self(v.trunc_with_scale(SCALE_HIGH)))
            .ok_or(MathError::Overflow)
    }

    pub fn div(&self, other: Fixed18) -> Result<Fixed18, MathError> {
        if other.0.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        self.0
            .checked_div(other.0)
            .map(|v| Self(v.trunc_with_scale(SCALE_HIGH)))
            .ok_or(MathError::Overflow)
    }

    // narrowing is lossy in exactly one direction: toward zero
    pub fn to_fixed6(&self) -> Fixed6 {
        Fixed6(self.0.trunc_with_scale(SCALE_LOW))
    }
}

impl fmt::Display for Fixed18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// 2.4: unsigned 18-digit fixed point. rewards and fee totals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct UFixed18(Decimal);

impl UFixed18 {
    pub const ZERO: UFixed18 = UFixed18(Decimal::ZERO);

    #[must_use]
    pub fn new(value: Decimal) -> Option<Self> {
        if value >= Decimal::ZERO {
            Some(Self(value.trunc_with_scale(SCALE_HIGH)))
        } else {
            None
        }
    }

    pub fn new_unchecked(value: Decimal) -> Self {
        debug_assert!(value >= Decimal::ZERO);
        Self(value.trunc_with_scale(SCALE_HIGH))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn add(&self, other: UFixed18) -> Result<UFixed18, MathError> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(MathError::Overflow)
    }

    pub fn sub(&self, other: UFixed18) -> Result<UFixed18, MathError> {
        if other.0 > self.0 {
            return Err(MathError::Underflow);
        }
        Ok(Self(self.0 - other.0))
    }

    pub fn mul(&self, other: UFixed18) -> Result<UFixed18, MathError> {
        self.0
            .checked_mul(other.0)
            .map(|v| Self(v.trunc_with_scale(SCALE_HIGH)))
            .ok_or(MathError::Overflow)
    }

    pub fn div(&self, other: UFixed18) -> Result<UFixed18, MathError> {
        if other.0.is_zero() {
            return Err(MathError::DivisionByZero);
        }
        self.0
            .checked_div(other.0)
            .map(|v| Self(v.trunc_with_scale(SCALE_HIGH)))
            .ok_or(MathError::Overflow)
    }

    pub fn to_fixed18(&self) -> Fixed18 {
        Fixed18(self.0)
    }

    pub fn to_ufixed6(&self) -> UFixed6 {
        UFixed6(self.0.trunc_with_scale(SCALE_LOW))
    }
}

impl fmt::Display for UFixed18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn ufixed6_rejects_negative() {
        assert!(UFixed6::new(dec!(-1)).is_none());
        assert!(UFixed6::new(dec!(0)).is_some());
    }

    #[test]
    fn ufixed6_sub_underflows() {
        let a = UFixed6::new_unchecked(dec!(1));
        let b = UFixed6::new_unchecked(dec!(2));
        assert_eq!(a.sub(b), Err(MathError::Underflow));
        assert_eq!(b.sub(a).unwrap().value(), dec!(1));
    }

    #[test]
    fn division_truncates_toward_zero() {
        let a = Fixed6::new(dec!(-1));
        let b = Fixed6::new(dec!(3));
        assert_eq!(a.div(b).unwrap().value(), dec!(-0.333333));

        let c = UFixed6::new_unchecked(dec!(1));
        let d = UFixed6::new_unchecked(dec!(3));
        assert_eq!(c.div(d).unwrap().value(), dec!(0.333333));
    }

    #[test]
    fn division_by_zero() {
        let a = Fixed18::new(dec!(5));
        assert_eq!(a.div(Fixed18::ZERO), Err(MathError::DivisionByZero));
    }

    #[test]
    fn narrowing_truncates_widening_is_exact() {
        let fine = Fixed18::new(dec!(0.001404109589041089));
        assert_eq!(fine.to_fixed6().value(), dec!(0.001404));

        let negative = Fixed18::new(dec!(-0.0000019));
        assert_eq!(negative.to_fixed6().value(), dec!(-0.000001));

        let coarse = UFixed6::new_unchecked(dec!(123.456789));
        assert_eq!(coarse.to_ufixed18().value(), dec!(123.456789));
    }

    #[test]
    fn construction_truncates_excess_scale() {
        let v = UFixed6::new_unchecked(dec!(1.9999999));
        assert_eq!(v.value(), dec!(1.999999));
    }

    #[test]
    fn mul_overflow_is_an_error() {
        let big = Fixed18::new(Decimal::MAX);
        assert_eq!(big.mul(big), Err(MathError::Overflow));
    }

    #[test]
    fn signed_helpers() {
        let loss = Fixed6::new(dec!(-12.5));
        assert!(loss.is_negative());
        assert_eq!(loss.abs().value(), dec!(12.5));
        assert_eq!(loss.positive().value(), dec!(0));
        assert_eq!(loss.neg().value(), dec!(12.5));
    }
}
