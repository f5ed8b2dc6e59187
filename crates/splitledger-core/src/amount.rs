//! Amount type representing a count of currency minor units.
//!
//! An [`Amount`] is the fundamental unit of value in splitledger. It stores a
//! signed number of minor units (cents for USD) and never touches floating
//! point. Decimal values only appear at the boundary, through
//! [`Amount::from_decimal`] and [`Amount::to_decimal`].

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Neg, Sub, SubAssign};
use thiserror::Error;

/// Largest number of fractional digits accepted at the decimal boundary.
pub const MAX_SCALE: u32 = 6;

/// A signed quantity of currency minor units.
///
/// # Examples
///
/// ```
/// use splitledger_core::Amount;
/// use rust_decimal_macros::dec;
///
/// let amount = Amount::from_decimal(dec!(30.00), 2).unwrap();
/// assert_eq!(amount.minor_units(), 3000);
///
/// let half = Amount::from_minor(1500);
/// assert_eq!(amount - half, half);
/// assert_eq!(half.to_decimal(2), dec!(15.00));
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

/// Errors converting a decimal number into an [`Amount`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// The number has more fractional digits than the currency scale allows.
    #[error("{number} has more than {scale} fractional digits")]
    TooPrecise {
        /// The rejected number.
        number: Decimal,
        /// The configured scale.
        scale: u32,
    },

    /// The number does not fit in 64-bit minor units.
    #[error("{number} is out of range")]
    OutOfRange {
        /// The rejected number.
        number: Decimal,
    },

    /// The scale itself is unsupported.
    #[error("scale {0} exceeds the maximum of {MAX_SCALE}")]
    UnsupportedScale(u32),
}

impl Amount {
    /// Zero minor units.
    pub const ZERO: Self = Self(0);

    /// Upper bound for a single expense amount (10^15 minor units).
    ///
    /// Keeps `amount * 100` and long folds well inside 64/128-bit range.
    pub const MAX_EXPENSE: Self = Self(1_000_000_000_000_000);

    /// Create an amount from a count of minor units.
    #[must_use]
    pub const fn from_minor(units: i64) -> Self {
        Self(units)
    }

    /// The count of minor units.
    #[must_use]
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Convert a 128-bit accumulator back into an amount, saturating at the
    /// 64-bit bounds.
    #[must_use]
    pub fn from_i128_saturating(units: i128) -> Self {
        Self(i64::try_from(units).unwrap_or(if units < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Check if the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Check if the amount is strictly positive.
    #[must_use]
    pub const fn is_positive(self) -> bool {
        self.0 > 0
    }

    /// Check if the amount is strictly negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value, saturating at `i64::MAX`.
    #[must_use]
    pub const fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Checked addition.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Convert a decimal number into minor units at the given scale.
    ///
    /// The conversion is exact: `10.005` at scale 2 is rejected rather than
    /// rounded.
    ///
    /// ```
    /// use splitledger_core::{Amount, AmountError};
    /// use rust_decimal_macros::dec;
    ///
    /// assert_eq!(Amount::from_decimal(dec!(10.5), 2).unwrap().minor_units(), 1050);
    /// assert!(matches!(
    ///     Amount::from_decimal(dec!(10.005), 2),
    ///     Err(AmountError::TooPrecise { .. })
    /// ));
    /// ```
    pub fn from_decimal(number: Decimal, scale: u32) -> Result<Self, AmountError> {
        if scale > MAX_SCALE {
            return Err(AmountError::UnsupportedScale(scale));
        }
        if number.normalize().scale() > scale {
            return Err(AmountError::TooPrecise { number, scale });
        }
        let factor = Decimal::from(10_i64.pow(scale));
        number
            .checked_mul(factor)
            .and_then(|minor| minor.to_i64())
            .map(Self)
            .ok_or(AmountError::OutOfRange { number })
    }

    /// Convert to a decimal number with exactly `scale` fractional digits.
    #[must_use]
    pub fn to_decimal(self, scale: u32) -> Decimal {
        Decimal::new(self.0, scale)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Amount {
    fn from(units: i64) -> Self {
        Self(units)
    }
}

impl Add for Amount {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl Sub for Amount {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Neg for Amount {
    type Output = Self;

    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl AddAssign for Amount {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl SubAssign for Amount {
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Sum for Amount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<'a> Sum<&'a Self> for Amount {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        iter.copied().sum()
    }
}
