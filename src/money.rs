//! Fixed-point money type with 2 decimal places precision.
//!
//! Backed by `rust_decimal` so repeated deposits, withdrawals and fees never
//! drift the way floats would. Parsing refuses sub-cent amounts and all
//! ledger arithmetic goes through the checked methods.

use rust_decimal::Decimal;
use std::fmt;
use std::ops::Neg;
use std::str::FromStr;
use thiserror::Error;

/// Why a string could not be read as [`Money`].
#[derive(Error, Debug, PartialEq)]
pub enum ParseMoneyError {
    #[error("{0}")]
    Decimal(#[from] rust_decimal::Error),

    /// More precision than whole cents
    #[error("more than {} decimal places", Money::SCALE)]
    SubCent,
}

/// A signed amount of money kept at exactly 2 decimal places (cents).
///
/// Balances may be negative once an account is overdrawn.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use atm_simulator::Money;
///
/// let amount = Money::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.50");
/// assert!(Money::from_str("1.005").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Money(Decimal);

impl Money {
    /// The number of decimal places to maintain.
    pub const SCALE: u32 = 2;

    /// Zero value.
    pub const ZERO: Self = Money(Decimal::ZERO);

    /// Creates an amount of whole dollars.
    pub fn from_dollars(dollars: u32) -> Self {
        Money::from_cents(i64::from(dollars) * 100)
    }

    /// Creates an amount from a number of cents.
    pub fn from_cents(cents: i64) -> Self {
        Money(Decimal::new(cents, Self::SCALE))
    }

    /// Returns `None` if the sum does not fit.
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0.checked_add(rhs.0).map(Money::at_scale)
    }

    /// Returns `None` if the difference does not fit.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0.checked_sub(rhs.0).map(Money::at_scale)
    }

    /// Returns `true` if this value is zero.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` if this value is strictly below zero.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Returns `true` if this value is strictly above zero.
    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Values too large to carry cents keep the widest scale that fits.
    fn at_scale(mut value: Decimal) -> Self {
        value.rescale(Self::SCALE);
        Money(value)
    }
}

impl FromStr for Money {
    type Err = ParseMoneyError;

    /// Trailing zeros are fine (`"1.500"`), real sub-cent digits are not.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        if decimal.normalize().scale() > Self::SCALE {
            return Err(ParseMoneyError::SubCent);
        }
        Ok(Money::at_scale(decimal))
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Neg for Money {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Money(-self.0)
    }
}
