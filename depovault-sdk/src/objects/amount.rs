//! Fixed-point ether amounts.
//!
//! Amounts travel through the system in two shapes: the human-readable
//! decimal the user types (`"1.5"`) and the integer base unit the contract
//! works with (`1500000000000000000`). Conversion between the two is exact;
//! nothing here goes through binary floating point.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fractional digits of the contract's base unit (wei).
pub const BASE_UNIT_DECIMALS: u32 = 18;

/// Largest base-unit value an [`EtherAmount`] can hold (the 96-bit decimal
/// mantissa at 18 fractional digits).
pub const MAX_BASE_UNITS: u128 = (1 << 96) - 1;

/// Errors produced while parsing or converting amounts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
    #[error("not a decimal number: {0:?}")]
    NotANumber(String),

    #[error("amount must be greater than zero")]
    NotPositive,

    #[error("amount is negative")]
    Negative,

    #[error("amount has more than 18 fractional digits")]
    TooPrecise,

    #[error("amount does not fit the supported range")]
    Overflow,
}

/// A non-negative amount in the human-readable unit.
///
/// The inner value is always normalized (no trailing fractional zeros) and
/// never carries more than [`BASE_UNIT_DECIMALS`] fractional digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct EtherAmount(Decimal);

impl EtherAmount {
    /// Wrap a decimal, rejecting negatives and anything finer than one wei.
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(AmountError::Negative);
        }
        let value = value.normalize();
        if value.scale() > BASE_UNIT_DECIMALS {
            return Err(AmountError::TooPrecise);
        }
        let amount = Self(value);
        if amount.to_base_units()? > MAX_BASE_UNITS {
            return Err(AmountError::Overflow);
        }
        Ok(amount)
    }

    /// Parse user input, accepting only strictly positive decimals.
    pub fn parse_positive(input: &str) -> Result<Self, AmountError> {
        let amount: EtherAmount = input.parse()?;
        if amount.is_zero() {
            return Err(AmountError::NotPositive);
        }
        Ok(amount)
    }

    /// Build an amount from contract base units.
    pub fn from_base_units(units: u128) -> Result<Self, AmountError> {
        if units > MAX_BASE_UNITS {
            return Err(AmountError::Overflow);
        }
        let units = i128::try_from(units).map_err(|_| AmountError::Overflow)?;
        let value = Decimal::try_from_i128_with_scale(units, BASE_UNIT_DECIMALS)
            .map_err(|_| AmountError::Overflow)?;
        Ok(Self(value.normalize()))
    }

    /// Convert to contract base units.
    pub fn to_base_units(&self) -> Result<u128, AmountError> {
        let mantissa = u128::try_from(self.0.mantissa()).map_err(|_| AmountError::Negative)?;
        let factor = 10u128.pow(BASE_UNIT_DECIMALS - self.0.scale());
        mantissa.checked_mul(factor).ok_or(AmountError::Overflow)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for EtherAmount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if !is_plain_decimal(trimmed) {
            return Err(AmountError::NotANumber(s.to_string()));
        }
        let value =
            Decimal::from_str_exact(trimmed).map_err(|_| AmountError::NotANumber(s.to_string()))?;
        Self::from_decimal(value)
    }
}

/// `[+-]?digits[.digits]`, nothing else. `rust_decimal` also accepts digit
/// separators and exponents, which must not reach an amount.
fn is_plain_decimal(input: &str) -> bool {
    let unsigned = input
        .strip_prefix('+')
        .or_else(|| input.strip_prefix('-'))
        .unwrap_or(input);
    let (int, frac) = match unsigned.split_once('.') {
        Some((int, frac)) => (int, Some(frac)),
        None => (unsigned, None),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    match frac {
        Some(frac) => {
            all_digits(int) && all_digits(frac) && !(int.is_empty() && frac.is_empty())
        }
        None => !int.is_empty() && all_digits(int),
    }
}

impl TryFrom<Decimal> for EtherAmount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::from_decimal(value)
    }
}

impl From<EtherAmount> for Decimal {
    fn from(value: EtherAmount) -> Self {
        value.0
    }
}

impl fmt::Display for EtherAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
