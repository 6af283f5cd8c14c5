use crate::error::{PaymentError, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

const MINOR_UNITS_PER_MAJOR: Decimal = dec!(100);

/// Converts a major-unit amount into the integer minor units sent on the wire.
///
/// The value is multiplied by 100 and truncated toward zero, so `123.45` becomes
/// `12345` and `12.349` becomes `1234`. Fractions of a minor unit are dropped, never
/// rounded.
pub fn to_minor_units(amount: Decimal) -> Result<i64> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(PaymentError::InvalidAmount(format!(
            "{amount} is negative"
        )));
    }

    amount
        .checked_mul(MINOR_UNITS_PER_MAJOR)
        .and_then(|minor| minor.trunc().to_i64())
        .ok_or_else(|| PaymentError::InvalidAmount(format!("{amount} does not fit in minor units")))
}

/// A non-negative major-unit amount that is known to encode into minor units.
///
/// Fixed when a payment is created and carried unchanged through every state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    pub fn new(value: Decimal) -> Result<Self> {
        to_minor_units(value)?;
        Ok(Self(value))
    }

    /// Builds an amount from a floating point value, rejecting NaN and infinities.
    pub fn from_f64(value: f64) -> Result<Self> {
        let decimal = Decimal::from_f64(value)
            .ok_or_else(|| PaymentError::InvalidAmount(format!("{value} is not a finite amount")))?;
        Self::new(decimal)
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn minor_units(&self) -> Result<i64> {
        to_minor_units(self.0)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = PaymentError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
