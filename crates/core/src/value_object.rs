//! Value objects: equality by value, not identity.
//!
//! Value objects have **no identity** - they are defined entirely by their
//! attribute values. Quantities and money amounts are the two the stock core
//! passes around everywhere.

use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// build a new one.
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}

/// A strictly positive quantity in base units.
///
/// Item quantities arrive as signed integers from the wire; anything `<= 0` is
/// rejected at construction so the ledger never sees a zero or negative step.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u64")]
pub struct Quantity(u64);

impl Quantity {
    pub fn new(value: i64) -> DomainResult<Self> {
        if value <= 0 {
            return Err(DomainError::validation(format!(
                "quantity must be positive (got {value})"
            )));
        }
        Ok(Self(value as u64))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl TryFrom<i64> for Quantity {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u64 {
    fn from(value: Quantity) -> Self {
        value.0
    }
}

impl core::fmt::Display for Quantity {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for Quantity {}

/// Money in the smallest currency unit (whole rupiah).
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub fn new(amount: u64) -> Self {
        Self(amount)
    }

    /// Build from a signed wire amount, clamping negatives to zero.
    pub fn clamped(amount: i64) -> Self {
        Self(amount.max(0) as u64)
    }

    pub fn amount(self) -> u64 {
        self.0
    }

    pub fn checked_add(self, other: Money) -> Option<Money> {
        self.0.checked_add(other.0).map(Money)
    }

    pub fn checked_mul(self, qty: Quantity) -> Option<Money> {
        self.0.checked_mul(qty.get()).map(Money)
    }

    pub fn saturating_sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl ValueObject for Money {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantity_rejects_zero_and_negative() {
        assert!(Quantity::new(0).is_err());
        assert!(Quantity::new(-3).is_err());
        assert_eq!(Quantity::new(7).unwrap().get(), 7);
    }

    #[test]
    fn quantity_deserialization_validates() {
        let ok: Quantity = serde_json::from_str("5").unwrap();
        assert_eq!(ok.get(), 5);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    #[test]
    fn money_clamps_negative_wire_values() {
        assert_eq!(Money::clamped(-100), Money::ZERO);
        assert_eq!(Money::clamped(250).amount(), 250);
    }

    #[test]
    fn money_subtraction_saturates() {
        assert_eq!(Money::new(40).saturating_sub(Money::new(100)), Money::ZERO);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: line totals never overflow silently.
            #[test]
            fn checked_mul_matches_u128(price in 0u64..1_000_000_000, qty in 1i64..100_000) {
                let q = Quantity::new(qty).unwrap();
                let expected = price as u128 * qty as u128;
                match Money::new(price).checked_mul(q) {
                    Some(m) => prop_assert_eq!(m.amount() as u128, expected),
                    None => prop_assert!(expected > u64::MAX as u128),
                }
            }
        }
    }
}
