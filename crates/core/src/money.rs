//! Monetary amounts in the storefront currency (Peruvian sol, PEN).

use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul};

use serde::{Deserialize, Serialize};

const MINOR_PER_MAJOR: u64 = 100;
const BASIS_POINTS: u64 = 10_000;

/// Non-negative amount in the smallest currency unit (céntimos).
#[derive(
    Debug, Copy, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    pub const ZERO: Money = Money(0);

    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    pub const fn from_major(major: u64) -> Self {
        Self(major * MINOR_PER_MAJOR)
    }

    pub const fn minor(self) -> u64 {
        self.0
    }

    pub fn as_major_f64(self) -> f64 {
        self.0 as f64 / MINOR_PER_MAJOR as f64
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Parse a user-entered decimal amount such as `"1999.99"` or `" 60 "`.
    ///
    /// Returns `None` for anything that is not a finite number. Negative
    /// amounts clamp to zero; fractions round to the nearest céntimo.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Self::from_major_f64(trimmed.parse().ok()?)
    }

    /// Convert a decimal amount in soles, rounding to the nearest céntimo.
    ///
    /// `None` for NaN or infinities; negative amounts clamp to zero.
    pub fn from_major_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let minor = (value * MINOR_PER_MAJOR as f64).round();
        // `as` saturates for out-of-range floats.
        Some(Self(minor.max(0.0) as u64))
    }

    /// Share of this amount expressed in basis points, rounded half-up.
    ///
    /// `Money::from_major(100).percent_bps(1800)` is 18.00.
    pub fn percent_bps(self, bps: u32) -> Self {
        let scaled = u128::from(self.0) * u128::from(bps) + u128::from(BASIS_POINTS / 2);
        Self((scaled / u128::from(BASIS_POINTS)) as u64)
    }

    pub fn saturating_mul(self, factor: u32) -> Self {
        Self(self.0.saturating_mul(u64::from(factor)))
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0.saturating_add(rhs.0))
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        *self = *self + rhs;
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        self.saturating_mul(rhs)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// Formats like the es-PE locale: `S/ 2,499.99`.
impl core::fmt::Display for Money {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let major = self.0 / MINOR_PER_MAJOR;
        let minor = self.0 % MINOR_PER_MAJOR;

        let digits = major.to_string();
        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "S/ {grouped}.{minor:02}")
    }
}
