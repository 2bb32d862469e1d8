//! # Money Module
//!
//! Provides the `Money` type for monetary values and `DiscountRate` for
//! percentage discounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │    49.99 × (1 − 0.15) = 42.491499999…  → which cent?                    │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Parts Per Million                        │
//! │    4999 cents × 850000 ppm / 1000000 = 4249.15 → 4249 cents             │
//! │    Rounding happens once, on the final price, half up.                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Decimal values from the JSON datasets are converted to cents / ppm exactly
//! once, at load time (see `strato-data`). Six decimal places of a discount
//! fraction survive that conversion.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

/// Parts per million in 100%.
const PPM_SCALE: i128 = 1_000_000;

/// Parts per million in one basis point.
const PPM_PER_BPS: u32 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in cents.
///
/// ## Where Money is Used
/// ```text
/// Service.price_cents ──► CartLine.original_price ──┬──► totals.original
///                                                    │
/// resolve_price() ──────► CartLine.discounted_price ─┴──► totals.discounted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use strato_core::money::Money;
    ///
    /// let price = Money::from_cents(4999); // $49.99
    /// assert_eq!(price.cents(), 4999);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies money by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use strato_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.multiply_quantity(3).cents(), 897);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Applies a percentage discount: `self × (1 − rate)`, rounded half up
    /// to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use strato_core::money::{DiscountRate, Money};
    ///
    /// let base = Money::from_cents(4999); // $49.99
    /// let discounted = base.apply_percentage_discount(DiscountRate::from_bps(1500));
    /// assert_eq!(discounted.cents(), 4249); // 42.4915 → $42.49
    /// ```
    pub fn apply_percentage_discount(&self, rate: DiscountRate) -> Money {
        let kept_ppm = PPM_SCALE - rate.ppm() as i128;
        Money(div_round_half_up(self.0 as i128 * kept_ppm, PPM_SCALE) as i64)
    }

    /// Subtracts a fixed amount, flooring the result at zero.
    ///
    /// ## Example
    /// ```rust
    /// use strato_core::money::Money;
    ///
    /// let base = Money::from_cents(500);
    /// assert_eq!(base.saturating_discount(Money::from_cents(200)).cents(), 300);
    /// assert_eq!(base.saturating_discount(Money::from_cents(900)).cents(), 0);
    /// ```
    pub fn saturating_discount(&self, amount: Money) -> Money {
        Money((self.0 - amount.0).max(0))
    }
}

/// Integer division rounding half away from zero.
fn div_round_half_up(numerator: i128, denominator: i128) -> i128 {
    let half = denominator / 2;
    if numerator >= 0 {
        (numerator + half) / denominator
    } else {
        (numerator - half) / denominator
    }
}

// =============================================================================
// Discount Rate
// =============================================================================

/// Percentage discount in parts per million (1 ppm = 0.0001%).
///
/// `100_000` is 10% off. Rates above 100% are representable and price the
/// service below zero; the datasets are trusted as authored. Negative rates
/// are not: [`DiscountRate::from_fraction`] floors them at zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscountRate(u32);

impl DiscountRate {
    /// Creates a rate from basis points (`1000` → 10%).
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        DiscountRate(bps * PPM_PER_BPS)
    }

    #[inline]
    pub const fn from_ppm(ppm: u32) -> Self {
        DiscountRate(ppm)
    }

    /// Creates a rate from a fraction (`0.15` → 15% → 150 000 ppm).
    ///
    /// Negative fractions become 0.
    pub fn from_fraction(fraction: f64) -> Self {
        DiscountRate((fraction * PPM_SCALE as f64).round().max(0.0) as u32)
    }

    #[inline]
    pub const fn ppm(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 10_000.0
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Debug-oriented display. The app formats amounts with its configured
/// currency symbol instead.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}${}.{:02}", sign, self.dollars().abs(), self.cents_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl std::iter::Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
