// Symphonia
// Copyright (c) 2019 The Project Symphonia Developers.
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Exact rational arithmetic for composition clocks.
//!
//! `current_timestamp`, `duration`, and edit-unit math must never round-trip through floating
//! point: two clocks that are mathematically equal but reached by different multiplication
//! orders must still compare equal.

use std::cmp::Ordering;
use std::fmt;

use symphonia_core::units::TimeBase;

/// A signed rational number `num / den`. `den` is always non-zero.
#[derive(Copy, Clone, Debug)]
pub struct Rational {
    pub num: i64,
    pub den: i64,
}

impl Rational {
    pub const ZERO: Rational = Rational { num: 0, den: 1 };

    /// Creates a new `Rational`. Panics if `den == 0`, mirroring `TimeBase::new`.
    pub fn new(num: i64, den: i64) -> Self {
        if den == 0 {
            panic!("Rational cannot have a 0 denominator");
        }
        Rational { num, den }
    }

    /// The reciprocal of an edit rate: one "tick" of its timeline.
    pub fn edit_unit(edit_rate: Rational) -> Rational {
        Rational::new(edit_rate.den, edit_rate.num)
    }

    pub fn checked_add(self, rhs: Rational) -> Option<Rational> {
        let num = self.num.checked_mul(rhs.den)?.checked_add(rhs.num.checked_mul(self.den)?)?;
        let den = self.den.checked_mul(rhs.den)?;
        Some(Rational::new(num, den))
    }

    pub fn checked_mul(self, rhs: Rational) -> Option<Rational> {
        let num = self.num.checked_mul(rhs.num)?;
        let den = self.den.checked_mul(rhs.den)?;
        Some(Rational::new(num, den))
    }

    /// Converts a non-negative rational number of seconds into an integer number of
    /// `TimeBase` ticks, truncating any remainder.
    pub fn to_time_base_units(self, tb: TimeBase) -> u64 {
        let num = self.num as i128 * tb.denom as i128;
        let den = self.den as i128 * tb.numer as i128;
        (num / den) as u64
    }

    pub fn to_f64(self) -> f64 {
        self.num as f64 / self.den as f64
    }
}

impl PartialEq for Rational {
    fn eq(&self, other: &Self) -> bool {
        // Cross-multiply rather than reduce: avoids a GCD just to compare.
        self.num as i128 * other.den as i128 == other.num as i128 * self.den as i128
    }
}

impl Eq for Rational {}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num as i128 * other.den as i128;
        let rhs = other.num as i128 * self.den as i128;
        // den is always positive by construction (see `new`), so no sign flip is needed.
        lhs.cmp(&rhs)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.num, self.den)
    }
}

#[cfg(test)]
mod tests {
    use super::Rational;
    use symphonia_core::units::TimeBase;

    #[test]
    fn verify_equality_without_reduction() {
        assert_eq!(Rational::new(1, 2), Rational::new(2, 4));
        assert_ne!(Rational::new(1, 2), Rational::new(1, 3));
    }

    #[test]
    fn verify_ordering() {
        assert!(Rational::new(1, 3) < Rational::new(1, 2));
        assert!(Rational::new(5, 1) > Rational::new(4, 1));
    }

    #[test]
    fn verify_checked_add() {
        let a = Rational::new(1, 24);
        let b = Rational::new(1, 24);
        let sum = a.checked_add(b).unwrap();
        assert_eq!(sum, Rational::new(1, 12));
    }

    #[test]
    fn verify_to_time_base_units() {
        let r = Rational::new(2, 1);
        let tb = TimeBase::new(1, 48000);
        assert_eq!(r.to_time_base_units(tb), 96000);
    }

    #[test]
    fn verify_edit_unit() {
        let edit_rate = Rational::new(24, 1);
        assert_eq!(Rational::edit_unit(edit_rate), Rational::new(1, 24));
    }
}
