//! Money handling for the pricing engine.
//!
//! All monetary amounts in this crate are integer euro cents wrapped in
//! the [`Cents`] newtype.  Floating-point values appear only transiently
//! inside a single computation step and are converted back to integer
//! cents through [`round_half_away`], the one rounding helper in the
//! crate.  Keeping a single conversion point is what makes the breakdown
//! reproducible: every derived field is rounded exactly once, immediately
//! after the step that produced it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

/// An amount of money in minor currency units (euro cents).
///
/// `Cents` is deliberately a thin wrapper: it exists so that cent
/// amounts and major-unit floats cannot be mixed up at a call site, not
/// to provide arithmetic beyond what the engine needs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Cents(pub i64);

impl Cents {
    /// Zero cents.
    pub const ZERO: Cents = Cents(0);

    /// Returns the raw cent count.
    pub fn get(self) -> i64 {
        self.0
    }

    /// True when the amount is below zero.  Valid breakdown fields are
    /// never negative; this is used for input validation only.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Subtracts `other`, clamping the result at zero instead of going
    /// negative.  Used for the platform-fee step, where the platform
    /// absorbs any processor-fee shortfall rather than booking a
    /// negative margin.
    pub fn sub_clamped(self, other: Cents) -> Cents {
        Cents((self.0 - other.0).max(0))
    }
}

impl Add for Cents {
    type Output = Cents;

    fn add(self, rhs: Cents) -> Cents {
        Cents(self.0 + rhs.0)
    }
}

impl fmt::Display for Cents {
    /// Formats the amount as a major-unit decimal, e.g. `95.85` for
    /// 9585 cents.  For display and logging only; never parse this back.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Rounds a fractional cent amount to the nearest integer cent using
/// round-half-away-from-zero (`0.5` becomes `1`, `-0.5` becomes `-1`).
///
/// This is the crate's only float-to-cents conversion.  Every derived
/// field of a breakdown passes through here exactly once, immediately
/// after the multiplication that produced it.
pub fn round_half_away(value: f64) -> Cents {
    // f64::round implements round-half-away-from-zero.
    Cents(value.round() as i64)
}
