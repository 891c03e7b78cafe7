//! Clock-difference bounds.
//!
//! A bound is the right-hand side of a constraint `x - y < c` or
//! `x - y <= c`. The trace format packs a bound into one integer: the
//! magnitude shifted left by one, with the lowest bit set for strict bounds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A bound for a clock constraint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Bound {
    /// Bound value
    pub magnitude: i32,
    /// True for `<`, false for `<=`
    pub strict: bool,
}

impl Bound {
    /// The bound (infinity, <)
    pub const INFINITY: Bound = Bound {
        magnitude: i32::MAX >> 1,
        strict: true,
    };

    /// The bound (0, <=)
    pub const ZERO: Bound = Bound {
        magnitude: 0,
        strict: false,
    };

    /// Create a new bound
    #[must_use]
    pub const fn new(magnitude: i32, strict: bool) -> Self {
        Self { magnitude, strict }
    }

    /// Decode a packed bound as found in XTR traces
    #[must_use]
    pub const fn from_packed(packed: i32) -> Self {
        Self {
            magnitude: packed >> 1,
            strict: packed & 1 == 1,
        }
    }

    /// Whether this is the unbounded sentinel.
    ///
    /// Only the magnitude is compared; a non-strict bound at the sentinel
    /// magnitude is still unbounded.
    #[must_use]
    pub const fn is_infinity(&self) -> bool {
        self.magnitude == Self::INFINITY.magnitude
    }

    /// Relation symbol for this bound
    #[must_use]
    pub const fn relation(&self, ascii: bool) -> &'static str {
        match (self.strict, ascii) {
            (true, _) => "<",
            (false, true) => "<=",
            (false, false) => "≤",
        }
    }
}

impl Default for Bound {
    fn default() -> Self {
        Self::INFINITY
    }
}

impl fmt::Display for Bound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinity() {
            write!(f, "<∞")
        } else {
            write!(f, "{}{}", self.relation(false), self.magnitude)
        }
    }
}
