//! Forward differences
//!
//! A cubic Bezier with control values (x,y,z,w) is
//!
//!   B(t) = x(1-t)^3 + 3yt(1-t)^2 + 3zt^2(1-t) + wt^3
//!
//! Instead of evaluating the polynomial at every sample, the walk keeps
//! the current value and its first three differences and advances with
//! three additions per step. `halve` rewrites the state for a step half
//! as large, so the sampling resolution can be refined without going back
//! to the control values.

use crate::fixed::fixed_16_16_from_double;

/// Forward-difference state of one scalar cubic
///
/// `d[0]` is the value at the current parameter position, `d[1..=3]` the
/// pending first, second and third differences. A fresh state has step 1:
/// stepping n times yields the curve value at t = n.
#[derive(Debug, Default, Clone, Copy)]
pub struct ForwardDiff {
    pub d: [f64; 4],
}

impl ForwardDiff {
    /// Build the difference state for control values (x,y,z,w)
    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        ForwardDiff {
            d: [
                x,
                w - x,
                6.0 * (w - 2.0 * z + y),
                6.0 * (w - 3.0 * z + 3.0 * y - x),
            ],
        }
    }
    /// Curve value at the current parameter position
    pub fn value(&self) -> f64 {
        self.d[0]
    }
    /// Rewrite the differences for a step half as large
    ///
    /// The value itself is untouched: the current parameter position does
    /// not move, but reaching any given t now takes twice as many steps.
    pub fn halve(&mut self) {
        self.d[3] *= 0.125;
        self.d[2] = self.d[2] * 0.25 - self.d[3];
        self.d[1] = (self.d[1] - self.d[2]) * 0.5;
    }
    /// Advance one step
    pub fn step(&mut self) {
        self.d[0] += self.d[1];
        self.d[1] += self.d[2];
        self.d[2] += self.d[3];
    }
    /// Convert to the integer walking state
    pub fn fixed(&self) -> FixedForwardDiff {
        FixedForwardDiff {
            d: [
                fixed_16_16_from_double(256.0 * 2.0 * self.d[0]),
                fixed_16_16_from_double(256.0 * 16.0 * self.d[1]),
                fixed_16_16_from_double(256.0 * 16.0 * self.d[2]),
                fixed_16_16_from_double(256.0 * 16.0 * self.d[3]),
            ],
        }
    }
}

/// Integer forward-difference state
///
/// `d[0]` is 9.23 fixed point, the differences are 4.28. The formats
/// only hold walks whose extent has been bounded by subdivision first;
/// see the rasterizer for the origin handling that makes this safe.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixedForwardDiff {
    pub d: [i32; 4],
}

impl FixedForwardDiff {
    /// Advance one step
    ///
    /// The value and the differences use different fixed point formats,
    /// so the first difference is rescaled as it is consumed. The extra
    /// `(d[1] >> 4) & 1` term rounds that rescaling to nearest instead of
    /// truncating; without it the truncation error compounds into visible
    /// drift across a 256 step walk.
    pub fn step(&mut self) {
        self.d[0] += (self.d[1] >> 5) + ((self.d[1] >> 4) & 1);
        self.d[1] += self.d[2];
        self.d[2] += self.d[3];
    }
}
