//! Real spherical harmonic basis up to band 2.
//!
//! Coefficients are ordered by band and then by order `m` from `-l` to `l`,
//! using the Condon-Shortley phase convention:
//!
//! | index | band | function                 |
//! |-------|------|--------------------------|
//! | 0     | 0    | constant                 |
//! | 1..=3 | 1    | `-y`, `z`, `-x`          |
//! | 4..=8 | 2    | `xy`, `-yz`, `3z²-1`, `-xz`, `x²-y²` |

use std::ops::Range;

use prtmath::approx::AbsDiffEq;
use prtmath::{EPSILON, Float};

use crate::Direction;

/// Number of spherical harmonic bands evaluated.
pub const SH_BANDS: usize = 3;
/// Number of coefficients in bands 0 through 2.
pub const SH_COEFFICIENTS: usize = SH_BANDS * SH_BANDS;

const Y00: Float = 0.28209479177387814;
const Y1: Float = 0.4886025119029199;
const Y2_MIXED: Float = 1.0925484305920792;
const Y20: Float = 0.31539156525252005;
const Y22: Float = 0.5462742152960396;

/// Returns the range of coefficient indices belonging to `band`.
pub const fn band_range(band: usize) -> Range<usize> {
    band * band..(band + 1) * (band + 1)
}

/// Spherical harmonic coefficients for bands 0 through 2.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct ShCoefficients(pub [Float; SH_COEFFICIENTS]);

impl ShCoefficients {
    /// All coefficients zero.
    pub const ZERO: Self = Self([0.0; SH_COEFFICIENTS]);

    /// Evaluates the basis functions in direction `dir`.
    ///
    /// `dir` is not normalized. A zero-length direction yields only the
    /// constant term and the `-1` offset of the `3z²-1` term.
    pub fn eval(dir: Direction) -> Self {
        let Direction { x, y, z } = dir;
        Self([
            Y00,
            -Y1 * y,
            Y1 * z,
            -Y1 * x,
            Y2_MIXED * x * y,
            -Y2_MIXED * y * z,
            Y20 * (3.0 * z * z - 1.0),
            -Y2_MIXED * x * z,
            Y22 * (x * x - y * y),
        ])
    }

    /// Constructs coefficients from their bands.
    pub fn from_bands(band0: Float, band1: [Float; 3], band2: [Float; 5]) -> Self {
        let [a, b, c] = band1;
        let [d, e, f, g, h] = band2;
        Self([band0, a, b, c, d, e, f, g, h])
    }

    /// Returns the coefficients belonging to `band`.
    ///
    /// # Panics
    ///
    /// This method panics if `band >= SH_BANDS`.
    pub fn band(&self, band: usize) -> &[Float] {
        &self.0[band_range(band)]
    }
    /// Returns the band 0 coefficient.
    pub fn band0(&self) -> Float {
        self.0[0]
    }
    /// Returns the band 1 coefficients.
    pub fn band1(&self) -> [Float; 3] {
        std::array::from_fn(|i| self.0[band_range(1).start + i])
    }
    /// Returns the band 2 coefficients.
    pub fn band2(&self) -> [Float; 5] {
        std::array::from_fn(|i| self.0[band_range(2).start + i])
    }
}

impl AbsDiffEq for ShCoefficients {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        std::iter::zip(&self.0, &other.0).all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

/// Evaluates the spherical harmonic basis in direction `dir`.
///
/// See [`ShCoefficients::eval()`].
pub fn sh_eval(dir: Direction) -> ShCoefficients {
    ShCoefficients::eval(dir)
}
