//! Spherical harmonic coefficients packed into a 3x3 matrix.

use prtmath::approx::AbsDiffEq;
use prtmath::{EPSILON, Float, Mat3};

use crate::{SH_COEFFICIENTS, ShCoefficients};

/// Nine coefficients of one color channel, packed into a 3x3 matrix for
/// upload as a shader attribute.
///
/// Rows are filled in coefficient order:
///
/// ```text
/// [[c0, c1, c2],
///  [c3, c4, c5],
///  [c6, c7, c8]]
/// ```
///
/// so row 0 holds band 0 and the first two band 1 coefficients, row 1 holds
/// the last band 1 coefficient and the first two band 2 coefficients, and
/// row 2 holds the last three band 2 coefficients.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct PackedSh(pub [[Float; 3]; 3]);

impl PackedSh {
    /// All coefficients zero.
    pub const ZERO: Self = Self([[0.0; 3]; 3]);

    /// Packs coefficients in order.
    pub fn from_coefficients(coeffs: &ShCoefficients) -> Self {
        Self::from_array(coeffs.0)
    }
    /// Packs 9 values in coefficient order.
    pub fn from_array(values: [Float; SH_COEFFICIENTS]) -> Self {
        Self(std::array::from_fn(|row| {
            std::array::from_fn(|col| values[row * 3 + col])
        }))
    }

    /// Unpacks coefficients.
    pub fn to_coefficients(&self) -> ShCoefficients {
        ShCoefficients(self.to_array())
    }
    /// Returns the 9 values in coefficient order.
    pub fn to_array(&self) -> [Float; SH_COEFFICIENTS] {
        std::array::from_fn(|i| self.0[i / 3][i % 3])
    }
    /// Returns the 9 values in coefficient order at single precision.
    pub fn to_f32_array(&self) -> [f32; SH_COEFFICIENTS] {
        self.to_array().map(|x| x as f32)
    }
    /// Returns the packed values as a matrix whose rows are the rows of the
    /// packing.
    pub fn to_mat3(&self) -> Mat3 {
        Mat3::from_rows(self.0)
    }

    /// Returns the sum of elementwise products with `other`.
    ///
    /// With `self` as transfer coefficients and `other` as light coefficients
    /// in the same frame, this is the radiance transferred for one channel.
    pub fn dot(&self, other: &Self) -> Float {
        std::iter::zip(self.0.as_flattened(), other.0.as_flattened())
            .map(|(a, b)| a * b)
            .sum()
    }
}

impl From<ShCoefficients> for PackedSh {
    fn from(coeffs: ShCoefficients) -> Self {
        Self::from_coefficients(&coeffs)
    }
}
impl From<PackedSh> for ShCoefficients {
    fn from(packed: PackedSh) -> Self {
        packed.to_coefficients()
    }
}

impl AbsDiffEq for PackedSh {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        std::iter::zip(self.0.as_flattened(), other.0.as_flattened())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
