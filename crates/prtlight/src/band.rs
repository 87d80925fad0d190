//! Rotation matrices acting on individual spherical harmonic bands.
//!
//! Rotating a direction by `R` maps the band-`k` coefficients of that
//! direction linearly: `Y_k(R d) = M_k · Y_k(d)`. `M_k` is recovered from a
//! fixed set of sample directions `d_i` whose band-`k` coefficient vectors
//! are linearly independent. With `A` holding `Y_k(d_i)` as columns and `S`
//! holding `Y_k(R d_i)` as columns, `M_k = S · A⁻¹`.

use prtmath::{Float, Mat3, Mat5, SquareMatrix};

use crate::{Direction, RotationError, RotationTransform, ShCoefficients, band_range, sh_eval};

const K: Float = std::f64::consts::FRAC_1_SQRT_2;

/// Sample directions for band 1.
///
/// These are fixed; band rotation is only correct if the band-1
/// coefficients of these directions are linearly independent.
pub const BAND1_SAMPLE_DIRECTIONS: [Direction; 3] = [Direction::X, Direction::Z, Direction::Y];

/// Sample directions for band 2.
///
/// These are fixed; band rotation is only correct if the band-2
/// coefficients of these directions are linearly independent.
pub const BAND2_SAMPLE_DIRECTIONS: [Direction; 5] = [
    Direction::X,
    Direction::Z,
    Direction::new(K, K, 0.0),
    Direction::new(K, 0.0, K),
    Direction::new(0.0, K, K),
];

/// Pair of matrices that rotate band 1 and band 2 coefficients.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
pub struct BandRotations {
    /// 3x3 rotation of band 1.
    pub band1: Mat3,
    /// 5x5 rotation of band 2.
    pub band2: Mat5,
}

impl BandRotations {
    /// Rotations for the identity transform.
    pub const IDENT: Self = Self {
        band1: Mat3::IDENT,
        band2: Mat5::IDENT,
    };

    /// Derives band rotations for `transform`.
    ///
    /// When rotating repeatedly, construct a [`BandRotationBuilder`] once and
    /// call [`BandRotationBuilder::build()`] instead.
    pub fn from_transform(transform: &RotationTransform) -> Result<Self, RotationError> {
        BandRotationBuilder::new()?.build(transform)
    }

    /// Rotates a coefficient vector. Band 0 is unchanged.
    pub fn rotate(&self, coeffs: &ShCoefficients) -> ShCoefficients {
        ShCoefficients::from_bands(
            coeffs.band0(),
            self.band1 * coeffs.band1(),
            self.band2 * coeffs.band2(),
        )
    }
}

/// Derives [`BandRotations`] for transforms.
///
/// The inverses of the sample matrices do not depend on the transform, so
/// they are computed once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct BandRotationBuilder {
    band1_samples: [Direction; 3],
    band2_samples: [Direction; 5],
    band1_inv: Mat3,
    band2_inv: Mat5,
}

impl BandRotationBuilder {
    /// Constructs a builder using [`BAND1_SAMPLE_DIRECTIONS`] and
    /// [`BAND2_SAMPLE_DIRECTIONS`].
    ///
    /// Returns an error if either sample matrix is singular.
    pub fn new() -> Result<Self, RotationError> {
        Self::with_samples(BAND1_SAMPLE_DIRECTIONS, BAND2_SAMPLE_DIRECTIONS)
    }

    fn with_samples(
        band1_samples: [Direction; 3],
        band2_samples: [Direction; 5],
    ) -> Result<Self, RotationError> {
        let band1_inv = sample_matrix(1, &band1_samples)
            .inverse()
            .ok_or(RotationError::SingularSampleMatrix { band: 1 })?;
        let band2_inv = sample_matrix(2, &band2_samples)
            .inverse()
            .ok_or(RotationError::SingularSampleMatrix { band: 2 })?;
        Ok(Self {
            band1_samples,
            band2_samples,
            band1_inv,
            band2_inv,
        })
    }

    /// Derives band rotations for `transform`.
    ///
    /// Returns an error if `transform` does not preserve the length of the
    /// sample directions.
    pub fn build(&self, transform: &RotationTransform) -> Result<BandRotations, RotationError> {
        let band1 = rotated_sample_matrix(1, &self.band1_samples, transform)? * self.band1_inv;
        let band2 = rotated_sample_matrix(2, &self.band2_samples, transform)? * self.band2_inv;
        log::debug!("built band rotations for transform {:?}", transform.to_cols_array());
        Ok(BandRotations { band1, band2 })
    }
}

/// Returns the band-`band` coefficients of `coeffs`.
fn band_coefficients<const N: usize>(band: usize, coeffs: &ShCoefficients) -> [Float; N] {
    debug_assert_eq!(band_range(band).len(), N);
    let start = band_range(band).start;
    std::array::from_fn(|i| coeffs.0[start + i])
}

/// Returns the matrix with the band-`band` coefficients of each direction as
/// its columns.
fn sample_matrix<const N: usize>(band: usize, dirs: &[Direction; N]) -> SquareMatrix<N> {
    SquareMatrix::from_cols(dirs.map(|dir| band_coefficients(band, &sh_eval(dir))))
}

/// Returns the sample matrix of `dirs` after rotating each one by
/// `transform`.
fn rotated_sample_matrix<const N: usize>(
    band: usize,
    dirs: &[Direction; N],
    transform: &RotationTransform,
) -> Result<SquareMatrix<N>, RotationError> {
    let mut cols = [[0.0; N]; N];
    for (col, &dir) in std::iter::zip(&mut cols, dirs) {
        let rotated = transform.transform_direction(dir);
        if !rotated.is_unit() {
            log::error!("rotated sample direction {rotated:?} for band {band} is not unit length");
            return Err(RotationError::NonUnitDirection {
                band,
                length: rotated.mag(),
            });
        }
        *col = band_coefficients(band, &sh_eval(rotated));
    }
    Ok(SquareMatrix::from_cols(cols))
}
