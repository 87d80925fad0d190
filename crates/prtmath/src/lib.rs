//! Fixed-size and dynamically-sized matrix primitives used to rotate spherical
//! harmonic coefficients.
//!
//! Fixed-size pieces (3x3, 4x4, 5x5) use [`SquareMatrix`]. The general
//! [`Matrix`] exists for operations that are written once for any size, such
//! as inversion.

pub use {approx, num_traits as num};

/// Floating-point type used for all computations.
pub type Float = f64;

/// Small floating-point value used for comparisons.
pub const EPSILON: Float = 0.000001;

/// Asserts that both arguments are approximately equal.
#[macro_export]
macro_rules! assert_approx_eq {
    ($a:expr, $b:expr $(,)?) => {
        $crate::approx::assert_abs_diff_eq!($a, $b, epsilon = $crate::EPSILON)
    };
}

#[macro_use]
mod impl_macros;

pub mod approx_cmp;
pub mod matrix;
pub mod square;

/// Structs, traits, and constants.
pub mod prelude {
    pub use crate::approx_cmp::*;
    pub use crate::matrix::*;
    pub use crate::square::*;
    pub use crate::{EPSILON, Float};
}
pub use prelude::*;
