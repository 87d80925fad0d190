//! Approximate comparison functions that automatically use [`EPSILON`].

pub use approx::AbsDiffEq;
use num_traits::{One, Zero};

use crate::{EPSILON, Float};

/// Compares two numbers, but considers them equal if they are separated by less
/// than `EPSILON`.
///
/// Handles infinity specially.
pub fn approx_eq<T: AbsDiffEq<Epsilon = Float>>(a: &T, b: &T) -> bool {
    // use native float equality to handle infinities
    a == b || approx::abs_diff_eq!(a, b, epsilon = EPSILON)
}

/// Returns whether `x` has an absolute value greater than `EPSILON`.
pub fn is_approx_nonzero<T: AbsDiffEq<Epsilon = Float> + Zero>(x: &T) -> bool {
    !approx_eq(x, &T::zero())
}

/// Returns whether `x` is within `EPSILON` of one.
pub fn is_approx_one<T: AbsDiffEq<Epsilon = Float> + One>(x: &T) -> bool {
    approx_eq(x, &T::one())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approx_eq_tolerance() {
        assert!(approx_eq(&1.0, &(1.0 + EPSILON / 2.0)));
        assert!(!approx_eq(&1.0, &(1.0 + EPSILON * 2.0)));
        assert!(approx_eq(&Float::INFINITY, &Float::INFINITY));
    }

    #[test]
    fn test_approx_nonzero_and_one() {
        assert!(!is_approx_nonzero(&(EPSILON / 10.0)));
        assert!(is_approx_nonzero(&-0.25));
        assert!(is_approx_one(&(1.0 - EPSILON / 10.0)));
        assert!(!is_approx_one(&1.1));
    }
}
