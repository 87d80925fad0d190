//! Square matrices with a size known at compile time.

use std::ops::*;

use approx::AbsDiffEq;

use crate::{EPSILON, Float, Matrix};

/// 3-by-3 matrix.
pub type Mat3 = SquareMatrix<3>;
/// 4-by-4 matrix.
pub type Mat4 = SquareMatrix<4>;
/// 5-by-5 matrix.
pub type Mat5 = SquareMatrix<5>;

/// N-by-N square matrix stored inline.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SquareMatrix<const N: usize> {
    /// Elements stored in **column-major** order.
    cols: [[Float; N]; N],
}

impl<const N: usize> Default for SquareMatrix<N> {
    fn default() -> Self {
        Self::IDENT
    }
}

impl<const N: usize> SquareMatrix<N> {
    /// Matrix with all zeros.
    pub const ZERO: Self = Self {
        cols: [[0.0; N]; N],
    };
    /// Identity matrix.
    pub const IDENT: Self = {
        let mut cols = [[0.0; N]; N];
        let mut i = 0;
        while i < N {
            cols[i][i] = 1.0;
            i += 1;
        }
        Self { cols }
    };

    /// Constructs a matrix from its columns.
    pub const fn from_cols(cols: [[Float; N]; N]) -> Self {
        Self { cols }
    }
    /// Constructs a matrix from its rows.
    pub fn from_rows(rows: [[Float; N]; N]) -> Self {
        Self::from_cols(rows).transpose()
    }
    /// Constructs a matrix from a function of `(col, row)` for each element.
    pub fn from_fn(f: impl Fn(usize, usize) -> Float) -> Self {
        Self {
            cols: std::array::from_fn(|col| std::array::from_fn(|row| f(col, row))),
        }
    }
    /// Converts a dynamically-sized matrix, returning `None` if its size is
    /// not `N`.
    pub fn from_matrix(m: &Matrix) -> Option<Self> {
        (m.ndim() == N).then(|| Self::from_fn(|col, row| m.get(col, row)))
    }
    /// Converts to a dynamically-sized matrix.
    pub fn to_matrix(&self) -> Matrix {
        Matrix::from_cols(self.cols)
    }

    /// Returns an element from the matrix.
    pub fn get(&self, col: usize, row: usize) -> Float {
        self.cols[col][row]
    }
    /// Returns a mutable reference to an element from the matrix.
    pub fn get_mut(&mut self, col: usize, row: usize) -> &mut Float {
        &mut self.cols[col][row]
    }
    /// Returns a column of the matrix.
    pub fn col(&self, col: usize) -> [Float; N] {
        self.cols[col]
    }
    /// Returns a row of the matrix.
    pub fn row(&self, row: usize) -> [Float; N] {
        std::array::from_fn(|col| self.cols[col][row])
    }
    /// Returns the columns of the matrix.
    pub fn to_cols_array(&self) -> [[Float; N]; N] {
        self.cols
    }
    /// Returns the rows of the matrix.
    pub fn to_rows_array(&self) -> [[Float; N]; N] {
        self.transpose().cols
    }

    /// Returns the transpose of the matrix.
    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(|col, row| self.cols[row][col])
    }
    /// Returns the inverse of the matrix, or `None` if it is singular.
    ///
    /// See [`Matrix::inverse()`].
    pub fn inverse(&self) -> Option<Self> {
        Self::from_matrix(&self.to_matrix().inverse()?)
    }
    /// Returns the determinant of the matrix.
    pub fn determinant(&self) -> Float {
        self.to_matrix().determinant()
    }
    /// Returns whether the transpose of the matrix is approximately its
    /// inverse.
    pub fn is_orthogonal(&self) -> bool {
        approx::abs_diff_eq!(self.transpose() * *self, Self::IDENT, epsilon = EPSILON)
    }
}

impl<const N: usize> Mul for SquareMatrix<N> {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::from_fn(|col, row| {
            (0..N)
                .map(|k| self.cols[k][row] * rhs.cols[col][k])
                .sum()
        })
    }
}
impl<const N: usize> Mul<[Float; N]> for SquareMatrix<N> {
    type Output = [Float; N];

    fn mul(self, rhs: [Float; N]) -> Self::Output {
        let mut ret = [0.0; N];
        for (col, x) in std::iter::zip(&self.cols, rhs) {
            for row in 0..N {
                ret[row] += col[row] * x;
            }
        }
        ret
    }
}

impl<const N: usize> AbsDiffEq for SquareMatrix<N> {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        std::iter::zip(self.cols.as_flattened(), other.cols.as_flattened())
            .all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}
