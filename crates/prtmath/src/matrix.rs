//! Dynamically-sized square matrix math.

use std::ops::Mul;

use approx::AbsDiffEq;

use crate::{Float, approx_cmp};

/// N-by-N square matrix whose size is only known at runtime.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    /// Number of rows and columns.
    ndim: usize,
    /// Elements stored in **column-major** order.
    elems: Vec<Float>,
}
impl Matrix {
    /// Constructs a matrix with all zeros.
    pub fn zero(ndim: usize) -> Self {
        Self {
            ndim,
            elems: vec![0.0; ndim * ndim],
        }
    }
    /// Constructs an identity matrix.
    pub fn ident(ndim: usize) -> Self {
        let mut ret = Self::zero(ndim);
        for i in 0..ndim {
            *ret.get_mut(i, i) = 1.0;
        }
        ret
    }
    /// Constructs a matrix from a list of n^2 elements, in **column-major**
    /// order.
    ///
    /// ```
    /// # use prtmath::prelude::*;
    /// assert_eq!(
    ///     Matrix::from_elems(vec![1.0, 2.0, 3.0, 4.0]),
    ///     prtmath::row_matrix![
    ///         [1.0, 3.0],
    ///         [2.0, 4.0],
    ///     ],
    /// );
    /// ```
    pub fn from_elems(elems: Vec<Float>) -> Self {
        let ndim = (elems.len() as Float).sqrt() as usize;
        assert_eq!(
            ndim * ndim,
            elems.len(),
            "matrix must have square number of elements; got {} elements",
            elems.len(),
        );
        Matrix { ndim, elems }
    }
    /// Constructs a matrix from a list of columns, where the number of columns
    /// determines the size of the matrix.
    ///
    /// # Panics
    ///
    /// This method panics if any column has a different length than the
    /// number of columns.
    pub fn from_cols<C: AsRef<[Float]>>(cols: impl IntoIterator<Item = C>) -> Self {
        let mut elems = vec![];
        let mut ndim = 0;
        for col in cols {
            elems.extend_from_slice(col.as_ref());
            ndim += 1;
        }
        assert_eq!(elems.len(), ndim * ndim, "columns must form a square matrix");
        Self { ndim, elems }
    }
    /// Constructs a matrix from a list of rows, where the number of rows
    /// determines the size of the matrix.
    pub fn from_rows<R: AsRef<[Float]>>(rows: impl IntoIterator<Item = R>) -> Self {
        Self::from_cols(rows).transpose()
    }
    /// Constructs a matrix from a function of `(col, row)` for each element.
    pub fn from_fn(ndim: usize, f: impl Fn(usize, usize) -> Float) -> Self {
        let f = &f;
        (0..ndim)
            .flat_map(|col| (0..ndim).map(move |row| f(col, row)))
            .collect()
    }

    /// Returns the number of rows and columns of the matrix.
    pub fn ndim(&self) -> usize {
        self.ndim
    }

    /// Returns an element from the matrix.
    ///
    /// # Panics
    ///
    /// This method panics if `col >= self.ndim() || row >= self.ndim()`.
    pub fn get(&self, col: usize, row: usize) -> Float {
        assert!(col < self.ndim && row < self.ndim);
        self.elems[col * self.ndim + row]
    }
    /// Returns a mutable reference to an element from the matrix.
    ///
    /// # Panics
    ///
    /// This method panics if `col >= self.ndim() || row >= self.ndim()`.
    pub fn get_mut(&mut self, col: usize, row: usize) -> &mut Float {
        assert!(col < self.ndim && row < self.ndim);
        &mut self.elems[col * self.ndim + row]
    }

    /// Returns the transpose of the matrix.
    pub fn transpose(&self) -> Matrix {
        Matrix::from_fn(self.ndim, |col, row| self.get(row, col))
    }

    /// Returns the determinant of the matrix, computed by Gaussian
    /// elimination with partial pivoting.
    pub fn determinant(&self) -> Float {
        let mut a = self.clone();
        let mut det = 1.0;
        for col in 0..self.ndim {
            let pivot_row = a.pivot_row(col);
            if pivot_row != col {
                a.swap_rows(col, pivot_row);
                det = -det;
            }
            let pivot = a.get(col, col);
            if pivot == 0.0 {
                return 0.0;
            }
            det *= pivot;
            for row in col + 1..self.ndim {
                let factor = a.get(col, row) / pivot;
                a.sub_scaled_row(row, col, factor);
            }
        }
        det
    }

    /// Returns the inverse of the matrix, or `None` if it is singular.
    ///
    /// Uses Gauss-Jordan elimination with partial pivoting. A pivot whose
    /// magnitude is within `EPSILON` of zero is treated as singular.
    pub fn inverse(&self) -> Option<Matrix> {
        let n = self.ndim;
        let mut a = self.clone();
        let mut inv = Matrix::ident(n);

        for col in 0..n {
            let pivot_row = a.pivot_row(col);
            a.swap_rows(col, pivot_row);
            inv.swap_rows(col, pivot_row);

            let pivot = a.get(col, col);
            if !approx_cmp::is_approx_nonzero(&pivot) {
                return None;
            }
            let recip = 1.0 / pivot;
            a.scale_row(col, recip);
            inv.scale_row(col, recip);

            for row in 0..n {
                if row != col {
                    let factor = a.get(col, row);
                    if factor != 0.0 {
                        a.sub_scaled_row(row, col, factor);
                        inv.sub_scaled_row(row, col, factor);
                    }
                }
            }
        }

        Some(inv)
    }

    /// Returns the row at or below the diagonal with the largest magnitude in
    /// column `col`.
    fn pivot_row(&self, col: usize) -> usize {
        (col..self.ndim)
            .max_by(|&i, &j| self.get(col, i).abs().total_cmp(&self.get(col, j).abs()))
            .unwrap_or(col)
    }
    fn swap_rows(&mut self, i: usize, j: usize) {
        if i != j {
            for col in 0..self.ndim {
                self.elems.swap(col * self.ndim + i, col * self.ndim + j);
            }
        }
    }
    fn scale_row(&mut self, row: usize, factor: Float) {
        for col in 0..self.ndim {
            *self.get_mut(col, row) *= factor;
        }
    }
    /// Subtracts `factor` times row `src` from row `dst`.
    fn sub_scaled_row(&mut self, dst: usize, src: usize, factor: Float) {
        for col in 0..self.ndim {
            let x = self.get(col, src);
            *self.get_mut(col, dst) -= factor * x;
        }
    }
}
impl FromIterator<Float> for Matrix {
    fn from_iter<T: IntoIterator<Item = Float>>(iter: T) -> Self {
        Self::from_elems(iter.into_iter().collect())
    }
}

/// Constructs a matrix from columns.
#[macro_export]
macro_rules! col_matrix {
    ($([$($n:expr),* $(,)?]),* $(,)?) => {
        $crate::Matrix::from_elems(vec![$($($n as $crate::Float),*),*])
    };
}
/// Constructs a matrix from rows.
#[macro_export]
macro_rules! row_matrix {
    ($([$($n:expr),* $(,)?]),* $(,)?) => {
        $crate::Matrix::from_elems(vec![$($($n as $crate::Float),*),*]).transpose()
    };
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Self::Output {
        assert_eq!(self.ndim, rhs.ndim, "matrix size mismatch");
        let n = self.ndim;
        Matrix::from_fn(n, |col, row| {
            (0..n).map(|k| self.get(k, row) * rhs.get(col, k)).sum()
        })
    }
}
impl_forward_bin_ops_to_ref! {
    impl Mul for Matrix { fn mul() }
}

impl AbsDiffEq for Matrix {
    type Epsilon = Float;

    fn default_epsilon() -> Self::Epsilon {
        super::EPSILON
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.ndim == other.ndim
            && std::iter::zip(&self.elems, &other.elems).all(|(a, b)| a.abs_diff_eq(b, epsilon))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::assert_approx_eq;

    #[test]
    fn test_matrix_multiply() {
        let m1 = col_matrix![[1, 2, 0], [0, 1, 1], [1, 1, 1]];
        let m2 = col_matrix![[1, 2, 4], [2, 3, 2], [1, 1, 2]];
        assert_eq!(&m1 * &m2, col_matrix![[5, 8, 6], [4, 9, 5], [3, 5, 3]]);
        assert_eq!(&m1 * Matrix::ident(3), m1);
    }

    #[test]
    fn test_matrix_determinant() {
        let m = col_matrix![[3, 7], [1, -4]];
        assert_approx_eq!(m.determinant(), -19.0);

        let m = col_matrix![[-2, -1, 2], [2, 1, 4], [-3, 3, -1]];
        assert_approx_eq!(m.determinant(), 54.0);

        let m = col_matrix![[1, 2, 3, 4], [5, 6, 8, 7], [-10, 3, 6, 2], [3, 1, 4, 1]];
        assert_approx_eq!(m.determinant(), -402.0);
    }

    #[test]
    fn test_matrix_inverse() {
        let m = col_matrix![[1., 0., 4.], [1., 1., 6.], [-3., 0., -10.]];
        let inv = m.inverse().expect("matrix is invertible");
        assert_approx_eq!(&m * &inv, Matrix::ident(3));
        assert_approx_eq!(&inv * &m, Matrix::ident(3));
    }

    #[test]
    fn test_matrix_inverse_requires_pivoting() {
        // zero on the diagonal
        let m = row_matrix![
            [0, 0, 1, 0, 0],
            [0, 2, 0, 0, 1],
            [1, 0, 0, 0, 0],
            [0, 0, 0, 3, 0],
            [0, 1, 0, 0, 1],
        ];
        let inv = m.inverse().expect("matrix is invertible");
        assert_approx_eq!(&m * &inv, Matrix::ident(5));
    }

    #[test]
    fn test_matrix_inverse_singular() {
        let m = row_matrix![[1, 2, 3], [2, 4, 6], [0, 1, 1]];
        assert_eq!(m.inverse(), None);
        assert_approx_eq!(m.determinant(), 0.0);
    }

    #[test]
    fn test_matrix_transpose() {
        assert_eq!(
            row_matrix![[1, 2, 3], [4, 5, 6], [7, 8, 9]],
            col_matrix![[1, 4, 7], [2, 5, 8], [3, 6, 9]],
        );
        assert_eq!(
            Matrix::from_rows([[1.0, 2.0], [3.0, 4.0]]),
            Matrix::from_cols([[1.0, 3.0], [2.0, 4.0]]),
        );
    }
}
