//! Linear system definition.

use crate::error::{SolverError, SolverResult};
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::convert::serial::convert_dense_csr;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

/// Square linear system `A·x = b`.
///
/// The coefficient matrix is held in CSR form so a Jacobi sweep touches only
/// stored entries. Owned by whichever pipeline assembled it and consumed by
/// one solve.
#[derive(Clone, Debug, PartialEq)]
pub struct LinearSystem {
    matrix: CsrMatrix<f64>,
    diagonal: DVector<f64>,
    rhs: DVector<f64>,
}

impl LinearSystem {
    /// Create a new system with shape validation.
    pub fn new(matrix: CsrMatrix<f64>, rhs: DVector<f64>) -> SolverResult<Self> {
        if matrix.nrows() != matrix.ncols() {
            return Err(SolverError::Dimension {
                what: format!(
                    "coefficient matrix must be square, got {}x{}",
                    matrix.nrows(),
                    matrix.ncols()
                ),
            });
        }
        if matrix.nrows() == 0 {
            return Err(SolverError::Dimension {
                what: "system has no unknowns".to_string(),
            });
        }
        if rhs.len() != matrix.nrows() {
            return Err(SolverError::Dimension {
                what: format!(
                    "rhs length {} does not match matrix dimension {}",
                    rhs.len(),
                    matrix.nrows()
                ),
            });
        }
        let diagonal = DVector::from_iterator(
            matrix.nrows(),
            matrix.row_iter().enumerate().map(|(i, row)| {
                row.col_indices()
                    .iter()
                    .position(|&k| k == i)
                    .map_or(0.0, |p| row.values()[p])
            }),
        );
        Ok(Self {
            matrix,
            diagonal,
            rhs,
        })
    }

    /// Create a system from triplets; duplicate `(row, col)` entries are summed.
    pub fn from_coo(matrix: &CooMatrix<f64>, rhs: DVector<f64>) -> SolverResult<Self> {
        Self::new(CsrMatrix::from(matrix), rhs)
    }

    /// Create a system from a dense matrix, storing only its non-zero entries.
    pub fn from_dense(matrix: &DMatrix<f64>, rhs: DVector<f64>) -> SolverResult<Self> {
        Self::new(convert_dense_csr(matrix), rhs)
    }

    /// Number of unknowns.
    pub fn dim(&self) -> usize {
        self.rhs.len()
    }

    pub fn matrix(&self) -> &CsrMatrix<f64> {
        &self.matrix
    }

    /// Diagonal entries `a_ii` (zero where none is stored).
    pub fn diagonal(&self) -> &DVector<f64> {
        &self.diagonal
    }

    pub fn rhs(&self) -> &DVector<f64> {
        &self.rhs
    }

    /// `A·x` over stored entries.
    pub fn apply(&self, x: &DVector<f64>) -> DVector<f64> {
        DVector::from_iterator(
            self.dim(),
            self.matrix.row_iter().map(|row| {
                row.col_indices()
                    .iter()
                    .zip(row.values())
                    .map(|(&k, a)| a * x[k])
                    .sum::<f64>()
            }),
        )
    }

    /// First row whose diagonal entry is exactly zero, if any.
    pub fn zero_diagonal_row(&self) -> Option<usize> {
        self.diagonal.iter().position(|&d| d == 0.0)
    }

    /// Weak row diagonal dominance: `|a_ii| >= Σ_{k≠i} |a_ik|` for every row,
    /// strict for at least one.
    pub fn is_diagonally_dominant(&self) -> bool {
        let mut strict = false;
        for (i, row) in self.matrix.row_iter().enumerate() {
            let diag = self.diagonal[i].abs();
            let off: f64 = row
                .col_indices()
                .iter()
                .zip(row.values())
                .filter(|(k, _)| **k != i)
                .map(|(_, a)| a.abs())
                .sum();
            if diag < off {
                return false;
            }
            if diag > off {
                strict = true;
            }
        }
        strict
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_square() {
        let err = LinearSystem::from_dense(&DMatrix::zeros(2, 3), DVector::zeros(2)).unwrap_err();
        assert!(matches!(err, SolverError::Dimension { .. }));
    }

    #[test]
    fn rejects_rhs_mismatch() {
        let err =
            LinearSystem::from_dense(&DMatrix::identity(3, 3), DVector::zeros(2)).unwrap_err();
        assert!(matches!(err, SolverError::Dimension { .. }));
    }

    #[test]
    fn rejects_empty() {
        let err = LinearSystem::new(CsrMatrix::zeros(0, 0), DVector::zeros(0)).unwrap_err();
        assert!(matches!(err, SolverError::Dimension { .. }));
    }

    #[test]
    fn finds_zero_diagonal() {
        let a = DMatrix::from_row_slice(2, 2, &[1.0, 2.0, 3.0, 0.0]);
        let sys = LinearSystem::from_dense(&a, DVector::zeros(2)).unwrap();
        assert_eq!(sys.zero_diagonal_row(), Some(1));
    }

    #[test]
    fn stored_zero_on_diagonal_is_found() {
        let mut coo = CooMatrix::new(2, 2);
        coo.push(0, 0, 3.0);
        coo.push(1, 0, 1.0);
        coo.push(1, 1, 0.0);
        let sys = LinearSystem::from_coo(&coo, DVector::zeros(2)).unwrap();
        assert_eq!(sys.zero_diagonal_row(), Some(1));
    }

    #[test]
    fn duplicate_triplets_are_summed() {
        let mut coo = CooMatrix::new(2, 2);
        coo.push(0, 0, 1.5);
        coo.push(0, 0, 2.5);
        coo.push(1, 1, 1.0);
        let sys = LinearSystem::from_coo(&coo, DVector::zeros(2)).unwrap();
        assert_eq!(sys.diagonal()[0], 4.0);
    }

    #[test]
    fn apply_matches_dense_product() {
        let a = DMatrix::from_row_slice(3, 3, &[4.0, -1.0, 0.0, -1.0, 4.0, -1.0, 0.0, -1.0, 4.0]);
        let x = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let sys = LinearSystem::from_dense(&a, DVector::zeros(3)).unwrap();
        assert_eq!(sys.apply(&x), &a * &x);
    }

    #[test]
    fn diagonal_dominance() {
        let dominant = DMatrix::from_row_slice(2, 2, &[-6.0, 1.0, 2.0, -6.0]);
        let sys = LinearSystem::from_dense(&dominant, DVector::zeros(2)).unwrap();
        assert!(sys.is_diagonally_dominant());

        let weak = DMatrix::from_row_slice(2, 2, &[1.0, 3.0, 3.0, 1.0]);
        let sys = LinearSystem::from_dense(&weak, DVector::zeros(2)).unwrap();
        assert!(!sys.is_diagonally_dominant());
    }
}
