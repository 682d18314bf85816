//! Row-major reshaping between flat solution vectors and profile matrices.

use crate::error::{DiffusionError, DiffusionResult};
use nalgebra::DMatrix;

/// Reshape `flat` row-major into a `rows × cols` matrix: row `j` holds
/// `flat[j·cols .. (j+1)·cols]`.
pub fn reshape_row_major(flat: &[f64], rows: usize, cols: usize) -> DiffusionResult<DMatrix<f64>> {
    let expected = rows * cols;
    if flat.len() != expected {
        return Err(DiffusionError::ReshapeMismatch {
            expected,
            actual: flat.len(),
        });
    }
    Ok(DMatrix::from_row_slice(rows, cols, flat))
}

/// Inverse of [`reshape_row_major`].
pub fn flatten_row_major(matrix: &DMatrix<f64>) -> Vec<f64> {
    // Column-major storage of the transpose is row-major order of `matrix`.
    matrix.transpose().iter().copied().collect()
}
