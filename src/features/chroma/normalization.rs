//! Chroma normalization strategies

use ndarray::{Array1, Array2, ArrayView1, Axis};

/// Default guard added to norms and sums before dividing
pub const DEFAULT_EPSILON: f32 = 1e-9;

/// L2-normalize a vector, guarding the zero vector with `epsilon`
///
/// A zero input stays zero instead of producing NaN.
pub fn l2_normalize(vector: ArrayView1<f32>, epsilon: f32) -> Array1<f32> {
    let norm = vector.dot(&vector).sqrt();
    vector.mapv(|x| x / (norm + epsilon))
}

/// L2-normalize every row of a matrix
pub fn normalize_rows_l2(matrix: &Array2<f32>, epsilon: f32) -> Array2<f32> {
    let norms = matrix.map_axis(Axis(1), |row| row.dot(&row).sqrt());
    let divisor = norms.mapv(|n| n + epsilon).insert_axis(Axis(1));
    matrix / &divisor
}

/// L2-normalize every column of a matrix (frames are columns)
pub fn normalize_columns_l2(matrix: &Array2<f32>, epsilon: f32) -> Array2<f32> {
    let norms = matrix.map_axis(Axis(0), |col| col.dot(&col).sqrt());
    let divisor = norms.mapv(|n| n + epsilon).insert_axis(Axis(0));
    matrix / &divisor
}

/// Scale every column so it sums to 1 across pitch classes
///
/// Silent frames (all zeros) stay all zeros.
pub fn normalize_columns_sum(chroma: &Array2<f32>, epsilon: f32) -> Array2<f32> {
    let sums = chroma.sum_axis(Axis(0));
    let divisor = sums.mapv(|s| s + epsilon).insert_axis(Axis(0));
    chroma / &divisor
}
