use ark_bls12_381::Fr;
use ark_ff::{Field, One, UniformRand, Zero};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Square matrix over the scalar field, row-major.
pub(crate) type Matrix = Vec<Vec<Fr>>;

fn identity(n: usize) -> Matrix {
    (0..n)
        .map(|i| {
            let mut row = vec![Fr::zero(); n];
            row[i] = Fr::one();
            row
        })
        .collect()
}

/// Gauss-Jordan elimination. Returns the inverse and the determinant, or
/// `None` when the matrix is singular. Working copies are wiped on return.
pub(crate) fn invert(matrix: &[Vec<Fr>]) -> Option<(Zeroizing<Matrix>, Fr)> {
    let n = matrix.len();
    let mut left = Zeroizing::new(matrix.to_vec());
    let mut right = Zeroizing::new(identity(n));
    let mut det = Fr::one();

    for col in 0..n {
        let pivot = (col..n).find(|&row| !left[row][col].is_zero())?;
        if pivot != col {
            left.swap(pivot, col);
            right.swap(pivot, col);
            det = -det;
        }

        let p = left[col][col];
        det *= p;
        let p_inv = p.inverse()?;
        for j in 0..n {
            left[col][j] *= p_inv;
            right[col][j] *= p_inv;
        }

        for row in 0..n {
            let factor = left[row][col];
            if row == col || factor.is_zero() {
                continue;
            }
            for j in 0..n {
                let (l, r) = (left[col][j], right[col][j]);
                left[row][j] -= factor * l;
                right[row][j] -= factor * r;
            }
        }
    }

    Some((right, det))
}

/// Sample a uniformly random invertible matrix, together with its inverse
/// and determinant.
pub(crate) fn random_invertible<R: RngCore + CryptoRng + ?Sized>(
    n: usize,
    rng: &mut R,
) -> (Matrix, Zeroizing<Matrix>, Fr) {
    loop {
        let mut candidate = Zeroizing::new(Matrix::with_capacity(n));
        for _ in 0..n {
            let row: Vec<Fr> = (0..n).map(|_| Fr::rand(rng)).collect();
            candidate.push(row);
        }
        // Singular draws happen with probability about n/r
        if let Some((inverse, det)) = invert(&candidate) {
            return (std::mem::take(&mut *candidate), inverse, det);
        }
    }
}

/// `scale * matrixᵀ`
pub(crate) fn transpose_scaled(matrix: &[Vec<Fr>], scale: Fr) -> Matrix {
    let n = matrix.len();
    (0..n)
        .map(|i| (0..n).map(|j| scale * matrix[j][i]).collect())
        .collect()
}

/// Row vector times matrix: `result[j] = sum_i x[i] * m[i][j]`
pub(crate) fn row_times(x: &[Fr], matrix: &[Vec<Fr>]) -> Vec<Fr> {
    let n = matrix.len();
    let mut result = vec![Fr::zero(); n];
    for (x_i, row) in x.iter().zip(matrix) {
        for (r_j, m_ij) in result.iter_mut().zip(row) {
            *r_j += *x_i * m_ij;
        }
    }
    result
}
