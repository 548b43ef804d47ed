use std::fmt;

use ark_bls12_381::{Fr, G1Affine, G2Affine};
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use crate::canonical;
use crate::matrix::Matrix;

/// Master secret key of the scheme.
/// * `b` : random invertible matrix B over the scalar field
/// * `b_star` : dual basis B* = det(B) · (B⁻¹)ᵀ
/// * `det` : det(B)
///
/// Never serialized; wiped on drop.
pub struct MasterKey {
    pub(crate) b: Matrix,
    pub(crate) b_star: Matrix,
    pub(crate) det: Fr,
}

impl MasterKey {
    pub fn dimension(&self) -> usize {
        self.b.len()
    }
}

impl fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MasterKey")
            .field("dimension", &self.dimension())
            .finish_non_exhaustive()
    }
}

impl Drop for MasterKey {
    fn drop(&mut self) {
        for row in self.b.iter_mut().chain(self.b_star.iter_mut()) {
            row.zeroize();
        }
        self.det.zeroize();
    }
}

/// Functional key bound to a vector x.
/// * `k1` : g1^(α·det(B))
/// * `k2` : g1^(α·x·B), one group element per component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedKey {
    #[serde(with = "canonical")]
    pub(crate) k1: G1Affine,
    #[serde(with = "canonical::vec")]
    pub(crate) k2: Vec<G1Affine>,
}

impl DerivedKey {
    pub fn dimension(&self) -> usize {
        self.k2.len()
    }
}

/// Encryption of a vector y.
/// * `c1` : g2^β
/// * `c2` : g2^(β·y·B*), one group element per component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ciphertext {
    #[serde(with = "canonical")]
    pub(crate) c1: G2Affine,
    #[serde(with = "canonical::vec")]
    pub(crate) c2: Vec<G2Affine>,
}

impl Ciphertext {
    pub fn dimension(&self) -> usize {
        self.c2.len()
    }
}
