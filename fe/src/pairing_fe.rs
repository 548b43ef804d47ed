use ark_bls12_381::{Bls12_381, Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::pairing::Pairing;
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{UniformRand, Zero};
use rand::{CryptoRng, RngCore};

use crate::keys::{Ciphertext, DerivedKey, MasterKey};
use crate::traits::FEScheme;
use crate::{FeError, MAX_BOUND, dlog, matrix};

/// Function-hiding inner product encryption over BLS12-381
/// (Kim, Lewi, Mandal, Montgomery, Roy, Wu).
///
/// A handle only carries the public shape of the scheme; every client
/// generates its own master key under a handle of the same shape, and the
/// evaluator decrypts with a handle of that shape too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fhipe {
    dimension: usize,
    bound: u64,
}

impl Fhipe {
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn bound(&self) -> u64 {
        self.bound
    }

    fn check_dimension(&self, found: usize) -> Result<(), FeError> {
        if found != self.dimension {
            return Err(FeError::DimensionMismatch {
                expected: self.dimension,
                found,
            });
        }
        Ok(())
    }

    /// Map a bounded integer vector into the scalar field
    fn scalars(&self, vector: &[i64]) -> Result<Vec<Fr>, FeError> {
        self.check_dimension(vector.len())?;
        vector
            .iter()
            .enumerate()
            .map(|(index, &value)| {
                if value.unsigned_abs() > self.bound {
                    return Err(FeError::ComponentOutOfBound {
                        index,
                        value,
                        bound: self.bound,
                    });
                }
                Ok(to_scalar(value))
            })
            .collect()
    }
}

fn to_scalar(value: i64) -> Fr {
    let magnitude = Fr::from(value.unsigned_abs());
    if value < 0 { -magnitude } else { magnitude }
}

fn random_nonzero<R: RngCore + CryptoRng + ?Sized>(rng: &mut R) -> Fr {
    loop {
        let s = Fr::rand(rng);
        if !s.is_zero() {
            return s;
        }
    }
}

impl FEScheme for Fhipe {
    type MasterKey = MasterKey;
    type DerivedKey = DerivedKey;
    type Ciphertext = Ciphertext;

    fn setup(dimension: usize, bound: u64) -> Result<Self, FeError> {
        if dimension == 0 {
            return Err(FeError::InvalidDimension);
        }
        if bound == 0 || bound > MAX_BOUND {
            return Err(FeError::InvalidBound {
                bound,
                max: MAX_BOUND,
            });
        }
        Ok(Fhipe { dimension, bound })
    }

    fn generate_master_key<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R) -> MasterKey {
        let (b, b_inverse, det) = matrix::random_invertible(self.dimension, rng);
        let b_star = matrix::transpose_scaled(&b_inverse, det);

        MasterKey { b, b_star, det }
    }

    fn derive_key<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        vector: &[i64],
        master_key: &MasterKey,
    ) -> Result<DerivedKey, FeError> {
        let x = self.scalars(vector)?;
        self.check_dimension(master_key.dimension())?;

        let alpha = random_nonzero(rng);
        let g1 = G1Affine::generator();

        let k1 = (g1 * (alpha * master_key.det)).into_affine();
        let k2: Vec<G1Projective> = matrix::row_times(&x, &master_key.b)
            .into_iter()
            .map(|e| g1 * (alpha * e))
            .collect();

        Ok(DerivedKey {
            k1,
            k2: G1Projective::normalize_batch(&k2),
        })
    }

    fn encrypt<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        vector: &[i64],
        master_key: &MasterKey,
    ) -> Result<Ciphertext, FeError> {
        let y = self.scalars(vector)?;
        self.check_dimension(master_key.dimension())?;

        let beta = random_nonzero(rng);
        let g2 = G2Affine::generator();

        let c1 = (g2 * beta).into_affine();
        let c2: Vec<G2Projective> = matrix::row_times(&y, &master_key.b_star)
            .into_iter()
            .map(|e| g2 * (beta * e))
            .collect();

        Ok(Ciphertext {
            c1,
            c2: G2Projective::normalize_batch(&c2),
        })
    }

    fn decrypt(&self, ct: &Ciphertext, key: &DerivedKey) -> Result<i64, FeError> {
        self.check_dimension(key.dimension())?;
        self.check_dimension(ct.dimension())?;

        // e(K1, C1) = e(g1, g2)^(αβ·det(B))
        let d1 = Bls12_381::pairing(key.k1, ct.c1).0;
        // prod e(K2_i, C2_i) = e(g1, g2)^(αβ·det(B)·<x, y>)
        let d2 = Bls12_381::multi_pairing(key.k2.iter().copied(), ct.c2.iter().copied()).0;

        dlog::discrete_log(d1, d2, self.bound).ok_or(FeError::OutOfRange { bound: self.bound })
    }
}
