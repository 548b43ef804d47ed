use rand::{CryptoRng, RngCore};
use serde::{Serialize, de::DeserializeOwned};

use crate::FeError;

/*
    MasterKey  : client-side secret, used both to derive keys and to encrypt
    DerivedKey : functional key bound to one vector, handed to the evaluator
    Ciphertext : encryption of one vector under the master key

    Vectors are given as signed integers; the scheme maps them into its own
    scalar field and back.
*/

pub trait FEScheme: Sized {
    type MasterKey;
    type DerivedKey: Serialize + DeserializeOwned;
    type Ciphertext: Serialize + DeserializeOwned;

    /// Return a scheme handle for vectors of `dimension` components, each
    /// component and every recovered inner product bounded by `bound` in
    /// absolute value
    fn setup(dimension: usize, bound: u64) -> Result<Self, FeError>;
    /// Return a fresh master secret key
    fn generate_master_key<R: RngCore + CryptoRng + ?Sized>(&self, rng: &mut R)
    -> Self::MasterKey;
    /// Return a functional key bound to the given vector
    fn derive_key<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        vector: &[i64],
        master_key: &Self::MasterKey,
    ) -> Result<Self::DerivedKey, FeError>;
    /// Encrypt the given vector
    fn encrypt<R: RngCore + CryptoRng + ?Sized>(
        &self,
        rng: &mut R,
        vector: &[i64],
        master_key: &Self::MasterKey,
    ) -> Result<Self::Ciphertext, FeError>;
    /// Decrypt the given ciphertext (i.e compute an inner product) using the derived key
    fn decrypt(&self, ct: &Self::Ciphertext, key: &Self::DerivedKey) -> Result<i64, FeError>;
}
