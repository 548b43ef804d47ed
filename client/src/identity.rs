use ed25519_dalek::{SigningKey, VerifyingKey};
use messages::ClientId;
use rand::{CryptoRng, RngCore};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IdentityError {
    #[error("random source unavailable: {0}")]
    RandomSource(#[from] rand::Error),
}

/// Identifier and signing key pair of one client. The secret half never
/// leaves the client.
#[derive(Debug)]
pub struct ClientIdentity {
    rid: ClientId,
    signing_key: SigningKey,
}

impl ClientIdentity {
    /// Draw a `security_parameter`-byte identifier and a fresh Ed25519 key
    /// pair. A failing random source is fatal; there is no retry.
    pub fn generate<R: RngCore + CryptoRng + ?Sized>(
        security_parameter: usize,
        rng: &mut R,
    ) -> Result<Self, IdentityError> {
        let mut rid = vec![0u8; security_parameter];
        rng.try_fill_bytes(&mut rid)?;

        let mut seed = [0u8; 32];
        rng.try_fill_bytes(&mut seed)?;
        let signing_key = SigningKey::from_bytes(&seed);

        Ok(ClientIdentity {
            rid: ClientId::new(rid),
            signing_key,
        })
    }

    pub fn rid(&self) -> &ClientId {
        &self.rid
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}
