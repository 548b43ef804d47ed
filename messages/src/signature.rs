//! Attached signatures: the envelope carries the signed bytes next to the
//! signature, and opening it hands those bytes back only when the signature
//! checks out. Comparing them with what the verifier expected is left to
//! the caller.
use ed25519_dalek::{SIGNATURE_LENGTH, Signature, Signer, SigningKey, VerifyingKey};
use serde::{Deserialize, Serialize};
use serde_big_array::BigArray;

use crate::MessageError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedDigest {
    #[serde(with = "BigArray")]
    signature: [u8; SIGNATURE_LENGTH],
    message: Vec<u8>,
}

/// Sign `message` (Ed25519, deterministic)
pub fn sign(message: &[u8], key: &SigningKey) -> SignedDigest {
    SignedDigest {
        signature: key.sign(message).to_bytes(),
        message: message.to_vec(),
    }
}

impl SignedDigest {
    /// Return the signed bytes if the signature is valid under `key`
    pub fn open(&self, key: &VerifyingKey) -> Result<&[u8], MessageError> {
        let signature = Signature::from_bytes(&self.signature);
        key.verify_strict(&self.message, &signature)
            .map_err(|_| MessageError::InvalidSignature)?;
        Ok(&self.message)
    }

    #[cfg(test)]
    pub(crate) fn message_mut(&mut self) -> &mut Vec<u8> {
        &mut self.message
    }
}
