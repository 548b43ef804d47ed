//! Messages exchanged between a biometric client and the authentication
//! server, and the canonical byte encoding they are signed and sent in.
use std::fmt;

use ed25519_dalek::VerifyingKey;
use fe::{Ciphertext, DerivedKey};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use sha3::Shake256;
use sha3::digest::{ExtendableOutput, Update, XofReader};
use thiserror::Error;

pub mod signature;
pub use signature::{SignedDigest, sign};

/// Length of the SHAKE256 output that gets signed
pub const DIGEST_LENGTH: usize = 64;

pub type Digest = [u8; DIGEST_LENGTH];

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("unable to encode message: {0}")]
    Encode(#[source] postcard::Error),
    #[error("unable to decode message: {0}")]
    Decode(#[source] postcard::Error),
    #[error("{0} trailing bytes after message")]
    TrailingBytes(usize),
    #[error("signature invalid")]
    InvalidSignature,
}

/// Random client identifier.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(Vec<u8>);

impl ClientId {
    pub fn new(bytes: Vec<u8>) -> Self {
        ClientId(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering, two characters per byte
    pub fn to_hex(&self) -> String {
        hex::encode(&self.0)
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ClientId({})", self.to_hex())
    }
}

/*
    Messages from a client to the server
*/
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentMessage {
    pub rid: ClientId,
    pub signature_public_key: VerifyingKey,
    pub decryption_key: DerivedKey,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticationMessage {
    pub rid: ClientId,
    pub ciphertext: Ciphertext,
}

impl AuthenticationMessage {
    /// SHAKE256 of the canonical encoding. Sender and verifier must both
    /// hash the encoding, never the structured fields.
    pub fn digest(&self) -> Result<Digest, MessageError> {
        let encoded = encode(self)?;
        let mut hasher = Shake256::default();
        hasher.update(&encoded);

        let mut digest = [0u8; DIGEST_LENGTH];
        hasher.finalize_xof().read(&mut digest);
        Ok(digest)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Request {
    Enrol(EnrollmentMessage),
    Authenticate {
        message: AuthenticationMessage,
        signature: SignedDigest,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    Malformed,
    UnknownIdentifier,
    InvalidSignature,
    PayloadMismatch,
    DecryptionFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Response {
    Enrolled,
    /// Raw squared distance recovered by the server
    Distance(i64),
    Rejected(RejectReason),
}

/// Canonical encoding: postcard, fields in declaration order, lengths as
/// varints, group elements compressed.
pub fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>, MessageError> {
    postcard::to_stdvec(value).map_err(MessageError::Encode)
}

/// Inverse of [`encode`]; the whole input must be consumed.
pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, MessageError> {
    let (value, rest) = postcard::take_from_bytes(bytes).map_err(MessageError::Decode)?;
    if !rest.is_empty() {
        return Err(MessageError::TrailingBytes(rest.len()));
    }
    Ok(value)
}
