//! Server side of the biometric authentication protocol.
//!
//! The server stores, per enrolled identifier, a signature public key and a
//! functional decryption key bound to the client's reference template. An
//! authentication is accepted for evaluation only once its signature has
//! been verified against the enrolled key; the server then recovers the
//! squared Euclidean distance between reference and probe and hands it to
//! the caller. Deciding whether that distance is a match is up to the caller.
use std::fmt;
use std::sync::Arc;

use fe::traits::FEScheme;
use fe::{FeError, Fhipe};
use log::{debug, info, warn};
use messages::{
    AuthenticationMessage, ClientId, EnrollmentMessage, MessageError, RejectReason, Request,
    Response, SignedDigest,
};
use templates::Parameters;
use templates::timing::{Observer, Phase, Silent, measure};
use thiserror::Error;

pub mod database;
pub mod service;

use database::{Database, ServerRecord};

/// Why a request was refused. Carries enough detail for an audit log; the
/// peer only learns the matching [`RejectReason`].
#[derive(Debug, Error)]
pub enum Rejection {
    #[error("malformed request: {0}")]
    Malformed(#[from] MessageError),
    #[error("client {0} is trying to authenticate but is not enrolled")]
    UnknownIdentifier(ClientId),
    #[error("signature of client {0} is invalid")]
    InvalidSignature(ClientId),
    #[error("signature of client {0} is valid for the wrong message")]
    PayloadMismatch(ClientId),
    #[error("unable to recover the distance of client {rid}: {source}")]
    Decryption { rid: ClientId, source: FeError },
}

impl Rejection {
    pub fn reason(&self) -> RejectReason {
        match self {
            Rejection::Malformed(_) => RejectReason::Malformed,
            Rejection::UnknownIdentifier(_) => RejectReason::UnknownIdentifier,
            Rejection::InvalidSignature(_) => RejectReason::InvalidSignature,
            Rejection::PayloadMismatch(_) => RejectReason::PayloadMismatch,
            Rejection::Decryption { .. } => RejectReason::DecryptionFailed,
        }
    }
}

/// Squared Euclidean distance between the enrolled reference and the probe
/// (both shifted by one), as recovered by decryption.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SquaredDistance(i64);

impl SquaredDistance {
    pub fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for SquaredDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub struct Server {
    database: Database,
    scheme: Fhipe,
    parameters: Parameters,
    observer: Arc<dyn Observer>,
}

impl Server {
    /// Create the server and its single scheme handle
    pub fn new(parameters: Parameters) -> Result<Self, FeError> {
        Self::with_observer(parameters, Arc::new(Silent))
    }

    pub fn with_observer(
        parameters: Parameters,
        observer: Arc<dyn Observer>,
    ) -> Result<Self, FeError> {
        let scheme = Fhipe::setup(
            parameters.ipfe_vector_length(),
            parameters.max_value_ipfe() as u64,
        )?;
        Ok(Server {
            database: Database::new(),
            scheme,
            parameters,
            observer,
        })
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Store the keys of a client, replacing any earlier enrolment of the
    /// same identifier
    pub fn enrol(&self, message: EnrollmentMessage) {
        let record = ServerRecord {
            signature_public_key: message.signature_public_key,
            decryption_key: message.decryption_key,
        };
        if self.database.insert(&message.rid, record) {
            warn!("Client {} enrolled again, previous keys replaced", message.rid);
        } else {
            info!("Client {} enrolled", message.rid);
        }
    }

    /// Decode an enrolment message and store it
    pub fn enrol_bytes(&self, bytes: &[u8]) -> Result<(), Rejection> {
        let message: EnrollmentMessage =
            messages::decode(bytes).inspect_err(|e| warn!("Rejected enrolment: {}", e))?;
        self.enrol(message);
        Ok(())
    }

    /// Verify the sender, then recover the squared distance between its
    /// enrolled reference and the encrypted probe
    pub fn authenticate(
        &self,
        message: &AuthenticationMessage,
        signature: &SignedDigest,
    ) -> Result<SquaredDistance, Rejection> {
        self.evaluate(message, signature)
            .inspect(|distance| debug!("Client {} at distance {}", message.rid, distance))
            .inspect_err(|rejection| warn!("Rejected authentication: {}", rejection))
    }

    fn evaluate(
        &self,
        message: &AuthenticationMessage,
        signature: &SignedDigest,
    ) -> Result<SquaredDistance, Rejection> {
        let rid = &message.rid;
        let record = self
            .database
            .get(rid)
            .ok_or_else(|| Rejection::UnknownIdentifier(rid.clone()))?;

        // The digest is taken over our own encoding of what we received
        let digest = message.digest()?;
        let payload = signature
            .open(&record.signature_public_key)
            .map_err(|_| Rejection::InvalidSignature(rid.clone()))?;
        if payload != digest {
            return Err(Rejection::PayloadMismatch(rid.clone()));
        }

        let distance = measure(self.observer.as_ref(), Phase::ServerAuthentication, || {
            self.scheme
                .decrypt(&message.ciphertext, &record.decryption_key)
        })
        .map_err(|source| Rejection::Decryption {
            rid: rid.clone(),
            source,
        })?;

        Ok(SquaredDistance(distance))
    }

    /// Serve one request
    pub fn handle(&self, request: Request) -> Response {
        match request {
            Request::Enrol(message) => {
                self.enrol(message);
                Response::Enrolled
            }
            Request::Authenticate { message, signature } => {
                match self.authenticate(&message, &signature) {
                    Ok(distance) => Response::Distance(distance.value()),
                    Err(rejection) => Response::Rejected(rejection.reason()),
                }
            }
        }
    }

    /// Serve one encoded request
    pub fn handle_frame(&self, frame: &[u8]) -> Response {
        match messages::decode::<Request>(frame) {
            Ok(request) => self.handle(request),
            Err(error) => {
                let rejection = Rejection::from(error);
                warn!("Rejected request: {}", rejection);
                Response::Rejected(rejection.reason())
            }
        }
    }
}
