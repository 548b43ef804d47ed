use std::sync::Arc;

use fe::traits::FEScheme;
use fe::{FeError, Fhipe, MasterKey};
use log::{debug, info};
use messages::{
    AuthenticationMessage, ClientId, EnrollmentMessage, MessageError, SignedDigest, sign,
};
use rand::{CryptoRng, RngCore};
use templates::timing::{Observer, Phase, Silent, measure};
use templates::{Encoding, Parameters, TemplateError, encode};
use thiserror::Error;

use crate::identity::{ClientIdentity, IdentityError};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid template: {0}")]
    Template(#[from] TemplateError),
    #[error("parameters exceed the scheme limits: {0}")]
    Parameters(#[source] FeError),
    #[error(transparent)]
    Identity(#[from] IdentityError),
    #[error("functional encryption failed: {0}")]
    Scheme(#[from] FeError),
    #[error(transparent)]
    Message(#[from] MessageError),
}

/// An enrolled client. The only way to obtain one is [`Client::enrol`], so
/// authenticating before enrolment cannot be expressed.
pub struct Client {
    identity: ClientIdentity,
    scheme: Fhipe,
    master_key: MasterKey,
    parameters: Parameters,
    observer: Arc<dyn Observer>,
}

impl Client {
    /// Enrol a reference template and return the message for the server
    pub fn enrol<R: RngCore + CryptoRng + ?Sized>(
        parameters: Parameters,
        reference_template: &[i64],
        rng: &mut R,
    ) -> Result<(Self, EnrollmentMessage), ClientError> {
        Self::enrol_observed(parameters, reference_template, rng, Arc::new(Silent))
    }

    /// Same as [`Client::enrol`], reporting the functional encryption
    /// sections of this client to `observer`
    pub fn enrol_observed<R: RngCore + CryptoRng + ?Sized>(
        parameters: Parameters,
        reference_template: &[i64],
        rng: &mut R,
        observer: Arc<dyn Observer>,
    ) -> Result<(Self, EnrollmentMessage), ClientError> {
        // Configuration errors surface before any cryptographic call
        let template = parameters.template(reference_template.to_vec())?;
        let encoded = encode(&template, Encoding::Reference);

        let scheme = Fhipe::setup(encoded.len(), parameters.max_value_ipfe() as u64)
            .map_err(ClientError::Parameters)?;

        let identity = ClientIdentity::generate(parameters.security_parameter(), rng)?;
        info!("Enrolling client {}", identity.rid());

        let (master_key, decryption_key) =
            measure(observer.as_ref(), Phase::ClientEnrolment, || {
                let master_key = scheme.generate_master_key(rng);
                let decryption_key = scheme.derive_key(rng, encoded.as_slice(), &master_key)?;
                Ok::<_, FeError>((master_key, decryption_key))
            })?;

        let message = EnrollmentMessage {
            rid: identity.rid().clone(),
            signature_public_key: identity.verifying_key(),
            decryption_key,
        };

        let client = Client {
            identity,
            scheme,
            master_key,
            parameters,
            observer,
        };
        Ok((client, message))
    }

    /// Encrypt a probe template and sign the digest of the resulting message
    pub fn authenticate<R: RngCore + CryptoRng + ?Sized>(
        &self,
        probe_template: &[i64],
        rng: &mut R,
    ) -> Result<(AuthenticationMessage, SignedDigest), ClientError> {
        let template = self.parameters.template(probe_template.to_vec())?;
        let encoded = encode(&template, Encoding::Probe);

        let ciphertext = measure(self.observer.as_ref(), Phase::ClientAuthentication, || {
            self.scheme
                .encrypt(rng, encoded.as_slice(), &self.master_key)
        })?;

        let message = AuthenticationMessage {
            rid: self.identity.rid().clone(),
            ciphertext,
        };
        let signature = sign(&message.digest()?, self.identity.signing_key());
        debug!("Signed authentication message of client {}", self.rid());

        Ok((message, signature))
    }

    pub fn rid(&self) -> &ClientId {
        self.identity.rid()
    }

    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }
}
