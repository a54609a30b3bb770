//! Crate-level error taxonomy.

use thiserror::Error;

use crate::molecule::MoleculeError;
use crate::proof_client::ProofError;

/// Stable, machine-readable identifier for an error kind.
pub trait ErrorCode {
    fn code(&self) -> &'static str;
}

/// Why a send attempt was rejected.
///
/// Every variant is terminal for the attempt that produced it. Nothing is
/// retried internally and no partially-built transaction is handed back.
#[derive(Debug, Error)]
pub enum UpLockError {
    /// A witness or nested structure violated the binary encoding.
    #[error("malformed witness data: {0}")]
    MalformedData(#[from] MoleculeError),

    /// The provisional witness carries no lock payload.
    #[error("provisional witness has no signature")]
    MissingSignature,

    /// The proof service has no user info for the username hash.
    #[error("username {0} is not registered")]
    UnregisteredUser(String),

    #[error("proof service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("invalid proof service response: {0}")]
    InvalidResponse(String),

    /// The chain (or the submission collaborator) refused the finalized transaction.
    #[error("transaction submission failed: {0}")]
    SubmissionFailed(String),

    /// The signer envelope could not be decoded.
    #[error("invalid signature envelope: {0}")]
    InvalidEnvelope(String),

    #[error("key type {0} is not supported by the asset lock")]
    UnsupportedKeyType(String),

    /// The external signer failed before producing an envelope.
    #[error("signing failed: {0}")]
    SigningFailed(String),
}

impl ErrorCode for UpLockError {
    fn code(&self) -> &'static str {
        match self {
            UpLockError::MalformedData(_) => "MALFORMED_DATA",
            UpLockError::MissingSignature => "MISSING_SIGNATURE",
            UpLockError::UnregisteredUser(_) => "UNREGISTERED_USER",
            UpLockError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            UpLockError::InvalidResponse(_) => "INVALID_RESPONSE",
            UpLockError::SubmissionFailed(_) => "SUBMISSION_FAILED",
            UpLockError::InvalidEnvelope(_) => "INVALID_ENVELOPE",
            UpLockError::UnsupportedKeyType(_) => "UNSUPPORTED_KEY_TYPE",
            UpLockError::SigningFailed(_) => "SIGNING_FAILED",
        }
    }
}

impl From<ProofError> for UpLockError {
    fn from(err: ProofError) -> Self {
        match err {
            ProofError::ServiceUnavailable(msg) => UpLockError::ServiceUnavailable(msg),
            ProofError::InvalidResponse(msg) => UpLockError::InvalidResponse(msg),
        }
    }
}

pub type Result<T, E = UpLockError> = std::result::Result<T, E>;
