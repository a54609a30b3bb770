//! Clients for the asset-lock proof (aggregator) service.
//!
//! The service attests, per username hash, the user's current encoded state
//! together with an SMT proof of it, and names the cell dependencies a
//! transaction needs for the lock script to check that proof.

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{CellDep, UsernameHash};

pub mod http;

pub use http::HttpProofClient;

/// One registered identity as reported by the proof service.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LockInfo {
    /// Molecule-encoded `UserInfo`; empty when the username is unregistered.
    pub user_info: Vec<u8>,
    pub username: String,
}

/// Everything needed to finalize one asset-lock witness.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetLockProof {
    pub cell_deps: Vec<CellDep>,
    pub lock_info: Vec<LockInfo>,
    pub user_info_smt_proof: Vec<u8>,
}

impl AssetLockProof {
    /// The user-info blob the witness embeds: that of the first `lock_info`
    /// entry. `None` when the service reported no registered user.
    pub fn user_info(&self) -> Option<&[u8]> {
        self.lock_info
            .first()
            .map(|info| info.user_info.as_slice())
            .filter(|blob| !blob.is_empty())
    }
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ProofError {
    /// Transport failure, timeout, non-success HTTP status or JSON-RPC error.
    #[error("{0}")]
    ServiceUnavailable(String),
    /// The service answered with a payload of the wrong shape.
    #[error("{0}")]
    InvalidResponse(String),
}

/// Source of asset-lock proofs.
///
/// Implementations perform a single lookup per call and never retry.
#[async_trait]
pub trait ProofSource: Send + Sync {
    async fn fetch_asset_lock_proof(
        &self,
        username: &UsernameHash,
    ) -> Result<AssetLockProof, ProofError>;
}
