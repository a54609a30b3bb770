//! Asset-lock witness assembly for username-authenticated CKB transactions.
//!
//! This crate provides the pieces needed to spend cells guarded by the
//! asset-lock script:
//!
//! - a molecule-style binary codec (`molecule`),
//! - the witness structures verified on chain (`schema`),
//! - strongly-typed hashes and the transaction model (`types`),
//! - a client for the asset-lock proof service (`proof_client`),
//! - the two-phase witness protocol and send operation (`protocol`),
//! - the error taxonomy (`error`) and an immutable configuration (`config`).
//!
//! Signing, fee calculation, cell collection and chain RPC stay outside the
//! crate; they plug in through [`TransactionSigner`] and [`TxSubmitter`].
//! Log events are emitted with `tracing`; installing a subscriber is left to
//! the embedding binary.

pub mod config;
pub mod error;
pub mod molecule;
pub mod proof_client;
pub mod protocol;
pub mod schema;
pub mod types;

// Re-export top-level configuration types.
pub use config::{AggregatorConfig, AssetLockConfig, ChainId, ConfigOverrides, UpLockConfig};

// Re-export the error taxonomy.
pub use error::{ErrorCode, UpLockError};

// Re-export the proof client.
pub use proof_client::{AssetLockProof, HttpProofClient, LockInfo, ProofError, ProofSource};

// Re-export the protocol surface.
pub use protocol::{
    AssetLockSender, AuthEnvelope, BoxError, Credentials, ProofFetched, ProvisionallySigned,
    SendPhase, TransactionSigner, TxSubmitter, embed_envelope,
};

// Re-export witness schema types.
pub use schema::{AssetLockWitness, KeyType, Pubkey, RsaPubkey, UserInfo, WitnessArgs};

// Re-export domain types at the crate root for convenience.
pub use types::*;

/// Sender wired to the HTTP proof client.
pub type HttpAssetLockSender<G, S> = AssetLockSender<HttpProofClient, G, S>;
