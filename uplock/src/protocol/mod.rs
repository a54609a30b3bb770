//! The asset-lock witness protocol.
//!
//! A send attempt moves through `Unsigned -> ProvisionallySigned ->
//! ProofFetched -> Finalized`, or ends `Rejected` at the first failing step:
//!
//! - [`envelope`] parses (and, for signer implementations, embeds) the
//!   `{keyType, pubkey, sig}` envelope held in the provisional witness,
//! - [`pipeline`] holds the typestate transitions that rebuild witness 0 and
//!   the cell dependencies,
//! - [`sender`] wires the pipeline to a proof source, a signer and a
//!   submitter.

pub mod envelope;
pub mod pipeline;
pub mod sender;

pub use envelope::{AuthEnvelope, Credentials, embed_envelope, normalize_recovery_id};
pub use pipeline::{ProofFetched, ProvisionallySigned, SendPhase};
pub use sender::{AssetLockSender, BoxError, TransactionSigner, TxSubmitter};
