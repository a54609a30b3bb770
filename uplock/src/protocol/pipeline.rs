//! Typestate pipeline from a provisionally-signed transaction to a finalized one.
//!
//! ```text
//! Transaction --extract--> ProvisionallySigned --attach_proof--> ProofFetched --finalize--> Transaction
//! ```
//!
//! Every transition consumes its input. On error the transaction owned by
//! the failed stage is dropped, so a rejected attempt never yields a
//! partially-patched transaction.

use std::fmt;

use crate::config::AssetLockConfig;
use crate::error::{Result, UpLockError};
use crate::molecule::{Byte32, Entity};
use crate::proof_client::AssetLockProof;
use crate::schema::{AssetLockWitness, WitnessArgsReader};
use crate::types::{CellDep, JsonBytes, Transaction, UsernameHash};

use super::envelope::{AuthEnvelope, Credentials};

/// States of a single send attempt, used in log events.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum SendPhase {
    Unsigned,
    ProvisionallySigned,
    ProofFetched,
    Finalized,
    Rejected,
}

impl SendPhase {
    pub const fn as_str(self) -> &'static str {
        match self {
            SendPhase::Unsigned => "unsigned",
            SendPhase::ProvisionallySigned => "provisionally_signed",
            SendPhase::ProofFetched => "proof_fetched",
            SendPhase::Finalized => "finalized",
            SendPhase::Rejected => "rejected",
        }
    }
}

impl fmt::Display for SendPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A transaction whose first witness carries a signer envelope, with the
/// envelope already decoded.
#[derive(Clone, Debug)]
pub struct ProvisionallySigned {
    tx: Transaction,
    credentials: Credentials,
}

impl ProvisionallySigned {
    /// Decodes witness 0 as `WitnessArgs` and parses its `lock` as an envelope.
    pub fn extract(tx: Transaction) -> Result<Self> {
        let witness = tx.first_witness().ok_or(UpLockError::MissingSignature)?;
        tracing::debug!(witness_len = witness.len(), "decoding provisional witness");

        let args = WitnessArgsReader::from_slice(witness, false)?;
        let lock = args.lock()?.ok_or(UpLockError::MissingSignature)?;
        let credentials = AuthEnvelope::from_lock(lock)?.into_credentials()?;

        tracing::debug!(
            key_type = %credentials.pubkey.key_type(),
            sig_len = credentials.sig.len(),
            "extracted signer credentials"
        );
        Ok(Self { tx, credentials })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    /// Binds the proof fetched for `username`.
    ///
    /// Fails with [`UpLockError::UnregisteredUser`] when the proof carries no
    /// user info.
    pub fn attach_proof(self, username: &UsernameHash, proof: AssetLockProof) -> Result<ProofFetched> {
        let user_info = proof
            .user_info()
            .ok_or_else(|| UpLockError::UnregisteredUser(username.to_hex()))?
            .to_vec();

        Ok(ProofFetched {
            tx: self.tx,
            credentials: self.credentials,
            username: *username,
            user_info,
            cell_deps: proof.cell_deps,
            user_info_smt_proof: proof.user_info_smt_proof,
        })
    }
}

/// A provisionally-signed transaction together with a registered user's proof.
#[derive(Clone, Debug)]
pub struct ProofFetched {
    tx: Transaction,
    credentials: Credentials,
    username: UsernameHash,
    user_info: Vec<u8>,
    cell_deps: Vec<CellDep>,
    user_info_smt_proof: Vec<u8>,
}

impl ProofFetched {
    /// The asset-lock witness this stage will write into `lock`.
    pub fn witness(&self) -> AssetLockWitness {
        AssetLockWitness::new(
            self.credentials.pubkey.clone(),
            self.credentials.sig.clone(),
            Byte32::from(*self.username.as_hash().as_bytes()),
            self.user_info.clone(),
            self.user_info_smt_proof.clone(),
        )
    }

    /// Writes the asset-lock witness and appends the dependencies.
    ///
    /// Only the `lock` of witness 0 changes; `input_type` and `output_type`
    /// keep their original bytes. The proof-service dependencies come first,
    /// followed by the configured asset-lock dependency.
    pub fn finalize(self, asset_lock: &AssetLockConfig) -> Result<Transaction> {
        let witness_lock = self.witness().to_molecule();
        let ProofFetched {
            mut tx, cell_deps, ..
        } = self;

        let slot = tx
            .witnesses
            .first_mut()
            .ok_or(UpLockError::MissingSignature)?;
        let patched = WitnessArgsReader::from_slice(slot.as_bytes(), false)?
            .with_lock(Some(&witness_lock));
        *slot = JsonBytes(patched);

        tx.cell_deps.extend(cell_deps);
        tx.cell_deps.push(asset_lock.cell_dep.clone());

        tracing::info!(
            witness_lock_len = witness_lock.len(),
            cell_deps = tx.cell_deps.len(),
            "asset-lock witness finalized"
        );
        Ok(tx)
    }
}
