//! End-to-end send operation over the external collaborators.

use async_trait::async_trait;

use crate::config::UpLockConfig;
use crate::error::{ErrorCode, Result, UpLockError};
use crate::proof_client::ProofSource;
use crate::types::{Hash256, Transaction, UsernameHash};

use super::pipeline::{ProvisionallySigned, SendPhase};

/// Error type returned by collaborator implementations.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// External signer.
///
/// Returns the transaction with the signer's envelope stored as the `lock`
/// of witness 0 (see [`super::embed_envelope`]).
#[async_trait]
pub trait TransactionSigner: Send + Sync {
    async fn sign_transaction(&self, tx: Transaction) -> Result<Transaction, BoxError>;
}

/// External chain submission.
#[async_trait]
pub trait TxSubmitter: Send + Sync {
    async fn submit(&self, tx: &Transaction) -> Result<Hash256, BoxError>;
}

/// Drives one send attempt per call: sign, extract, fetch proof, finalize, submit.
///
/// The sender holds no per-attempt state, so concurrent sends only share the
/// read-only configuration and collaborators.
pub struct AssetLockSender<P, G, S> {
    proofs: P,
    signer: G,
    submitter: S,
    config: UpLockConfig,
}

impl<P, G, S> AssetLockSender<P, G, S>
where
    P: ProofSource,
    G: TransactionSigner,
    S: TxSubmitter,
{
    pub fn new(proofs: P, signer: G, submitter: S, config: UpLockConfig) -> Self {
        Self {
            proofs,
            signer,
            submitter,
            config,
        }
    }

    pub fn config(&self) -> &UpLockConfig {
        &self.config
    }

    /// Signs `tx` and sends it.
    ///
    /// Any cell dependencies the builder added are dropped before signing;
    /// the finalized transaction carries exactly the proof-service
    /// dependencies followed by the asset-lock dependency.
    pub async fn send_transaction(
        &self,
        username: &UsernameHash,
        mut tx: Transaction,
    ) -> Result<Hash256> {
        tx.cell_deps.clear();
        let signed = match self.signer.sign_transaction(tx).await {
            Ok(signed) => signed,
            Err(e) => {
                let err = UpLockError::SigningFailed(e.to_string());
                log_rejection(username, SendPhase::Unsigned, &err);
                return Err(err);
            }
        };
        self.send_signed(username, signed).await
    }

    /// Sends a transaction the caller has already signed.
    pub async fn send_signed(&self, username: &UsernameHash, tx: Transaction) -> Result<Hash256> {
        self.run(username, tx).await.map_err(|(reached, err)| {
            log_rejection(username, reached, &err);
            err
        })
    }

    async fn run(
        &self,
        username: &UsernameHash,
        tx: Transaction,
    ) -> std::result::Result<Hash256, (SendPhase, UpLockError)> {
        let signed = ProvisionallySigned::extract(tx).map_err(|e| (SendPhase::Unsigned, e))?;

        tracing::debug!(username = %username, "fetching asset-lock proof");
        let proof = self
            .proofs
            .fetch_asset_lock_proof(username)
            .await
            .map_err(|e| (SendPhase::ProvisionallySigned, UpLockError::from(e)))?;
        tracing::info!(
            username = %username,
            cell_deps = proof.cell_deps.len(),
            smt_proof_len = proof.user_info_smt_proof.len(),
            "asset-lock proof fetched"
        );

        let fetched = signed
            .attach_proof(username, proof)
            .map_err(|e| (SendPhase::ProvisionallySigned, e))?;
        let finalized = fetched
            .finalize(&self.config.asset_lock)
            .map_err(|e| (SendPhase::ProofFetched, e))?;

        let tx_hash = self.submitter.submit(&finalized).await.map_err(|e| {
            (
                SendPhase::Finalized,
                UpLockError::SubmissionFailed(e.to_string()),
            )
        })?;
        tracing::info!(username = %username, tx_hash = %tx_hash, "transaction submitted");
        Ok(tx_hash)
    }
}

fn log_rejection(username: &UsernameHash, reached: SendPhase, err: &UpLockError) {
    tracing::warn!(
        username = %username,
        phase = %SendPhase::Rejected,
        reached = %reached,
        code = err.code(),
        error = %err,
        "send attempt rejected"
    );
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::proof_client::{AssetLockProof, LockInfo, ProofError};
    use crate::protocol::envelope::AuthEnvelope;
    use crate::protocol::embed_envelope;
    use crate::schema::KeyType;
    use crate::types::JsonBytes;

    struct FixedProof(Result<AssetLockProof, ProofError>);

    #[async_trait]
    impl ProofSource for FixedProof {
        async fn fetch_asset_lock_proof(
            &self,
            _username: &UsernameHash,
        ) -> Result<AssetLockProof, ProofError> {
            self.0.clone()
        }
    }

    struct K1Signer;

    #[async_trait]
    impl TransactionSigner for K1Signer {
        async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, BoxError> {
            let envelope = AuthEnvelope {
                key_type: KeyType::Secp256k1Pubkey,
                pubkey: JsonBytes(vec![0x08; 20]),
                sig: JsonBytes(vec![0x5A; 65]),
            };
            embed_envelope(&mut tx, &envelope.to_hex()?)?;
            Ok(tx)
        }
    }

    struct FailingSigner;

    #[async_trait]
    impl TransactionSigner for FailingSigner {
        async fn sign_transaction(&self, _tx: Transaction) -> Result<Transaction, BoxError> {
            Err("user cancelled".into())
        }
    }

    #[derive(Default)]
    struct RecordingSubmitter {
        accept: bool,
        seen: Mutex<Vec<Transaction>>,
    }

    #[async_trait]
    impl TxSubmitter for RecordingSubmitter {
        async fn submit(&self, tx: &Transaction) -> Result<Hash256, BoxError> {
            self.seen.lock().unwrap().push(tx.clone());
            if self.accept {
                Ok(Hash256([0xEE; 32]))
            } else {
                Err("PoolRejectedTransactionByMinFeeRate".into())
            }
        }
    }

    fn registered() -> FixedProof {
        FixedProof(Ok(AssetLockProof {
            cell_deps: Vec::new(),
            lock_info: vec![LockInfo {
                user_info: vec![1, 2, 3],
                username: "upckbtest".into(),
            }],
            user_info_smt_proof: vec![4, 5],
        }))
    }

    fn sender<P: ProofSource, G: TransactionSigner>(
        proofs: P,
        signer: G,
        accept: bool,
    ) -> AssetLockSender<P, G, RecordingSubmitter> {
        let submitter = RecordingSubmitter {
            accept,
            ..RecordingSubmitter::default()
        };
        AssetLockSender::new(proofs, signer, submitter, UpLockConfig::default())
    }

    #[tokio::test]
    async fn speculative_cell_deps_are_replaced() {
        let sender = sender(registered(), K1Signer, true);
        let mut tx = Transaction::default();
        tx.cell_deps.push(sender.config().asset_lock.cell_dep.clone());
        tx.cell_deps.push(sender.config().asset_lock.cell_dep.clone());

        let hash = sender
            .send_transaction(&UsernameHash::from_username("upckbtest"), tx)
            .await
            .unwrap();
        assert_eq!(hash, Hash256([0xEE; 32]));

        let seen = sender.submitter.seen.lock().unwrap();
        assert_eq!(seen[0].cell_deps, vec![sender.config().asset_lock.cell_dep.clone()]);
    }

    #[tokio::test]
    async fn signer_failure_is_signing_failed() {
        let sender = sender(registered(), FailingSigner, true);
        let err = sender
            .send_transaction(&UsernameHash::from_username("upckbtest"), Transaction::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SIGNING_FAILED");
        assert!(sender.submitter.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn proof_service_outage_aborts_before_submission() {
        let down = FixedProof(Err(ProofError::ServiceUnavailable("timed out".into())));
        let sender = sender(down, K1Signer, true);
        let err = sender
            .send_transaction(&UsernameHash::from_username("upckbtest"), Transaction::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SERVICE_UNAVAILABLE");
        assert!(sender.submitter.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn chain_rejection_is_submission_failed() {
        let sender = sender(registered(), K1Signer, false);
        let err = sender
            .send_transaction(&UsernameHash::from_username("upckbtest"), Transaction::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "SUBMISSION_FAILED");
        assert!(err.to_string().contains("MinFeeRate"));
    }

    #[tokio::test]
    async fn unsigned_transaction_is_missing_signature() {
        let sender = sender(registered(), K1Signer, true);
        let err = sender
            .send_signed(&UsernameHash::from_username("upckbtest"), Transaction::default())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MISSING_SIGNATURE");
    }
}
