// uplock/tests/send_flow.rs

//! End-to-end send flow against an in-process aggregator.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Json, Router, routing::post};
use serde_json::{Value, json};

use uplock::molecule::{Byte20, Byte32, Entity};
use uplock::schema::{AssetLockWitnessReader, WitnessArgsReader};
use uplock::{
    AssetLockProof, AssetLockSender, AuthEnvelope, BoxError, CellDep, DepType, ErrorCode,
    HttpProofClient, JsonBytes, KeyType, ProofError, ProofSource, Pubkey, Transaction,
    TransactionSigner, TxSubmitter, UpLockConfig, UserInfo, UsernameHash, WitnessArgs,
    embed_envelope,
};

const USERNAME: &str = "upckbtest";

fn sample_user_info() -> Vec<u8> {
    UserInfo {
        register_email: Byte32::from([0x11; 32]),
        local_keys: vec![Pubkey::Secp256k1(Byte20::from([0x08; 20]))],
        quick_login: 0,
        recovery_email: None,
        pending_state: None,
        nonce: 1,
        source: b"unipass".to_vec(),
    }
    .to_molecule()
}

fn signer_sig() -> Vec<u8> {
    let mut sig: Vec<u8> = (0u8..65).collect();
    sig[64] = 28;
    sig
}

struct K1Signer;

#[async_trait]
impl TransactionSigner for K1Signer {
    async fn sign_transaction(&self, mut tx: Transaction) -> Result<Transaction, BoxError> {
        let envelope = AuthEnvelope {
            key_type: KeyType::Secp256k1Pubkey,
            pubkey: JsonBytes(vec![0x08; 20]),
            sig: JsonBytes(signer_sig()),
        };
        embed_envelope(&mut tx, &envelope.to_hex()?)?;
        Ok(tx)
    }
}

#[derive(Clone, Default)]
struct RecordingSubmitter {
    seen: Arc<Mutex<Vec<Transaction>>>,
}

#[async_trait]
impl TxSubmitter for RecordingSubmitter {
    async fn submit(&self, tx: &Transaction) -> Result<uplock::Hash256, BoxError> {
        self.seen.lock().unwrap().push(tx.clone());
        Ok(uplock::Hash256::sha256(&serde_json::to_vec(tx)?))
    }
}

/// Proof source that answers with an unregistered user.
struct Unregistered;

#[async_trait]
impl ProofSource for Unregistered {
    async fn fetch_asset_lock_proof(
        &self,
        _username: &UsernameHash,
    ) -> Result<AssetLockProof, ProofError> {
        Ok(AssetLockProof {
            cell_deps: Vec::new(),
            lock_info: vec![uplock::LockInfo {
                user_info: Vec::new(),
                username: USERNAME.to_string(),
            }],
            user_info_smt_proof: vec![0x01],
        })
    }
}

fn fetched_dep_json() -> Value {
    json!({
        "dep_type": "code",
        "out_point": { "tx_hash": format!("0x{}", "c0".repeat(32)), "index": "0x2" }
    })
}

async fn spawn_aggregator() -> String {
    let user_info = format!("0x{}", hex::encode(sample_user_info()));
    let app = Router::new().route(
        "/",
        post(move |Json(req): Json<Value>| {
            let user_info = user_info.clone();
            async move {
                Json(json!({
                    "jsonrpc": "2.0",
                    "id": req["id"],
                    "result": {
                        "cell_deps": [fetched_dep_json()],
                        "lock_info": [{ "user_info": user_info, "username": req["params"][0] }],
                        "user_info_smt_proof": "0x4c4f4c4f"
                    }
                }))
            }
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn placeholder_tx() -> Transaction {
    let placeholder = WitnessArgs {
        lock: Some(vec![0u8; 85]),
        input_type: Some(b"input-type".to_vec()),
        output_type: Some(b"output-type".to_vec()),
    };
    Transaction {
        witnesses: vec![JsonBytes(placeholder.to_molecule())],
        ..Transaction::default()
    }
}

#[tokio::test]
async fn registered_user_transaction_is_finalized_and_submitted() {
    let url = spawn_aggregator().await;
    let config = UpLockConfig::default().with_overrides(uplock::ConfigOverrides {
        aggregator_url: Some(url),
        ..Default::default()
    });
    let proofs = HttpProofClient::from_config(&config.aggregator).unwrap();
    let submitter = RecordingSubmitter::default();
    let sender = AssetLockSender::new(proofs, K1Signer, submitter.clone(), config);

    let username = UsernameHash::from_username(USERNAME);
    let mut tx = placeholder_tx();
    tx.cell_deps.push(sender.config().asset_lock.cell_dep.clone());

    let tx_hash = sender.send_transaction(&username, tx).await.unwrap();

    let submitted = submitter.seen.lock().unwrap()[0].clone();
    assert_eq!(
        tx_hash,
        uplock::Hash256::sha256(&serde_json::to_vec(&submitted).unwrap())
    );

    let fetched_dep: CellDep = serde_json::from_value(fetched_dep_json()).unwrap();
    assert_eq!(fetched_dep.dep_type, DepType::Code);
    assert_eq!(
        submitted.cell_deps,
        vec![fetched_dep, sender.config().asset_lock.cell_dep.clone()]
    );

    let args = WitnessArgsReader::from_slice(submitted.first_witness().unwrap(), false).unwrap();
    assert_eq!(args.input_type().unwrap(), Some(&b"input-type"[..]));
    assert_eq!(args.output_type().unwrap(), Some(&b"output-type"[..]));

    let witness = AssetLockWitnessReader::from_slice(args.lock().unwrap().unwrap(), false).unwrap();
    witness.verify().unwrap();

    let mut expected_sig = signer_sig();
    expected_sig[64] = 1;
    assert_eq!(witness.sig().unwrap(), expected_sig.as_slice());
    assert_eq!(
        witness.username().unwrap().as_bytes(),
        username.as_hash().as_bytes()
    );
    assert_eq!(
        witness.pubkey().unwrap(),
        Pubkey::Secp256k1(Byte20::from([0x08; 20]))
    );
    assert_eq!(witness.user_info(), sample_user_info().as_slice());
    assert_eq!(witness.user_info_smt_proof().unwrap(), b"LOLO");
}

#[tokio::test]
async fn unregistered_user_is_rejected_without_submission() {
    let submitter = RecordingSubmitter::default();
    let sender = AssetLockSender::new(
        Unregistered,
        K1Signer,
        submitter.clone(),
        UpLockConfig::default(),
    );

    let err = sender
        .send_transaction(&UsernameHash::from_username(USERNAME), placeholder_tx())
        .await
        .unwrap_err();

    assert_eq!(err.code(), "UNREGISTERED_USER");
    assert!(submitter.seen.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_aggregator_is_service_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let config = UpLockConfig::default()
        .from_json_overrides(&json!({ "aggregatorUrl": url, "timeoutMs": 500 }).to_string())
        .unwrap();
    let proofs = HttpProofClient::from_config(&config.aggregator).unwrap();
    let sender = AssetLockSender::new(proofs, K1Signer, RecordingSubmitter::default(), config);

    let err = sender
        .send_transaction(&UsernameHash::from_username(USERNAME), placeholder_tx())
        .await
        .unwrap_err();
    assert_eq!(err.code(), "SERVICE_UNAVAILABLE");
}
