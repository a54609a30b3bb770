//! JSON-RPC proof client.
//!
//! The aggregator is queried with a single JSON-RPC call:
//!
//! ```json
//! POST <url>
//! {
//!   "jsonrpc": "2.0",
//!   "method": "get_asset_lock_tx_info",
//!   "params": ["0x<sha256(username)>"],
//!   "id": "1"
//! }
//!
//! Response:
//! {
//!   "jsonrpc": "2.0",
//!   "id": "1",
//!   "result": {
//!     "cell_deps": [{ "dep_type": "code", "out_point": { "tx_hash": "0x..", "index": "0x0" } }],
//!     "lock_info": [{ "user_info": "0x..", "username": "0x.." }],
//!     "user_info_smt_proof": "0x.."
//!   }
//! }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use super::{AssetLockProof, LockInfo, ProofError, ProofSource};
use crate::config::AggregatorConfig;
use crate::types::{CellDep, JsonBytes, UsernameHash};

/// HTTP client for the aggregator's JSON-RPC endpoint.
///
/// Cheap to share behind an `Arc`; the underlying `reqwest::Client` pools
/// connections internally.
pub struct HttpProofClient {
    url: String,
    method: String,
    client: Client,
}

impl HttpProofClient {
    pub fn new(
        url: impl Into<String>,
        method: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProofError> {
        let client = Client::builder().timeout(timeout).build().map_err(|e| {
            ProofError::ServiceUnavailable(format!("failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            url: url.into(),
            method: method.into(),
            client,
        })
    }

    pub fn from_config(cfg: &AggregatorConfig) -> Result<Self, ProofError> {
        Self::new(cfg.url.clone(), cfg.rpc_method.clone(), cfg.timeout)
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[derive(Debug, Serialize)]
struct RpcRequest<'a> {
    jsonrpc: &'static str,
    method: &'a str,
    params: [String; 1],
    id: &'static str,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<ProofResult>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Debug, Deserialize)]
struct ProofResult {
    cell_deps: Vec<CellDep>,
    lock_info: Vec<LockInfoDto>,
    user_info_smt_proof: JsonBytes,
}

#[derive(Debug, Deserialize)]
struct LockInfoDto {
    user_info: JsonBytes,
    username: String,
}

/// Maps a raw response body onto an [`AssetLockProof`].
fn parse_proof_response(body: &str) -> Result<AssetLockProof, ProofError> {
    let resp: RpcResponse = serde_json::from_str(body)
        .map_err(|e| ProofError::InvalidResponse(format!("failed to parse JSON response: {e}")))?;

    if let Some(err) = resp.error {
        return Err(ProofError::ServiceUnavailable(format!(
            "aggregator returned error {}: {}",
            err.code, err.message
        )));
    }

    let result = resp
        .result
        .ok_or_else(|| ProofError::InvalidResponse("response has no result".to_string()))?;

    Ok(AssetLockProof {
        cell_deps: result.cell_deps,
        lock_info: result
            .lock_info
            .into_iter()
            .map(|info| LockInfo {
                user_info: info.user_info.into_bytes(),
                username: info.username,
            })
            .collect(),
        user_info_smt_proof: result.user_info_smt_proof.into_bytes(),
    })
}

#[async_trait]
impl ProofSource for HttpProofClient {
    async fn fetch_asset_lock_proof(
        &self,
        username: &UsernameHash,
    ) -> Result<AssetLockProof, ProofError> {
        let req_body = RpcRequest {
            jsonrpc: "2.0",
            method: &self.method,
            params: [username.to_hex()],
            id: "1",
        };
        tracing::debug!(url = %self.url, method = %self.method, username = %username, "requesting asset-lock proof");

        let resp = self
            .client
            .post(&self.url)
            .json(&req_body)
            .send()
            .await
            .map_err(|e| {
                ProofError::ServiceUnavailable(format!("HTTP POST {} failed: {e}", self.url))
            })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ProofError::ServiceUnavailable(format!(
                "aggregator returned HTTP status {status}"
            )));
        }

        let body = resp.text().await.map_err(|e| {
            ProofError::ServiceUnavailable(format!("failed to read response body: {e}"))
        })?;

        parse_proof_response(&body)
    }
}
