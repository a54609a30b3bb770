//! Top-level configuration for asset-lock sends.
//!
//! This module aggregates configuration for:
//!
//! - the proof (aggregator) service (`AggregatorConfig`),
//! - the asset-lock script and its static cell dependency (`AssetLockConfig`),
//! - chain endpoints handed through to submission and collection tooling.
//!
//! An [`UpLockConfig`] is an immutable value. Reconfiguration produces a new
//! value via [`UpLockConfig::with_overrides`]; nothing in the crate holds
//! process-wide mutable settings.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::{
    CellDep, DepType, Hash256, JsonBytes, OutPoint, Script, ScriptHashType, UsernameHash,
};

/// Code hash of the asset-lock script deployed on testnet.
pub const TESTNET_ASSET_LOCK_CODE_HASH: Hash256 = Hash256([
    0xd3, 0xf6, 0xd1, 0x2a, 0xc2, 0x20, 0xb3, 0xf7, 0xe1, 0x04, 0xf3, 0x86, 0x9e, 0x72, 0x48,
    0x7f, 0x89, 0x40, 0xad, 0xb1, 0x3a, 0x52, 0x6a, 0x2a, 0xbd, 0x77, 0x5c, 0x2c, 0xd5, 0x04,
    0x0f, 0x77,
]);

/// Transaction holding the testnet asset-lock binary.
pub const TESTNET_ASSET_LOCK_DEP_TX: Hash256 = Hash256([
    0xf4, 0xa9, 0xd9, 0x5b, 0x5d, 0xf4, 0x8f, 0x9e, 0xd8, 0x78, 0xeb, 0xcb, 0x23, 0xb3, 0x55,
    0x8b, 0x6d, 0x8e, 0xd1, 0x1e, 0xcd, 0x7c, 0x26, 0xe0, 0xfd, 0x1b, 0x55, 0x77, 0x8f, 0x8b,
    0xed, 0xc6,
]);

/// JSON-RPC method the aggregator serves asset-lock proofs under.
pub const DEFAULT_RPC_METHOD: &str = "get_asset_lock_tx_info";

/// Network the configured endpoints belong to.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainId {
    Mainnet,
    #[default]
    Testnet,
    Dev,
}

/// Configuration for the proof (aggregator) client.
#[derive(Clone, Debug)]
pub struct AggregatorConfig {
    /// JSON-RPC endpoint, e.g. `"http://127.0.0.1:3030"`.
    pub url: String,
    /// Method name sent in every request.
    pub rpc_method: String,
    /// Request timeout for proof fetches.
    pub timeout: Duration,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:3030".to_string(),
            rpc_method: DEFAULT_RPC_METHOD.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

/// The asset-lock script and the dependency that provides its code.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetLockConfig {
    pub code_hash: Hash256,
    pub hash_type: ScriptHashType,
    /// Appended after the proof-service dependencies on every finalized transaction.
    pub cell_dep: CellDep,
}

impl AssetLockConfig {
    /// Lock script guarding a user's cells: the configured code hash with the
    /// first 20 bytes of the username hash as args.
    pub fn lock_script_for(&self, username: &UsernameHash) -> Script {
        Script {
            code_hash: self.code_hash,
            hash_type: self.hash_type,
            args: JsonBytes(username.lock_args().to_vec()),
        }
    }
}

impl Default for AssetLockConfig {
    fn default() -> Self {
        Self {
            code_hash: TESTNET_ASSET_LOCK_CODE_HASH,
            hash_type: ScriptHashType::Type,
            cell_dep: CellDep::new(OutPoint::new(TESTNET_ASSET_LOCK_DEP_TX, 0), DepType::Code),
        }
    }
}

/// Top-level configuration.
///
/// `ckb_node_url`, `ckb_indexer_url` and `chain_id` are not used by the
/// witness protocol itself; they are carried for the submission and cell
/// collection collaborators.
#[derive(Clone, Debug)]
pub struct UpLockConfig {
    pub aggregator: AggregatorConfig,
    pub asset_lock: AssetLockConfig,
    pub ckb_node_url: String,
    pub ckb_indexer_url: String,
    pub chain_id: ChainId,
}

impl Default for UpLockConfig {
    fn default() -> Self {
        Self {
            aggregator: AggregatorConfig::default(),
            asset_lock: AssetLockConfig::default(),
            ckb_node_url: "https://testnet.ckb.dev".to_string(),
            ckb_indexer_url: "https://testnet.ckb.dev/indexer".to_string(),
            chain_id: ChainId::Testnet,
        }
    }
}

/// Partial configuration. Every field left unset keeps its current value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigOverrides {
    pub aggregator_url: Option<String>,
    pub rpc_method: Option<String>,
    pub timeout_ms: Option<u64>,
    pub chain_id: Option<ChainId>,
    pub ckb_node_url: Option<String>,
    pub ckb_indexer_url: Option<String>,
    pub up_lock_code_hash: Option<Hash256>,
    pub up_lock_hash_type: Option<ScriptHashType>,
    pub up_lock_dep: Option<CellDep>,
}

impl UpLockConfig {
    /// Returns a copy of `self` with every set override applied.
    pub fn with_overrides(&self, overrides: ConfigOverrides) -> Self {
        let mut next = self.clone();
        if let Some(url) = overrides.aggregator_url {
            next.aggregator.url = url;
        }
        if let Some(method) = overrides.rpc_method {
            next.aggregator.rpc_method = method;
        }
        if let Some(ms) = overrides.timeout_ms {
            next.aggregator.timeout = Duration::from_millis(ms);
        }
        if let Some(chain_id) = overrides.chain_id {
            next.chain_id = chain_id;
        }
        if let Some(url) = overrides.ckb_node_url {
            next.ckb_node_url = url;
        }
        if let Some(url) = overrides.ckb_indexer_url {
            next.ckb_indexer_url = url;
        }
        if let Some(code_hash) = overrides.up_lock_code_hash {
            next.asset_lock.code_hash = code_hash;
        }
        if let Some(hash_type) = overrides.up_lock_hash_type {
            next.asset_lock.hash_type = hash_type;
        }
        if let Some(dep) = overrides.up_lock_dep {
            next.asset_lock.cell_dep = dep;
        }
        next
    }

    /// Applies overrides read from a JSON document.
    pub fn from_json_overrides(&self, json: &str) -> Result<Self, serde_json::Error> {
        let overrides: ConfigOverrides = serde_json::from_str(json)?;
        Ok(self.with_overrides(overrides))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_testnet() {
        let cfg = UpLockConfig::default();
        assert_eq!(cfg.chain_id, ChainId::Testnet);
        assert_eq!(cfg.aggregator.rpc_method, "get_asset_lock_tx_info");
        assert_eq!(
            cfg.asset_lock.code_hash.to_hex(),
            "0xd3f6d12ac220b3f7e104f3869e72487f8940adb13a526a2abd775c2cd5040f77"
        );
        assert_eq!(cfg.asset_lock.cell_dep.dep_type, DepType::Code);
        assert_eq!(
            cfg.asset_lock.cell_dep.out_point.tx_hash.to_hex(),
            "0xf4a9d95b5df48f9ed878ebcb23b3558b6d8ed11ecd7c26e0fd1b55778f8bedc6"
        );
    }

    #[test]
    fn overrides_replace_only_what_is_set() {
        let base = UpLockConfig::default();
        let cfg = base
            .from_json_overrides(
                r#"{
                    "aggregatorUrl": "http://10.0.0.1:3030",
                    "rpcMethod": "get_assert_lock_tx_info",
                    "timeoutMs": 1500,
                    "chainId": "mainnet"
                }"#,
            )
            .unwrap();

        assert_eq!(cfg.aggregator.url, "http://10.0.0.1:3030");
        assert_eq!(cfg.aggregator.rpc_method, "get_assert_lock_tx_info");
        assert_eq!(cfg.aggregator.timeout, Duration::from_millis(1500));
        assert_eq!(cfg.chain_id, ChainId::Mainnet);
        assert_eq!(cfg.ckb_node_url, base.ckb_node_url);
        assert_eq!(cfg.asset_lock, base.asset_lock);
        // The source value is untouched.
        assert_eq!(base.chain_id, ChainId::Testnet);
    }

    #[test]
    fn asset_lock_dep_override_uses_rpc_shape() {
        let json = format!(
            r#"{{"upLockDep":{{"out_point":{{"tx_hash":"0x{}","index":"0x3"}},"dep_type":"dep_group"}}}}"#,
            "ab".repeat(32)
        );
        let cfg = UpLockConfig::default().from_json_overrides(&json).unwrap();
        assert_eq!(cfg.asset_lock.cell_dep.out_point.index, 3);
        assert_eq!(cfg.asset_lock.cell_dep.dep_type, DepType::DepGroup);
    }

    #[test]
    fn unknown_override_keys_are_rejected() {
        assert!(
            UpLockConfig::default()
                .from_json_overrides(r#"{"aggregatorURL":"x"}"#)
                .is_err()
        );
    }

    #[test]
    fn lock_script_args_are_username_hash_prefix() {
        let cfg = AssetLockConfig::default();
        let username = UsernameHash::from_username("upckbtest");
        let script = cfg.lock_script_for(&username);
        assert_eq!(script.code_hash, cfg.code_hash);
        assert_eq!(script.args.as_bytes(), &username.as_hash().as_bytes()[..20]);
    }
}
