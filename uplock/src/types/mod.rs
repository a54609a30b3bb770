//! Core domain types.
//!
//! This module defines strongly-typed hashes, the username identity, and the
//! CKB-shaped transaction model that the witness protocol patches. The goal is
//! to avoid "naked" byte buffers in public APIs and instead use
//! domain-specific newtypes.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

pub mod quantity;
/// Transaction, cell and script types in chain JSON-RPC shape.
pub mod tx;

pub use tx::{CellDep, CellInput, CellOutput, DepType, OutPoint, Script, ScriptHashType, Transaction};

/// Length in bytes of all 256-bit hash types used in this module.
pub const HASH_LEN: usize = 32;

/// Length of the lock-script args derived from a username hash.
pub const LOCK_ARGS_LEN: usize = 20;

/// Strongly-typed 256-bit hash wrapper.
///
/// Used for transaction hashes, script code hashes and username digests. It
/// is always exactly [`HASH_LEN`] bytes long and renders as `0x`-prefixed
/// lowercase hex in JSON.
#[derive(Clone, Copy, Default, Eq, PartialEq, Hash)]
pub struct Hash256(pub [u8; HASH_LEN]);

impl Hash256 {
    /// Computes a new [`Hash256`] as the SHA-256 digest of `data`.
    pub fn sha256(data: &[u8]) -> Self {
        let digest = Sha256::digest(data);
        let mut out = [0u8; HASH_LEN];
        out.copy_from_slice(&digest);
        Hash256(out)
    }

    /// Parses `0x`-prefixed (or bare) hex of exactly 32 bytes.
    pub fn from_hex(s: &str) -> Result<Self, String> {
        let bytes = decode_prefixed_hex(s)?;
        let arr: [u8; HASH_LEN] = bytes
            .try_into()
            .map_err(|b: Vec<u8>| format!("expected {HASH_LEN}-byte hash, got {} bytes", b.len()))?;
        Ok(Hash256(arr))
    }

    /// Returns the underlying 32-byte hash as a borrowed array.
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash256({})", self.to_hex())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash256::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

/// SHA-256 digest of a UniPass username.
///
/// This is both the key the proof service is queried with and the 32-byte
/// `username` field of the asset-lock witness. The plaintext username never
/// leaves the caller.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UsernameHash(pub Hash256);

impl UsernameHash {
    /// Hashes the UTF-8 bytes of `username`.
    pub fn from_username(username: &str) -> Self {
        UsernameHash(Hash256::sha256(username.as_bytes()))
    }

    pub fn as_hash(&self) -> &Hash256 {
        &self.0
    }

    /// Wire form used in proof-service requests: `0x` + 64 lowercase hex digits.
    pub fn to_hex(&self) -> String {
        self.0.to_hex()
    }

    /// Lock-script args identifying the user: the first 20 bytes of the hash.
    pub fn lock_args(&self) -> [u8; LOCK_ARGS_LEN] {
        let mut args = [0u8; LOCK_ARGS_LEN];
        args.copy_from_slice(&self.0.0[..LOCK_ARGS_LEN]);
        args
    }
}

impl fmt::Display for UsernameHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// Arbitrary bytes rendered as `0x`-prefixed hex in JSON.
#[derive(Clone, Default, Eq, PartialEq, Hash)]
pub struct JsonBytes(pub Vec<u8>);

impl JsonBytes {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl From<Vec<u8>> for JsonBytes {
    fn from(bytes: Vec<u8>) -> Self {
        JsonBytes(bytes)
    }
}

impl fmt::Debug for JsonBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "JsonBytes({})", self.to_hex())
    }
}

impl Serialize for JsonBytes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for JsonBytes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        decode_prefixed_hex(&s)
            .map(JsonBytes)
            .map_err(serde::de::Error::custom)
    }
}

/// Decodes hex with an optional `0x` prefix. Mixed case is accepted.
pub fn decode_prefixed_hex(s: &str) -> Result<Vec<u8>, String> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(digits).map_err(|e| format!("invalid hex string {s:?}: {e}"))
}
