//! The signer's authentication envelope.
//!
//! An external signer answers a signing request with a small JSON document,
//!
//! ```json
//! { "keyType": "Secp256k1Pubkey", "pubkey": "0x..", "sig": "0x.." }
//! ```
//!
//! whose bytes are stored as the `lock` of the transaction's first witness
//! until the real asset-lock witness replaces them.

use serde::{Deserialize, Serialize};

use crate::error::{Result, UpLockError};
use crate::molecule::{Byte20, Entity};
use crate::schema::{KeyType, Pubkey, RsaPubkey, WitnessArgs, WitnessArgsReader};
use crate::types::{JsonBytes, Transaction, decode_prefixed_hex};

/// Length of a recoverable secp256k1 signature (`r || s || v`).
pub const RECOVERABLE_SIG_LEN: usize = 65;

/// Offset applied by signers that emit Ethereum-style `v` values.
const RECOVERY_ID_OFFSET: u8 = 27;

/// Length of the RSA public exponent prefix in an envelope `pubkey`.
const RSA_EXPONENT_LEN: usize = 4;

#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthEnvelope {
    pub key_type: KeyType,
    pub pubkey: JsonBytes,
    pub sig: JsonBytes,
}

/// Key material pulled out of an envelope, ready for the witness.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Credentials {
    pub pubkey: Pubkey,
    pub sig: Vec<u8>,
}

impl AuthEnvelope {
    /// Parses the lock bytes of a provisional witness.
    ///
    /// The bytes are either the JSON document itself or its `0x`-prefixed
    /// hex rendering.
    pub fn from_lock(lock: &[u8]) -> Result<Self> {
        let decoded;
        let json = if lock.starts_with(b"0x") {
            let text = std::str::from_utf8(lock)
                .map_err(|e| UpLockError::InvalidEnvelope(format!("lock is not text: {e}")))?;
            decoded = decode_prefixed_hex(text).map_err(UpLockError::InvalidEnvelope)?;
            decoded.as_slice()
        } else {
            lock
        };
        serde_json::from_slice(json).map_err(|e| UpLockError::InvalidEnvelope(e.to_string()))
    }

    /// Parses the hex string a signer returns.
    pub fn from_hex(hex_envelope: &str) -> Result<Self> {
        let bytes = decode_prefixed_hex(hex_envelope).map_err(UpLockError::InvalidEnvelope)?;
        Self::from_lock(&bytes)
    }

    /// `0x`-prefixed hex of the JSON document, the form signers hand back.
    pub fn to_hex(&self) -> Result<String> {
        let json =
            serde_json::to_vec(self).map_err(|e| UpLockError::InvalidEnvelope(e.to_string()))?;
        Ok(format!("0x{}", hex::encode(json)))
    }

    /// Maps the envelope onto a [`Pubkey`] and the signature bytes.
    ///
    /// - Secp256k1: the 20-byte pubkey is used as-is. A 65-byte signature has
    ///   its recovery byte folded from `27..` down into `0..`.
    /// - Rsa: the first 4 bytes are the exponent, the rest the modulus.
    /// - Secp256r1 is rejected.
    pub fn into_credentials(self) -> Result<Credentials> {
        let AuthEnvelope {
            key_type,
            pubkey,
            sig,
        } = self;
        let mut sig = sig.into_bytes();

        let pubkey = match key_type {
            KeyType::Secp256k1Pubkey => {
                let key = Byte20::from_slice(pubkey.as_bytes()).map_err(|_| {
                    UpLockError::InvalidEnvelope(format!(
                        "secp256k1 pubkey must be 20 bytes, got {}",
                        pubkey.len()
                    ))
                })?;
                normalize_recovery_id(&mut sig);
                Pubkey::Secp256k1(key)
            }
            KeyType::RsaPubkey => {
                let raw = pubkey.as_bytes();
                if raw.len() <= RSA_EXPONENT_LEN {
                    return Err(UpLockError::InvalidEnvelope(format!(
                        "rsa pubkey too short: {} bytes",
                        raw.len()
                    )));
                }
                let (e, n) = raw.split_at(RSA_EXPONENT_LEN);
                Pubkey::Rsa(RsaPubkey {
                    // Byte order preserved: the witness stores these bytes verbatim.
                    e: u32::from_le_bytes([e[0], e[1], e[2], e[3]]),
                    n: n.to_vec(),
                })
            }
            KeyType::Secp256r1Pubkey => {
                return Err(UpLockError::UnsupportedKeyType(key_type.to_string()));
            }
        };

        Ok(Credentials { pubkey, sig })
    }
}

/// Folds an Ethereum-style `v` (27/28) into a raw recovery id. Raw ids (0/1) are left alone.
pub fn normalize_recovery_id(sig: &mut [u8]) {
    if sig.len() == RECOVERABLE_SIG_LEN && sig[RECOVERABLE_SIG_LEN - 1] >= RECOVERY_ID_OFFSET {
        sig[RECOVERABLE_SIG_LEN - 1] -= RECOVERY_ID_OFFSET;
    }
}

/// Stores a signer's hex envelope as the `lock` of the first witness.
///
/// Creates an empty `WitnessArgs` when the transaction has no witness yet or
/// the first witness is empty. Other witness fields are preserved.
pub fn embed_envelope(tx: &mut Transaction, hex_envelope: &str) -> Result<()> {
    let lock = decode_prefixed_hex(hex_envelope).map_err(UpLockError::InvalidEnvelope)?;
    AuthEnvelope::from_lock(&lock)?;

    let witness = match tx.first_witness() {
        Some(existing) if !existing.is_empty() => {
            WitnessArgsReader::from_slice(existing, false)?.with_lock(Some(&lock))
        }
        _ => WitnessArgs {
            lock: Some(lock),
            ..WitnessArgs::default()
        }
        .to_molecule(),
    };

    match tx.witnesses.first_mut() {
        Some(slot) => *slot = JsonBytes(witness),
        None => tx.witnesses.push(JsonBytes(witness)),
    }
    Ok(())
}
