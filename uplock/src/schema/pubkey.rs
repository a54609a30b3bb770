//! Public key union and its variants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::molecule::{
    Byte20, Byte64, Entity, MoleculeError, Result, TableView, UnionView, encode_table,
    encode_union,
};

/// Closed set of key schemes the asset lock understands.
///
/// The discriminant is the molecule union tag. The serde names are the ones
/// the external signer puts in its `keyType` field.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum KeyType {
    RsaPubkey = 0,
    Secp256k1Pubkey = 1,
    Secp256r1Pubkey = 2,
}

impl KeyType {
    pub const VARIANTS: u32 = 3;

    pub const fn tag(self) -> u32 {
        self as u32
    }

    pub const fn from_tag(tag: u32) -> Option<Self> {
        match tag {
            0 => Some(KeyType::RsaPubkey),
            1 => Some(KeyType::Secp256k1Pubkey),
            2 => Some(KeyType::Secp256r1Pubkey),
            _ => None,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            KeyType::RsaPubkey => "RsaPubkey",
            KeyType::Secp256k1Pubkey => "Secp256k1Pubkey",
            KeyType::Secp256r1Pubkey => "Secp256r1Pubkey",
        }
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// RSA public key: table of exponent `e` (Uint32) and modulus `n` (Bytes).
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct RsaPubkey {
    pub e: u32,
    pub n: Vec<u8>,
}

impl Entity for RsaPubkey {
    fn to_molecule(&self) -> Vec<u8> {
        encode_table(&[self.e.to_molecule(), self.n.to_molecule()])
    }

    fn from_molecule(data: &[u8], compatible: bool) -> Result<Self> {
        let table = TableView::parse(data, 2, compatible)?;
        Ok(RsaPubkey {
            e: table.decode_field(0, compatible)?,
            n: table.decode_field(1, compatible)?,
        })
    }
}

/// Public key union.
///
/// Secp256k1 keys are carried as their 20-byte address form, Secp256r1 keys
/// as the raw 64-byte `x || y` point.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Pubkey {
    Rsa(RsaPubkey),
    Secp256k1(Byte20),
    Secp256r1(Byte64),
}

impl Pubkey {
    pub fn key_type(&self) -> KeyType {
        match self {
            Pubkey::Rsa(_) => KeyType::RsaPubkey,
            Pubkey::Secp256k1(_) => KeyType::Secp256k1Pubkey,
            Pubkey::Secp256r1(_) => KeyType::Secp256r1Pubkey,
        }
    }
}

impl Entity for Pubkey {
    fn to_molecule(&self) -> Vec<u8> {
        let body = match self {
            Pubkey::Rsa(key) => key.to_molecule(),
            Pubkey::Secp256k1(key) => key.to_molecule(),
            Pubkey::Secp256r1(key) => key.to_molecule(),
        };
        encode_union(self.key_type().tag(), &body)
    }

    fn from_molecule(data: &[u8], compatible: bool) -> Result<Self> {
        let union = UnionView::parse(data, KeyType::VARIANTS)?;
        let key_type = KeyType::from_tag(union.tag()).ok_or(MoleculeError::UnknownUnionTag {
            tag: union.tag(),
            variants: KeyType::VARIANTS,
        })?;
        let body = union.body();
        Ok(match key_type {
            KeyType::RsaPubkey => Pubkey::Rsa(RsaPubkey::from_molecule(body, compatible)?),
            KeyType::Secp256k1Pubkey => Pubkey::Secp256k1(Byte20::from_slice(body)?),
            KeyType::Secp256r1Pubkey => Pubkey::Secp256r1(Byte64::from_slice(body)?),
        })
    }
}
