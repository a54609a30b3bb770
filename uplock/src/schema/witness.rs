//! The asset-lock witness: what the lock script reads from `WitnessArgs.lock`.
//!
//! ```text
//! table AssetLockWitness {
//!     pubkey:              Pubkey,
//!     sig:                 Bytes,
//!     username:            Byte32,   // sha256(username)
//!     user_info:           UserInfo, // pre-encoded by the proof service
//!     user_info_smt_proof: Bytes,
//! }
//! ```

use crate::molecule::{Byte32, Entity, Result, TableView};

use super::{Pubkey, UserInfo};

/// Owned asset-lock witness.
///
/// `user_info` holds bytes that are already molecule-encoded. They are written
/// into the table as-is and never re-encoded from a structured value.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AssetLockWitness {
    pub pubkey: Pubkey,
    pub sig: Vec<u8>,
    pub username: Byte32,
    pub user_info: Vec<u8>,
    pub user_info_smt_proof: Vec<u8>,
}

impl AssetLockWitness {
    pub const FIELD_COUNT: usize = 5;

    pub fn new(
        pubkey: Pubkey,
        sig: Vec<u8>,
        username: Byte32,
        user_info: Vec<u8>,
        user_info_smt_proof: Vec<u8>,
    ) -> Self {
        Self {
            pubkey,
            sig,
            username,
            user_info,
            user_info_smt_proof,
        }
    }
}

impl Entity for AssetLockWitness {
    fn to_molecule(&self) -> Vec<u8> {
        crate::molecule::encode_table(&[
            self.pubkey.to_molecule(),
            self.sig.to_molecule(),
            self.username.to_molecule(),
            self.user_info.clone(),
            self.user_info_smt_proof.to_molecule(),
        ])
    }

    fn from_molecule(data: &[u8], compatible: bool) -> Result<Self> {
        let reader = AssetLockWitnessReader::from_slice(data, compatible)?;
        Ok(AssetLockWitness {
            pubkey: reader.pubkey()?,
            sig: reader.sig()?.to_vec(),
            username: reader.username()?,
            user_info: reader.user_info().to_vec(),
            user_info_smt_proof: reader.user_info_smt_proof()?.to_vec(),
        })
    }
}

/// Lazy view over an encoded [`AssetLockWitness`].
///
/// Construction checks only the outer offset table; each accessor decodes
/// its own field on demand.
#[derive(Clone, Debug)]
pub struct AssetLockWitnessReader<'a> {
    table: TableView<'a>,
    compatible: bool,
}

impl<'a> AssetLockWitnessReader<'a> {
    pub fn from_slice(data: &'a [u8], compatible: bool) -> Result<Self> {
        Ok(Self {
            table: TableView::parse(data, AssetLockWitness::FIELD_COUNT, compatible)?,
            compatible,
        })
    }

    fn raw(&self, index: usize) -> &'a [u8] {
        // Field count was checked in `from_slice`.
        self.table.field(index).unwrap_or_default()
    }

    pub fn pubkey(&self) -> Result<Pubkey> {
        Pubkey::from_molecule(self.raw(0), self.compatible)
    }

    pub fn sig(&self) -> Result<&'a [u8]> {
        crate::molecule::decode_bytes(self.raw(1))
    }

    pub fn username(&self) -> Result<Byte32> {
        Byte32::from_slice(self.raw(2))
    }

    /// The pre-encoded user-info blob, exactly as stored.
    pub fn user_info(&self) -> &'a [u8] {
        self.raw(3)
    }

    /// Decodes the user-info blob in compatible mode.
    pub fn decode_user_info(&self) -> Result<UserInfo> {
        UserInfo::from_compatible_slice(self.raw(3))
    }

    pub fn user_info_smt_proof(&self) -> Result<&'a [u8]> {
        crate::molecule::decode_bytes(self.raw(4))
    }

    /// Eagerly decodes every field, including the user-info blob.
    pub fn verify(&self) -> Result<()> {
        self.pubkey()?;
        self.sig()?;
        self.username()?;
        self.decode_user_info()?;
        self.user_info_smt_proof()?;
        Ok(())
    }
}
