//! Per-user state attested by the snapshot service.
//!
//! The protocol never builds a [`UserInfo`] itself: the proof service returns
//! it already encoded and the witness carries those bytes verbatim. These
//! types exist so the blob can be inspected (and so tests can produce
//! realistic blobs).

use crate::molecule::{
    Byte32, Entity, Result, TableView, decode_dynvec, decode_fixvec, decode_option,
    encode_dynvec, encode_fixvec, encode_option, encode_table,
};

use super::Pubkey;

/// Email-based recovery policy: `threshold` of `emails` must approve.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecoveryEmail {
    pub threshold: u8,
    /// SHA-256 digests of the recovery addresses.
    pub emails: Vec<Byte32>,
}

impl Entity for RecoveryEmail {
    fn to_molecule(&self) -> Vec<u8> {
        encode_table(&[self.threshold.to_molecule(), encode_fixvec(&self.emails)])
    }

    fn from_molecule(data: &[u8], compatible: bool) -> Result<Self> {
        let table = TableView::parse(data, 2, compatible)?;
        Ok(RecoveryEmail {
            threshold: table.decode_field(0, compatible)?,
            emails: decode_fixvec(table.field(1).unwrap_or_default())?,
        })
    }
}

/// Key rotation that has been requested but not yet taken effect.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PendingState {
    pub pending_key: Pubkey,
    /// Block number from which the rotation may be applied.
    pub start_block: u64,
    /// Non-zero when the pending key replaces the old keys instead of joining them.
    pub replace_old: u8,
}

impl Entity for PendingState {
    fn to_molecule(&self) -> Vec<u8> {
        encode_table(&[
            self.pending_key.to_molecule(),
            self.start_block.to_molecule(),
            self.replace_old.to_molecule(),
        ])
    }

    fn from_molecule(data: &[u8], compatible: bool) -> Result<Self> {
        let table = TableView::parse(data, 3, compatible)?;
        Ok(PendingState {
            pending_key: table.decode_field(0, compatible)?,
            start_block: table.decode_field(1, compatible)?,
            replace_old: table.decode_field(2, compatible)?,
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UserInfo {
    /// SHA-256 digest of the email the account was registered with.
    pub register_email: Byte32,
    pub local_keys: Vec<Pubkey>,
    pub quick_login: u8,
    pub recovery_email: Option<RecoveryEmail>,
    pub pending_state: Option<PendingState>,
    pub nonce: u32,
    /// Opaque registration source tag.
    pub source: Vec<u8>,
}

impl UserInfo {
    pub const FIELD_COUNT: usize = 7;
}

impl Entity for UserInfo {
    fn to_molecule(&self) -> Vec<u8> {
        encode_table(&[
            self.register_email.to_molecule(),
            encode_dynvec(&self.local_keys),
            self.quick_login.to_molecule(),
            encode_option(self.recovery_email.as_ref()),
            encode_option(self.pending_state.as_ref()),
            self.nonce.to_molecule(),
            self.source.to_molecule(),
        ])
    }

    fn from_molecule(data: &[u8], compatible: bool) -> Result<Self> {
        let table = TableView::parse(data, Self::FIELD_COUNT, compatible)?;
        let field = |i: usize| table.field(i).unwrap_or_default();
        Ok(UserInfo {
            register_email: table.decode_field(0, compatible)?,
            local_keys: decode_dynvec(field(1), compatible)?,
            quick_login: table.decode_field(2, compatible)?,
            recovery_email: decode_option(field(3), compatible)?,
            pending_state: decode_option(field(4), compatible)?,
            nonce: table.decode_field(5, compatible)?,
            source: table.decode_field(6, compatible)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::molecule::{Byte20, MoleculeError};
    use crate::schema::RsaPubkey;

    fn sample_user_info() -> UserInfo {
        UserInfo {
            register_email: Byte32::from([0x11; 32]),
            local_keys: vec![
                Pubkey::Secp256k1(Byte20::from([0x22; 20])),
                Pubkey::Rsa(RsaPubkey {
                    e: 65537,
                    n: vec![0x33; 128],
                }),
            ],
            quick_login: 1,
            recovery_email: Some(RecoveryEmail {
                threshold: 2,
                emails: vec![Byte32::from([0x44; 32]), Byte32::from([0x55; 32])],
            }),
            pending_state: Some(PendingState {
                pending_key: Pubkey::Secp256k1(Byte20::from([0x66; 20])),
                start_block: 1_234_567,
                replace_old: 0,
            }),
            nonce: 9,
            source: b"unipass".to_vec(),
        }
    }

    #[test]
    fn user_info_fields_survive_encoding() {
        let info = sample_user_info();
        let decoded = UserInfo::from_slice(&info.to_molecule()).unwrap();
        assert_eq!(decoded, info);
    }

    #[test]
    fn absent_options_encode_as_empty_fields() {
        let info = UserInfo {
            recovery_email: None,
            pending_state: None,
            local_keys: Vec::new(),
            ..sample_user_info()
        };
        let encoded = info.to_molecule();
        let table = TableView::parse(&encoded, UserInfo::FIELD_COUNT, false).unwrap();
        assert_eq!(table.field(1), Some(&[4u8, 0, 0, 0][..]));
        assert_eq!(table.field(3), Some(&[][..]));
        assert_eq!(table.field(4), Some(&[][..]));
        assert_eq!(UserInfo::from_slice(&encoded).unwrap(), info);
    }

    #[test]
    fn quick_login_must_be_a_single_byte() {
        let info = sample_user_info();
        let mut fields: Vec<Vec<u8>> = TableView::parse(&info.to_molecule(), 7, false)
            .unwrap()
            .fields()
            .map(<[u8]>::to_vec)
            .collect();
        fields[2] = vec![1, 0];
        assert!(matches!(
            UserInfo::from_slice(&encode_table(&fields)),
            Err(MoleculeError::LengthMismatch { what: "byte", .. })
        ));
    }

    #[test]
    fn extra_trailing_fields_need_compatible_mode() {
        let info = sample_user_info();
        let mut fields: Vec<Vec<u8>> = TableView::parse(&info.to_molecule(), 7, false)
            .unwrap()
            .fields()
            .map(<[u8]>::to_vec)
            .collect();
        fields.push(vec![0xEE; 3]);
        let extended = encode_table(&fields);

        assert_eq!(
            UserInfo::from_slice(&extended).unwrap_err(),
            MoleculeError::FieldCount {
                expected: 7,
                actual: 8
            }
        );
        assert_eq!(UserInfo::from_compatible_slice(&extended).unwrap(), info);
    }

    #[test]
    fn pending_state_requires_three_fields() {
        let state = sample_user_info().pending_state.unwrap();
        let encoded = state.to_molecule();
        assert_eq!(PendingState::from_slice(&encoded).unwrap(), state);

        let two_fields = encode_table(&[
            state.pending_key.to_molecule(),
            state.start_block.to_molecule(),
        ]);
        assert!(PendingState::from_slice(&two_fields).is_err());
    }
}
