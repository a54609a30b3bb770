//! Fixed-size values, length-prefixed bytes and fixed-item vectors.

use std::fmt;

use super::Entity;
use super::error::{MoleculeError, Result};

/// Size in bytes of every header word (total size, offsets, counts, tags).
pub const NUMBER_SIZE: usize = 4;

/// Reads the little-endian `u32` header word at `pos`, if the buffer holds it.
pub(crate) fn read_u32(data: &[u8], pos: usize) -> Option<u32> {
    let word = data.get(pos..pos + NUMBER_SIZE)?;
    Some(u32::from_le_bytes([word[0], word[1], word[2], word[3]]))
}

pub(crate) fn expect_len(what: &'static str, data: &[u8], expected: usize) -> Result<()> {
    if data.len() != expected {
        return Err(MoleculeError::LengthMismatch {
            what,
            expected,
            actual: data.len(),
        });
    }
    Ok(())
}

/// Exactly `N` raw bytes (molecule `array` of `byte`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FixedBytes<const N: usize>(pub [u8; N]);

pub type Byte20 = FixedBytes<20>;
pub type Byte32 = FixedBytes<32>;
pub type Byte64 = FixedBytes<64>;

impl<const N: usize> FixedBytes<N> {
    pub const SIZE: usize = N;

    /// Copies `data` into a fixed-size value; any other length is rejected.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        expect_len("fixed bytes", data, N)?;
        let mut inner = [0u8; N];
        inner.copy_from_slice(data);
        Ok(Self(inner))
    }

    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl<const N: usize> Default for FixedBytes<N> {
    fn default() -> Self {
        Self([0u8; N])
    }
}

impl<const N: usize> From<[u8; N]> for FixedBytes<N> {
    fn from(inner: [u8; N]) -> Self {
        Self(inner)
    }
}

impl<const N: usize> fmt::Debug for FixedBytes<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FixedBytes<{N}>(0x{})", hex::encode(self.0))
    }
}

impl<const N: usize> Entity for FixedBytes<N> {
    fn to_molecule(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn from_molecule(data: &[u8], _compatible: bool) -> Result<Self> {
        Self::from_slice(data)
    }
}

impl Entity for u8 {
    fn to_molecule(&self) -> Vec<u8> {
        vec![*self]
    }

    fn from_molecule(data: &[u8], _compatible: bool) -> Result<Self> {
        expect_len("byte", data, 1)?;
        Ok(data[0])
    }
}

impl Entity for u32 {
    fn to_molecule(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn from_molecule(data: &[u8], _compatible: bool) -> Result<Self> {
        expect_len("Uint32", data, 4)?;
        Ok(u32::from_le_bytes([data[0], data[1], data[2], data[3]]))
    }
}

impl Entity for u64 {
    fn to_molecule(&self) -> Vec<u8> {
        self.to_le_bytes().to_vec()
    }

    fn from_molecule(data: &[u8], _compatible: bool) -> Result<Self> {
        expect_len("Uint64", data, 8)?;
        let mut word = [0u8; 8];
        word.copy_from_slice(data);
        Ok(u64::from_le_bytes(word))
    }
}

/// Encodes a `Bytes` value: 4-byte length prefix followed by the payload.
pub fn encode_bytes(payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(NUMBER_SIZE + payload.len());
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    out
}

/// Validates a `Bytes` value and returns its payload without copying.
pub fn decode_bytes(data: &[u8]) -> Result<&[u8]> {
    let len = read_u32(data, 0).ok_or(MoleculeError::HeaderTooShort {
        required: NUMBER_SIZE,
        actual: data.len(),
    })? as usize;
    expect_len("bytes", data, NUMBER_SIZE + len)?;
    Ok(&data[NUMBER_SIZE..])
}

/// `Vec<u8>` is molecule `Bytes`.
impl Entity for Vec<u8> {
    fn to_molecule(&self) -> Vec<u8> {
        encode_bytes(self)
    }

    fn from_molecule(data: &[u8], _compatible: bool) -> Result<Self> {
        decode_bytes(data).map(<[u8]>::to_vec)
    }
}

/// Encodes a vector of fixed-size items: 4-byte count followed by the items.
pub fn encode_fixvec<const N: usize>(items: &[FixedBytes<N>]) -> Vec<u8> {
    let mut out = Vec::with_capacity(NUMBER_SIZE + items.len() * N);
    out.extend_from_slice(&(items.len() as u32).to_le_bytes());
    for item in items {
        out.extend_from_slice(item.as_slice());
    }
    out
}

/// Decodes a vector of fixed-size items, checking `total == 4 + count * N`.
pub fn decode_fixvec<const N: usize>(data: &[u8]) -> Result<Vec<FixedBytes<N>>> {
    let count = read_u32(data, 0).ok_or(MoleculeError::HeaderTooShort {
        required: NUMBER_SIZE,
        actual: data.len(),
    })? as usize;
    let expected = count
        .checked_mul(N)
        .and_then(|body| body.checked_add(NUMBER_SIZE))
        .ok_or(MoleculeError::LengthMismatch {
            what: "fixvec",
            expected: usize::MAX,
            actual: data.len(),
        })?;
    expect_len("fixvec", data, expected)?;
    data[NUMBER_SIZE..]
        .chunks_exact(N)
        .map(FixedBytes::<N>::from_slice)
        .collect()
}
