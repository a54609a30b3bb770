//! Tagged unions and optional values.

use super::Entity;
use super::error::{MoleculeError, Result};
use super::primitives::{NUMBER_SIZE, read_u32};

/// Validated view over a union: a 4-byte little-endian tag and the body of
/// the tagged variant.
#[derive(Clone, Copy, Debug)]
pub struct UnionView<'a> {
    tag: u32,
    body: &'a [u8],
}

impl<'a> UnionView<'a> {
    /// Parses the tag and rejects anything outside `0..variants`.
    ///
    /// The body is not validated here; the caller decodes it with the schema
    /// of the selected variant.
    pub fn parse(data: &'a [u8], variants: u32) -> Result<Self> {
        let tag = read_u32(data, 0).ok_or(MoleculeError::HeaderTooShort {
            required: NUMBER_SIZE,
            actual: data.len(),
        })?;
        if tag >= variants {
            return Err(MoleculeError::UnknownUnionTag { tag, variants });
        }
        Ok(Self {
            tag,
            body: &data[NUMBER_SIZE..],
        })
    }

    pub fn tag(&self) -> u32 {
        self.tag
    }

    pub fn body(&self) -> &'a [u8] {
        self.body
    }
}

/// Encodes a union: tag followed by the variant's own encoding.
pub fn encode_union(tag: u32, body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(NUMBER_SIZE + body.len());
    out.extend_from_slice(&tag.to_le_bytes());
    out.extend_from_slice(body);
    out
}

/// Encodes an option: the inner encoding, or nothing at all when absent.
pub fn encode_option<T: Entity>(value: Option<&T>) -> Vec<u8> {
    value.map(Entity::to_molecule).unwrap_or_default()
}

/// A zero-length buffer is `None`; anything else is one encoded value.
pub fn option_slice(data: &[u8]) -> Option<&[u8]> {
    if data.is_empty() { None } else { Some(data) }
}

pub fn decode_option<T: Entity>(data: &[u8], compatible: bool) -> Result<Option<T>> {
    option_slice(data)
        .map(|inner| T::from_molecule(inner, compatible))
        .transpose()
}
