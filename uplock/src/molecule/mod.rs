//! Molecule-style binary codec.
//!
//! This is the self-describing little-endian format the on-chain lock script
//! verifies witnesses with. The module has no domain knowledge; it provides:
//!
//! - fixed-size values ([`FixedBytes`], `u8`, `u32`, `u64`),
//! - length-prefixed byte strings ([`encode_bytes`] / [`decode_bytes`]),
//! - fixed-item vectors ([`encode_fixvec`] / [`decode_fixvec`]),
//! - offset-table containers shared by tables and dynamic vectors
//!   ([`TableView`] / [`encode_table`]),
//! - options and unions ([`UnionView`], [`encode_option`], [`encode_union`]).
//!
//! Decoding never copies eagerly: [`TableView`] and [`UnionView`] validate the
//! header of a buffer and hand out sub-slices on demand. The [`Entity`] trait
//! ties owned schema values to their encodings.

pub mod error;
pub mod primitives;
pub mod table;
pub mod union;

pub use error::{MoleculeError, Result};
pub use primitives::{
    Byte20, Byte32, Byte64, FixedBytes, NUMBER_SIZE, decode_bytes, decode_fixvec, encode_bytes,
    encode_fixvec,
};
pub use table::{TableView, decode_dynvec, encode_dynvec, encode_table};
pub use union::{UnionView, decode_option, encode_option, encode_union, option_slice};

/// An owned value with a canonical molecule encoding.
///
/// `compatible` selects the decoding mode for tables nested anywhere inside
/// the value: strict mode rejects tables carrying more fields than the schema
/// defines, compatible mode tolerates (and ignores) extra trailing fields.
pub trait Entity: Sized {
    /// Encodes the value into its canonical byte form.
    fn to_molecule(&self) -> Vec<u8>;

    /// Decodes a value, validating every length, offset and tag on the way.
    fn from_molecule(data: &[u8], compatible: bool) -> Result<Self>;

    /// Strict decode.
    fn from_slice(data: &[u8]) -> Result<Self> {
        Self::from_molecule(data, false)
    }

    /// Forward-compatible decode.
    fn from_compatible_slice(data: &[u8]) -> Result<Self> {
        Self::from_molecule(data, true)
    }
}
