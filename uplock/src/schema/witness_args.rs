//! The chain's generic witness container.
//!
//! ```text
//! table WitnessArgs {
//!     lock:        BytesOpt,
//!     input_type:  BytesOpt,
//!     output_type: BytesOpt,
//! }
//! ```

use crate::molecule::{
    Entity, Result, TableView, decode_bytes, encode_bytes, encode_table, option_slice,
};

fn bytes_opt(raw: &[u8]) -> Result<Option<&[u8]>> {
    option_slice(raw).map(decode_bytes).transpose()
}

fn encode_bytes_opt(value: Option<&[u8]>) -> Vec<u8> {
    value.map(encode_bytes).unwrap_or_default()
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WitnessArgs {
    pub lock: Option<Vec<u8>>,
    pub input_type: Option<Vec<u8>>,
    pub output_type: Option<Vec<u8>>,
}

impl WitnessArgs {
    pub const FIELD_COUNT: usize = 3;
}

impl Entity for WitnessArgs {
    fn to_molecule(&self) -> Vec<u8> {
        encode_table(&[
            encode_bytes_opt(self.lock.as_deref()),
            encode_bytes_opt(self.input_type.as_deref()),
            encode_bytes_opt(self.output_type.as_deref()),
        ])
    }

    fn from_molecule(data: &[u8], compatible: bool) -> Result<Self> {
        let reader = WitnessArgsReader::from_slice(data, compatible)?;
        Ok(WitnessArgs {
            lock: reader.lock()?.map(<[u8]>::to_vec),
            input_type: reader.input_type()?.map(<[u8]>::to_vec),
            output_type: reader.output_type()?.map(<[u8]>::to_vec),
        })
    }
}

/// Borrowed view over an encoded [`WitnessArgs`].
#[derive(Clone, Debug)]
pub struct WitnessArgsReader<'a> {
    table: TableView<'a>,
}

impl<'a> WitnessArgsReader<'a> {
    pub fn from_slice(data: &'a [u8], compatible: bool) -> Result<Self> {
        Ok(Self {
            table: TableView::parse(data, WitnessArgs::FIELD_COUNT, compatible)?,
        })
    }

    fn raw(&self, index: usize) -> &'a [u8] {
        self.table.field(index).unwrap_or_default()
    }

    pub fn lock(&self) -> Result<Option<&'a [u8]>> {
        bytes_opt(self.raw(0))
    }

    pub fn input_type(&self) -> Result<Option<&'a [u8]>> {
        bytes_opt(self.raw(1))
    }

    pub fn output_type(&self) -> Result<Option<&'a [u8]>> {
        bytes_opt(self.raw(2))
    }

    /// Re-encodes the table with `lock` replaced.
    ///
    /// `input_type` and `output_type` are copied from the original encoding
    /// byte-for-byte, as are any trailing fields accepted in compatible mode.
    pub fn with_lock(&self, lock: Option<&[u8]>) -> Vec<u8> {
        let mut fields: Vec<Vec<u8>> = self.table.fields().map(<[u8]>::to_vec).collect();
        fields[0] = encode_bytes_opt(lock);
        encode_table(&fields)
    }
}
