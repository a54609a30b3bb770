//! Offset-table containers: tables and dynamic vectors.
//!
//! Both share one layout:
//!
//! ```text
//! | total_size | offset_0 | ... | offset_{k-1} | field_0 | ... | field_{k-1} |
//! ```
//!
//! A bare 4-byte header (`total_size == 4`) is the empty container.

use super::Entity;
use super::error::{MoleculeError, Result};
use super::primitives::{NUMBER_SIZE, read_u32};

/// Validated view over a table or dynamic vector.
///
/// Holds the buffer and its offset sequence (with the total size appended as
/// a terminal sentinel). Field `i` is `data[offsets[i]..offsets[i + 1]]`.
#[derive(Clone, Debug)]
pub struct TableView<'a> {
    data: &'a [u8],
    offsets: Vec<usize>,
}

impl<'a> TableView<'a> {
    /// Parses a table with a schema of `expected_fields` fields.
    ///
    /// Strict mode requires exactly `expected_fields`; compatible mode accepts
    /// more and ignores the extras.
    pub fn parse(data: &'a [u8], expected_fields: usize, compatible: bool) -> Result<Self> {
        let view = Self::parse_dynvec(data)?;
        let actual = view.item_count();
        if actual < expected_fields || (!compatible && actual > expected_fields) {
            return Err(MoleculeError::FieldCount {
                expected: expected_fields,
                actual,
            });
        }
        Ok(view)
    }

    /// Parses a dynamic vector: any number of items.
    pub fn parse_dynvec(data: &'a [u8]) -> Result<Self> {
        let offsets = extract_offsets(data)?;
        Ok(Self { data, offsets })
    }

    /// Number of fields (or items) the header declares.
    pub fn item_count(&self) -> usize {
        self.offsets.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.item_count() == 0
    }

    /// Raw encoding of field `index`, or `None` past the end.
    pub fn field(&self, index: usize) -> Option<&'a [u8]> {
        let start = *self.offsets.get(index)?;
        let end = *self.offsets.get(index + 1)?;
        Some(&self.data[start..end])
    }

    /// Decodes field `index` as `T`.
    pub fn decode_field<T: Entity>(&self, index: usize, compatible: bool) -> Result<T> {
        let raw = self.field(index).ok_or(MoleculeError::FieldCount {
            expected: index + 1,
            actual: self.item_count(),
        })?;
        T::from_molecule(raw, compatible)
    }

    pub fn fields(&self) -> impl Iterator<Item = &'a [u8]> + '_ {
        self.offsets.windows(2).map(|w| &self.data[w[0]..w[1]])
    }

    pub fn as_slice(&self) -> &'a [u8] {
        self.data
    }

    pub fn offsets(&self) -> &[usize] {
        &self.offsets
    }
}

fn extract_offsets(data: &[u8]) -> Result<Vec<usize>> {
    let total = read_u32(data, 0).ok_or(MoleculeError::HeaderTooShort {
        required: NUMBER_SIZE,
        actual: data.len(),
    })? as usize;
    if total != data.len() {
        return Err(MoleculeError::TotalSizeMismatch {
            declared: total,
            actual: data.len(),
        });
    }
    if total == NUMBER_SIZE {
        return Ok(vec![total]);
    }

    let first = read_u32(data, NUMBER_SIZE).ok_or(MoleculeError::HeaderTooShort {
        required: NUMBER_SIZE * 2,
        actual: data.len(),
    })? as usize;
    if first % NUMBER_SIZE != 0 || first < NUMBER_SIZE * 2 || first > total {
        return Err(MoleculeError::InvalidFirstOffset {
            offset: first,
            total,
        });
    }

    let item_count = first / NUMBER_SIZE - 1;
    let mut offsets = Vec::with_capacity(item_count + 1);
    offsets.push(first);
    for i in 1..item_count {
        // In bounds: the header ends at `first <= total`.
        let offset = read_u32(data, NUMBER_SIZE * (i + 1)).ok_or(MoleculeError::HeaderTooShort {
            required: first,
            actual: data.len(),
        })? as usize;
        offsets.push(offset);
    }
    offsets.push(total);

    for (index, pair) in offsets.windows(2).enumerate() {
        if pair[0] > pair[1] {
            return Err(MoleculeError::OffsetOutOfOrder {
                index,
                offset: pair[0],
                next: pair[1],
            });
        }
    }
    Ok(offsets)
}

/// Encodes already-encoded fields as a table (or dynamic vector).
pub fn encode_table<B: AsRef<[u8]>>(fields: &[B]) -> Vec<u8> {
    let header = NUMBER_SIZE * (fields.len() + 1);
    let total = header + fields.iter().map(|f| f.as_ref().len()).sum::<usize>();

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&(total as u32).to_le_bytes());
    let mut offset = header;
    for field in fields {
        out.extend_from_slice(&(offset as u32).to_le_bytes());
        offset += field.as_ref().len();
    }
    for field in fields {
        out.extend_from_slice(field.as_ref());
    }
    out
}

/// Encodes a dynamic vector of entities.
pub fn encode_dynvec<T: Entity>(items: &[T]) -> Vec<u8> {
    let encoded: Vec<Vec<u8>> = items.iter().map(Entity::to_molecule).collect();
    encode_table(&encoded)
}

/// Decodes every item of a dynamic vector of entities.
pub fn decode_dynvec<T: Entity>(data: &[u8], compatible: bool) -> Result<Vec<T>> {
    TableView::parse_dynvec(data)?
        .fields()
        .map(|raw| T::from_molecule(raw, compatible))
        .collect()
}
