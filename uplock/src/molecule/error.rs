use thiserror::Error;

/// Structural violation found while decoding or constructing a molecule value.
///
/// Every variant is fatal to the value being decoded. Nothing in the codec
/// repairs or truncates a malformed buffer.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MoleculeError {
    /// Buffer is shorter than the header it must carry.
    #[error("header too short: need at least {required} bytes, got {actual}")]
    HeaderTooShort { required: usize, actual: usize },

    /// The leading total-size word disagrees with the buffer length.
    #[error("total size mismatch: header declares {declared} bytes, buffer has {actual}")]
    TotalSizeMismatch { declared: usize, actual: usize },

    /// First offset is not a multiple of 4, is below 8, or points past the end.
    #[error("invalid first offset {offset} for a {total}-byte container")]
    InvalidFirstOffset { offset: usize, total: usize },

    /// The offset table carries a different number of fields than the schema.
    #[error("field count mismatch: schema expects {expected}, buffer carries {actual}")]
    FieldCount { expected: usize, actual: usize },

    /// Offsets must be non-decreasing.
    #[error("offset #{index} ({offset}) is larger than the next offset ({next})")]
    OffsetOutOfOrder {
        index: usize,
        offset: usize,
        next: usize,
    },

    /// A union tag outside the known variant range.
    #[error("unknown union tag {tag} (expected 0..{variants})")]
    UnknownUnionTag { tag: u32, variants: u32 },

    /// A fixed-size value (or a length-prefixed payload) has the wrong length.
    #[error("invalid length for {what}: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

pub type Result<T> = std::result::Result<T, MoleculeError>;
