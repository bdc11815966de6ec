use thiserror::Error;
use tuplet_types::{Genus, ValueError};

/// Everything that can go wrong while building or reading a tuple.
///
/// A failing mutation never leaves a partial write behind: the buffer is exactly as it was
/// before the call. Reading an optional field that is not present is not an error; such
/// reads return `Ok(None)`.
#[derive(Error, PartialEq, Eq, Clone, Debug)]
pub enum TupleError {
    /// A preplaced token names a slot the schema does not declare.
    #[error("{genus:?}#{tag} is not declared as a preplaced field")]
    FieldNotDeclared { genus: Genus, tag: u16 },

    /// A second entry for a non-collection identity, or an insert into a preplaced slot.
    #[error("{genus:?}#{tag} already exists and is not a collection")]
    LayoutConflict { genus: Genus, tag: u16 },

    #[error("{needed} payload bytes needed but capacity is {capacity} (ceiling {ceiling})")]
    CapacityExceeded {
        needed: usize,
        capacity: usize,
        ceiling: usize,
    },

    /// Collection-style access through a token that is not a collection token.
    #[error("{genus:?}#{tag} is not a collection token")]
    CollectionRequired { genus: Genus, tag: u16 },

    /// A value was required but the field is absent.
    #[error("{genus:?}#{tag} is absent")]
    FieldAbsent { genus: Genus, tag: u16 },

    #[error("a {value_type} value does not fit a {genus:?} field")]
    GenusMismatch {
        genus: Genus,
        value_type: &'static str,
    },

    #[error("{value} is out of range for a {genus:?} field")]
    ValueRange { genus: Genus, value: i128 },

    #[error(transparent)]
    Value(#[from] ValueError),

    #[error("malformed tuple image at byte {offset}: {detail}")]
    Malformed { offset: usize, detail: &'static str },

    #[error("invalid schema: {0}")]
    SchemaViolation(String),

    #[error("invalid configuration {var}={value:?}")]
    InvalidConfig { var: &'static str, value: String },
}

pub type Result<T> = std::result::Result<T, TupleError>;
