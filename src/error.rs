//! Error types shared by the hashing modules.

use thiserror::Error;

/// Errors reported by hash parameter setup, power tables and hash indices.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A parameter set was requested with zero hash bases.
    #[error("at least one hash base is required")]
    NoBases,

    /// An explicitly supplied base is not an element of the field `[0, modulus)`.
    #[error("base {base} is not below the modulus {modulus}")]
    BaseOutOfField { base: u64, modulus: u64 },

    /// A base index past the configured base count.
    #[error("base id {base_id} is out of range (configured bases: {count})")]
    UnknownBase { base_id: usize, count: usize },

    /// A sub-range query with `start > end` or `end > len`.
    #[error("range [{start}, {end}) is out of bounds for a sequence of length {len}")]
    RangeOutOfBounds { start: usize, end: usize, len: usize },

    /// A power that has not been computed yet was read from a power table.
    #[error("power {exponent} of base {base_id} has not been materialized (table length {len})")]
    PowerNotMaterialized {
        base_id: usize,
        exponent: usize,
        len: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
