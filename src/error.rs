//! Errors raised while constructing an enumeration.
//!
//! Only argument validation can fail. Once an enumeration exists it never errors:
//! index tuples that fall outside an operand are skipped, not reported.

use thiserror::Error;

/// Result alias used by fallible constructors.
pub type EnumResult<T> = Result<T, EnumError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnumError {
    /// A demultiplexer into ℕ⁰ is not a bijection.
    #[error("demultiplexer arity must be at least 1")]
    ZeroArity,

    /// The demultiplexer produces tuples of a different width than the index space.
    #[error("index space has {space} coordinates but demultiplexer produces {demux}")]
    ArityMismatch {
        /// Coordinates in the index space.
        space: usize,
        /// Coordinates produced by the demultiplexer.
        demux: usize,
    },
}
