//! Deterministic, duplicate-free enumeration of combinatorial domains.
//!
//! Every enumerator here is a lazy [`Iterator`] built over [`cache::SequenceCache`]s,
//! so operands may be infinite or of unknown size. Finite operands give finite
//! enumerations of exactly the expected length; infinite operands give enumerations
//! that reach every element at some finite position.

pub mod error;
pub mod infra;
pub mod math;

pub use error::{EnumError, EnumResult};
pub use math::*;
