//! Function-hiding inner product functional encryption.
//!
//! A client holding the master key derives a functional key for a vector x
//! and encrypts vectors y; whoever holds the functional key learns <x, y>
//! from a ciphertext and nothing else about y, while the key hides x.
use thiserror::Error;

mod canonical;
mod dlog;
mod keys;
mod matrix;
mod pairing_fe;
pub mod traits;

pub use keys::{Ciphertext, DerivedKey, MasterKey};
pub use pairing_fe::Fhipe;

/// Largest accepted bound. Decryption keeps about `sqrt(2 * bound)` target
/// group elements in memory.
pub const MAX_BOUND: u64 = u32::MAX as u64;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeError {
    #[error("vector dimension must be at least 1")]
    InvalidDimension,
    #[error("bound {bound} must lie in 1..={max}")]
    InvalidBound { bound: u64, max: u64 },
    #[error("expected dimension {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("component {index} is {value}, outside of [-{bound}, {bound}]")]
    ComponentOutOfBound { index: usize, value: i64, bound: u64 },
    #[error("inner product is outside of [-{bound}, {bound}]")]
    OutOfRange { bound: u64 },
}
