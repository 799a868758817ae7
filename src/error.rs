//! Error type shared by `BucketHashMap` and `Dictionary`.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Parallel key/value sequences passed to a bulk constructor differ in length.
    #[error("key and value sequences differ in length (keys: {keys}, values: {values})")]
    LengthMismatch { keys: usize, values: usize },
    #[error("key not found")]
    KeyNotFound,
    /// Raised by `Dictionary::erase` where the base table would return `false`.
    #[error("invalid key: not present in dictionary")]
    InvalidKey,
    #[error("invalid resize policy: {reason}")]
    InvalidPolicy { reason: &'static str },
}

pub type Result<T, E = Error> = core::result::Result<T, E>;
