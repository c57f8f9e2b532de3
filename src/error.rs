//! Error types returned by the tree, proof, and storage layers.
//!
//! The tree distinguishes three kinds of failure: absence (a normal,
//! recoverable outcome from `get`/`delete`), structural impossibility
//! (a 256-bit key collision during `insert`), and input-shape violations
//! (a key of the wrong byte width, or a sum that would overflow `u64`).
//! Storage-backend failures are wrapped opaquely since `TreeStore`
//! implementations may be backed by arbitrary I/O.

use thiserror::Error;

use crate::node::HASH_SIZE;

/// Errors produced by tree, proof, and store operations.
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TreeError {
    /// The requested key is not present in the tree.
    #[error("key not found")]
    NotFound,

    /// Two distinct keys agreed on every one of the 256 bits. Astronomically
    /// unlikely, but `insert` cannot build a valid tree in this case.
    #[error("key collision: two distinct keys share all {HASH_SIZE} bytes of path")]
    KeyCollision,

    /// A key was not exactly `HASH_SIZE` bytes. Programming error, not a
    /// normal runtime outcome.
    #[error("invalid key length: expected {expected} bytes, got {actual}")]
    InvalidKeyLength {
        /// Expected key length in bytes.
        expected: usize,
        /// Key length actually supplied.
        actual: usize,
    },

    /// Inserting this leaf would overflow the 64-bit sum space.
    #[error("sum overflow while inserting leaf")]
    SumOverflow,

    /// The storage backend failed in a backend-specific way.
    #[error("store error: {0}")]
    Store(String),
}
