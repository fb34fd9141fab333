use std::collections::TryReserveError;

use thiserror::Error;

/// Errors reported by the tree operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Reserving storage for a new node failed
    #[error("failed to reserve storage for a new node")]
    Alloc(#[from] TryReserveError),
    /// Every addressable slot of the index width is occupied
    #[error("reached the maximum node count for the index width")]
    NodeLimit,
    /// The index does not refer to a live node
    #[error("node index does not refer to a live node")]
    InvalidIndex,
    /// The destination buffer cannot hold every key
    #[error("tree holds {len} keys but the destination capacity is {capacity}")]
    CapacityExceeded {
        /// Number of keys in the tree
        len: usize,
        /// Capacity of the destination
        capacity: usize,
    },
}
