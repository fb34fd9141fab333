//! `rb_key_tree` is an ordered multiset of integer keys based on a red-black tree.
//!
//! It fully implements the insertion and deletion functionality of a red-black tree,
//! ensuring that each modification operation requires at most O(logN) time complexity.
//!
//! To safely and efficiently handle insertion and deletion in Rust, `rb_key_tree`
//! uses an array to simulate pointers for the parent-child references of the tree,
//! with a sentinel at index zero standing in for every absent child. Erased slots
//! are recycled through a free list, so the `NodeIndex` handed out by `insert`
//! stays valid until that node is erased, no matter how many other keys come and
//! go in between. The array layout also ensures that the tree has the `Send` and
//! `Unpin` traits, allowing it to be safely transferred between threads and to
//! maintain a fixed memory location during asynchronous operations.
//!
//! # Example
//!
//! ```rust
//! use rb_key_tree::RbTree;
//!
//! let mut tree = RbTree::new();
//! let node = tree.insert(42).unwrap();
//! let _ignore = tree.insert(7);
//! assert_eq!(tree.key(node), Some(42));
//! assert_eq!(tree.to_vec(), vec![7, 42]);
//! ```
//!

mod error;
mod index;
mod iter;
mod node;
mod rbtree;

#[cfg(test)]
mod tests;

pub use error::Error;
pub use index::{DefaultIx, IndexType, NodeIndex};
pub use iter::Iter;
pub use node::Key;
pub use rbtree::RbTree;
