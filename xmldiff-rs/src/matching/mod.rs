//! Sibling alignment.
//!
//! Children of a matched element pair are aligned by the longest common
//! subsequence of their identity keys. Every child of either side lands in
//! exactly one slot, paired with its counterpart or with nothing.

mod lcs;

pub use lcs::{align, lcs_length, Slot};
