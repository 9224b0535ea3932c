//! Update validation phases
//!
//! Each phase is a free function over the previous and candidate TRC.
//! [`crate::validator::UpdateValidator`] runs them in order and stops at
//! the first failure.

mod classify;
mod keys;
mod lineage;
mod votes;

pub use classify::{classify, Classification};
pub use keys::{key_deltas, validate_key_changes, DeltaKind, KeyDelta};
pub use lineage::validate_lineage;
pub use votes::{validate_quorum_field, validate_votes};
