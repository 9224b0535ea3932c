//! TRC update validation
//!
//! Decides whether a candidate TRC is a legitimate successor of the
//! currently trusted one. Signatures on votes and proofs of possession are
//! assumed verified by the caller; this module checks that the right
//! parties signed with the right keys and that the content change is one
//! those signatures can authorize.
//!
//! ## Phases
//!
//! 1. **Lineage**: ISD, version, base version, trust reset flag and
//!    validity continue the predecessor.
//! 2. **Classification**: regular (online keys) or sensitive (offline keys).
//! 3. **Votes**: voters, vote keys and the predecessor's quorum.
//! 4. **Quorum field**: sensitive updates only.
//! 5. **Keys**: key sets, key versions and proof of possession.
//! 6. **Diff**: the [`UpdateInfo`] handed to downstream consumers.

use crate::core::{
    classify, key_deltas, validate_key_changes, validate_lineage, validate_quorum_field,
    validate_votes, Classification,
};
use crate::error::UpdateError;
use crate::info::{AttributeChanges, UpdateInfo};
use tracing::{debug, warn};
use trustroot_core::Trc;

/// Validator for a single update step
#[derive(Debug, Clone, Copy)]
pub struct UpdateValidator<'a> {
    /// Currently trusted TRC
    pub prev: &'a Trc,
    /// Candidate successor
    pub next: &'a Trc,
}

impl<'a> UpdateValidator<'a> {
    /// Create a validator for `prev` → `next`
    pub fn new(prev: &'a Trc, next: &'a Trc) -> Self {
        Self { prev, next }
    }

    /// Validate the update and compute its diff
    ///
    /// Rejections are logged at warn level with their category and code.
    pub fn validate(&self) -> Result<UpdateInfo, UpdateError> {
        match self.run() {
            Ok(info) => {
                debug!(
                    isd = %self.next.isd(),
                    version = self.next.version(),
                    update_type = ?info.update_type,
                    fresh_keys = info.key_changes.fresh.values().map(|m| m.len()).sum::<usize>(),
                    modified_keys = info.key_changes.modified.values().map(|m| m.len()).sum::<usize>(),
                    attribute_changes = info.attribute_changes.len(),
                    "TRC update accepted"
                );
                Ok(info)
            }
            Err(e) => {
                warn!(
                    isd = %self.next.isd(),
                    prev_version = self.prev.version(),
                    version = self.next.version(),
                    category = ?e.category(),
                    code = e.code(),
                    error = %e,
                    "SECURITY: TRC update rejected"
                );
                Err(e)
            }
        }
    }

    fn run(&self) -> Result<UpdateInfo, UpdateError> {
        let (prev, next) = (self.prev, self.next);

        validate_lineage(prev, next)?;

        let deltas = key_deltas(prev, next);
        let attribute_changes = AttributeChanges::between(prev, next);
        let class = classify(prev, next, &deltas, &attribute_changes);

        validate_votes(prev, next, &class)?;

        if class == Classification::Sensitive {
            validate_quorum_field(next)?;
        }

        let key_changes = validate_key_changes(next, &deltas)?;

        Ok(UpdateInfo {
            update_type: class.update_type(),
            key_changes,
            attribute_changes,
        })
    }
}

/// Validate `next` as an update of `prev`
pub fn validate(prev: &Trc, next: &Trc) -> Result<UpdateInfo, UpdateError> {
    UpdateValidator::new(prev, next).validate()
}
