//! Update classification
//!
//! An update is sensitive when its ballot carries offline votes and no
//! online ones, or when its content requires offline authority: membership,
//! attribute or quorum changes, offline key changes, and keys new to
//! their AS. Everything else is regular.

use crate::core::keys::{DeltaKind, KeyDelta};
use crate::info::{AttributeChanges, UpdateType};
use std::collections::BTreeSet;
use trustroot_core::{AsId, KeyType, Trc};

/// Update class together with the data each class's checks consume
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Online-key update
    Regular {
        /// ASes rotating their online key; they vote with the offline key
        rotating_online: BTreeSet<AsId>,
    },
    /// Offline-key update
    Sensitive,
}

impl Classification {
    /// Public update type
    pub fn update_type(&self) -> UpdateType {
        match self {
            Classification::Regular { .. } => UpdateType::Regular,
            Classification::Sensitive => UpdateType::Sensitive,
        }
    }

    /// Key type a voter must sign with
    pub fn required_vote_key(&self, voter: &AsId) -> KeyType {
        match self {
            Classification::Sensitive => KeyType::Offline,
            Classification::Regular { rotating_online } if rotating_online.contains(voter) => {
                KeyType::Offline
            }
            Classification::Regular { .. } => KeyType::Online,
        }
    }
}

/// Classify the update from `prev` to `next`
pub fn classify(
    prev: &Trc,
    next: &Trc,
    deltas: &[KeyDelta<'_>],
    attribute_changes: &AttributeChanges,
) -> Classification {
    let cast_with = |key_type: KeyType| next.votes().values().any(|v| v.key_type == key_type);
    let offline_ballot = cast_with(KeyType::Offline) && !cast_with(KeyType::Online);

    if offline_ballot || has_sensitive_content(prev, next, deltas, attribute_changes) {
        return Classification::Sensitive;
    }

    let rotating_online = deltas
        .iter()
        .filter(|d| d.key_type == KeyType::Online && d.kind == DeltaKind::Modified)
        .map(|d| d.as_id)
        .collect();

    Classification::Regular { rotating_online }
}

fn has_sensitive_content(
    prev: &Trc,
    next: &Trc,
    deltas: &[KeyDelta<'_>],
    attribute_changes: &AttributeChanges,
) -> bool {
    if next.voting_quorum() != prev.voting_quorum() {
        return true;
    }
    if !attribute_changes.is_empty() {
        return true;
    }
    // Membership changes without attribute changes (attribute-less entries)
    if !prev.primary_ases().ids().eq(next.primary_ases().ids()) {
        return true;
    }
    deltas
        .iter()
        .any(|d| d.kind == DeltaKind::Fresh || d.key_type == KeyType::Offline)
}
