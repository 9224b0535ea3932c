//! Validation result: update class and the diff between two TRCs
//!
//! Downstream consumers key off these types: the update type drives
//! policy, key changes drive certificate re-issuance, attribute changes
//! drive authorization cache invalidation.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use trustroot_core::{AsId, Attribute, KeyMeta, KeyType, Trc};

/// Class of a TRC update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateType {
    /// Signed with online keys; rotates online or issuing keys only
    Regular,
    /// Signed with offline keys; may change membership, attributes,
    /// quorum and offline keys
    Sensitive,
}

/// Key metadata per AS
pub type AsToKeyMeta = BTreeMap<AsId, KeyMeta>;

/// Keys introduced or rotated by an update
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChanges {
    /// Keys with no predecessor for their AS and type
    pub fresh: BTreeMap<KeyType, AsToKeyMeta>,

    /// Keys replacing a previous key of the same AS and type
    pub modified: BTreeMap<KeyType, AsToKeyMeta>,
}

impl KeyChanges {
    /// Check if no key changed
    pub fn is_empty(&self) -> bool {
        self.fresh.values().all(|m| m.is_empty()) && self.modified.values().all(|m| m.is_empty())
    }

    /// Fresh key for an AS and type
    pub fn fresh_key(&self, id: &AsId, key_type: KeyType) -> Option<&KeyMeta> {
        self.fresh.get(&key_type).and_then(|m| m.get(id))
    }

    /// Modified key for an AS and type
    pub fn modified_key(&self, id: &AsId, key_type: KeyType) -> Option<&KeyMeta> {
        self.modified.get(&key_type).and_then(|m| m.get(id))
    }

    /// Check if the key of an AS and type is fresh or modified
    pub fn changed(&self, id: &AsId, key_type: KeyType) -> bool {
        self.fresh_key(id, key_type).is_some() || self.modified_key(id, key_type).is_some()
    }

    /// ASes with at least one fresh or modified key
    pub fn affected_ases(&self) -> BTreeSet<AsId> {
        self.fresh
            .values()
            .chain(self.modified.values())
            .flat_map(|m| m.keys().copied())
            .collect()
    }

    pub(crate) fn insert_fresh(&mut self, id: AsId, key_type: KeyType, meta: KeyMeta) {
        self.fresh.entry(key_type).or_default().insert(id, meta);
    }

    pub(crate) fn insert_modified(&mut self, id: AsId, key_type: KeyType, meta: KeyMeta) {
        self.modified.entry(key_type).or_default().insert(id, meta);
    }
}

/// Direction of an attribute change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttributeChange {
    /// Attribute granted
    Added,
    /// Attribute revoked
    Removed,
}

/// Attribute changes per AS
///
/// An AS that joins reports all of its attributes as added, one that
/// leaves reports all of them as removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeChanges(BTreeMap<AsId, BTreeMap<Attribute, AttributeChange>>);

impl AttributeChanges {
    /// Compute attribute changes over the union of primary ASes
    pub fn between(prev: &Trc, next: &Trc) -> Self {
        let ids: BTreeSet<AsId> = prev
            .primary_ases()
            .ids()
            .chain(next.primary_ases().ids())
            .collect();

        let mut changes = BTreeMap::new();
        for id in ids {
            let before = attribute_set(prev, &id);
            let after = attribute_set(next, &id);

            let mut per_as = BTreeMap::new();
            for attr in after.difference(&before) {
                per_as.insert(*attr, AttributeChange::Added);
            }
            for attr in before.difference(&after) {
                per_as.insert(*attr, AttributeChange::Removed);
            }
            if !per_as.is_empty() {
                changes.insert(id, per_as);
            }
        }
        Self(changes)
    }

    /// Check if no attribute changed
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Changes for one AS
    pub fn get(&self, id: &AsId) -> Option<&BTreeMap<Attribute, AttributeChange>> {
        self.0.get(id)
    }

    /// Change of one attribute of one AS
    pub fn change(&self, id: &AsId, attribute: Attribute) -> Option<AttributeChange> {
        self.0.get(id).and_then(|m| m.get(&attribute)).copied()
    }

    /// Iterate over ASes with changes
    pub fn iter(&self) -> impl Iterator<Item = (&AsId, &BTreeMap<Attribute, AttributeChange>)> {
        self.0.iter()
    }

    /// Number of ASes with changes
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn attribute_set(trc: &Trc, id: &AsId) -> BTreeSet<Attribute> {
    trc.primary_ases()
        .get(id)
        .map(|p| p.attributes.iter().collect())
        .unwrap_or_default()
}

/// Result of a successful update validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateInfo {
    /// Class of the update
    pub update_type: UpdateType,

    /// Fresh and modified keys
    pub key_changes: KeyChanges,

    /// Added and removed attributes
    pub attribute_changes: AttributeChanges,
}
