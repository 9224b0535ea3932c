//! Key changes and proof of possession
//!
//! A key's version increases by exactly one when its material changes and
//! stays put otherwise; a key new to its AS starts at version 1. Every
//! fresh or rotated key must come with proof of possession, and proofs may
//! only be listed for keys that actually changed.

use crate::error::UpdateError;
use crate::info::KeyChanges;
use trustroot_core::{AsId, KeyMeta, KeyMismatch, KeyType, Trc};

/// How a key of `next` relates to the same AS and key type in `prev`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaKind {
    /// No key of this type for this AS in `prev`
    Fresh,
    /// Different key material
    Modified,
    /// Same material, different version
    VersionOnly,
}

/// One key that differs between `prev` and `next`
#[derive(Debug, Clone, Copy)]
pub struct KeyDelta<'a> {
    pub as_id: AsId,
    pub key_type: KeyType,
    pub kind: DeltaKind,
    pub prev: Option<&'a KeyMeta>,
    pub next: &'a KeyMeta,
}

/// Collect every key of `next` that differs from `prev`, in AS order
///
/// Keys removed in `next` are not deltas; dropping a key needs no proof.
pub fn key_deltas<'a>(prev: &'a Trc, next: &'a Trc) -> Vec<KeyDelta<'a>> {
    let mut deltas = Vec::new();
    for (as_id, primary) in next.primary_ases() {
        for (key_type, meta) in &primary.keys {
            let old = prev.key_meta(as_id, *key_type);
            let kind = match old {
                None => DeltaKind::Fresh,
                Some(old) if !old.same_material(meta) => DeltaKind::Modified,
                Some(old) if old.key_version != meta.key_version => DeltaKind::VersionOnly,
                Some(_) => continue,
            };
            deltas.push(KeyDelta {
                as_id: *as_id,
                key_type: *key_type,
                kind,
                prev: old,
                next: meta,
            });
        }
    }
    deltas
}

/// Check key sets, key versions and proofs of possession of `next`
pub fn validate_key_changes(
    next: &Trc,
    deltas: &[KeyDelta<'_>],
) -> Result<KeyChanges, UpdateError> {
    for (as_id, primary) in next.primary_ases() {
        primary.check_keys().map_err(|mismatch| match mismatch {
            KeyMismatch::Missing(key_type) => UpdateError::MissingKey {
                as_id: *as_id,
                key_type,
            },
            KeyMismatch::Unexpected(key_type) => UpdateError::UnexpectedKey {
                as_id: *as_id,
                key_type,
            },
        })?;
    }

    let mut changes = KeyChanges::default();
    for delta in deltas {
        let expected = match (delta.kind, delta.prev) {
            (DeltaKind::Fresh, _) | (_, None) => Some(1),
            (DeltaKind::Modified, Some(old)) => old.key_version.checked_add(1),
            (DeltaKind::VersionOnly, Some(old)) => Some(old.key_version),
        };
        if expected != Some(delta.next.key_version) {
            return Err(UpdateError::InvalidKeyVersion {
                as_id: delta.as_id,
                key_type: delta.key_type,
                expected,
                actual: delta.next.key_version,
            });
        }

        match delta.kind {
            DeltaKind::Fresh => {
                changes.insert_fresh(delta.as_id, delta.key_type, delta.next.clone())
            }
            DeltaKind::Modified => {
                changes.insert_modified(delta.as_id, delta.key_type, delta.next.clone())
            }
            DeltaKind::VersionOnly => {}
        }
    }

    for delta in deltas {
        let proven = next
            .proof_of_possession()
            .get(&delta.as_id)
            .is_some_and(|kts| kts.contains(&delta.key_type));
        if !proven {
            return Err(UpdateError::MissingProofOfPossession {
                as_id: delta.as_id,
                key_type: delta.key_type,
            });
        }
    }

    for (as_id, key_types) in next.proof_of_possession() {
        if let Some(key_type) = key_types.iter().find(|kt| !changes.changed(as_id, **kt)) {
            return Err(UpdateError::UnexpectedProofOfPossession {
                as_id: *as_id,
                key_type: *key_type,
            });
        }
    }

    Ok(changes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use trustroot_core::{Attribute, Isd, PrimaryAs, TrcBuilder, Validity};

    fn as_id() -> AsId {
        "ff00:0:130".parse().unwrap()
    }

    fn base() -> Trc {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Trc::builder()
            .isd(Isd(1))
            .version(1)
            .validity(Validity::starting_at(start, Duration::days(365)))
            .voting_quorum(1)
            .primary(
                as_id(),
                PrimaryAs::new([Attribute::Issuing, Attribute::Core])
                    .with_key(KeyType::Issuing, KeyMeta::ed25519(1, vec![2, 130, 1])),
            )
            .build()
            .unwrap()
    }

    #[test]
    fn test_no_deltas_for_identical_keys() {
        let prev = base();
        let next = TrcBuilder::successor_of(&prev).build().unwrap();
        assert!(key_deltas(&prev, &next).is_empty());
        assert_eq!(validate_key_changes(&next, &[]), Ok(KeyChanges::default()));
    }

    #[test]
    fn test_delta_kinds() {
        let prev = base();

        let rotated = TrcBuilder::successor_of(&prev)
            .set_key(as_id(), KeyType::Issuing, KeyMeta::ed25519(2, vec![2, 130, 2]))
            .build()
            .unwrap();
        let deltas = key_deltas(&prev, &rotated);
        assert_eq!(deltas.len(), 1);
        assert_eq!(deltas[0].kind, DeltaKind::Modified);

        let bumped = TrcBuilder::successor_of(&prev)
            .set_key(as_id(), KeyType::Issuing, KeyMeta::ed25519(2, vec![2, 130, 1]))
            .build()
            .unwrap();
        assert_eq!(key_deltas(&prev, &bumped)[0].kind, DeltaKind::VersionOnly);
    }

    #[test]
    fn test_version_bump_without_new_material() {
        let prev = base();
        let next = TrcBuilder::successor_of(&prev)
            .set_key(as_id(), KeyType::Issuing, KeyMeta::ed25519(2, vec![2, 130, 1]))
            .prove_possession(as_id(), KeyType::Issuing)
            .build()
            .unwrap();

        let deltas = key_deltas(&prev, &next);
        assert_eq!(
            validate_key_changes(&next, &deltas),
            Err(UpdateError::InvalidKeyVersion {
                as_id: as_id(),
                key_type: KeyType::Issuing,
                expected: Some(1),
                actual: 2,
            })
        );
    }

    #[test]
    fn test_new_material_without_version_bump() {
        let prev = base();
        let next = TrcBuilder::successor_of(&prev)
            .set_key(as_id(), KeyType::Issuing, KeyMeta::ed25519(1, vec![2, 130, 9]))
            .prove_possession(as_id(), KeyType::Issuing)
            .build()
            .unwrap();

        let deltas = key_deltas(&prev, &next);
        assert_eq!(
            validate_key_changes(&next, &deltas),
            Err(UpdateError::InvalidKeyVersion {
                as_id: as_id(),
                key_type: KeyType::Issuing,
                expected: Some(2),
                actual: 1,
            })
        );
    }

    #[test]
    fn test_rotation_past_last_key_version() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let prev = Trc::builder()
            .isd(Isd(1))
            .version(1)
            .validity(Validity::starting_at(start, Duration::days(365)))
            .voting_quorum(1)
            .primary(
                as_id(),
                PrimaryAs::new([Attribute::Issuing, Attribute::Core])
                    .with_key(KeyType::Issuing, KeyMeta::ed25519(u64::MAX, vec![2, 130, 1])),
            )
            .build()
            .unwrap();
        let next = TrcBuilder::successor_of(&prev)
            .set_key(as_id(), KeyType::Issuing, KeyMeta::ed25519(u64::MAX, vec![9, 9, 9]))
            .prove_possession(as_id(), KeyType::Issuing)
            .build()
            .unwrap();

        let deltas = key_deltas(&prev, &next);
        assert_eq!(deltas[0].kind, DeltaKind::Modified);
        assert_eq!(
            validate_key_changes(&next, &deltas),
            Err(UpdateError::InvalidKeyVersion {
                as_id: as_id(),
                key_type: KeyType::Issuing,
                expected: None,
                actual: u64::MAX,
            })
        );
    }

    #[test]
    fn test_rotation_with_proof() {
        let prev = base();
        let next = TrcBuilder::successor_of(&prev)
            .set_key(as_id(), KeyType::Issuing, KeyMeta::ed25519(2, vec![2, 130, 2]))
            .prove_possession(as_id(), KeyType::Issuing)
            .build()
            .unwrap();

        let deltas = key_deltas(&prev, &next);
        let changes = validate_key_changes(&next, &deltas).unwrap();
        assert!(changes.modified_key(&as_id(), KeyType::Issuing).is_some());
        assert!(changes.fresh.is_empty());
    }
}
