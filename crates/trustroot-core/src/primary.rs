//! Primary AS entries of a TRC
//!
//! A primary AS holds a set of attributes and exactly the keys those
//! attributes call for: voting ASes hold an online and an offline key,
//! issuing ASes hold an issuing key.

use crate::error::{Result, TrcError};
use crate::types::{AsId, Attribute, KeyMeta, KeyType};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Ordered set of attributes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeSet<Attribute>);

impl Attributes {
    /// Create an empty attribute set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute (builder pattern)
    pub fn with(mut self, attribute: Attribute) -> Self {
        self.0.insert(attribute);
        self
    }

    /// Check if the attribute is present
    pub fn contains(&self, attribute: Attribute) -> bool {
        self.0.contains(&attribute)
    }

    /// Iterate in canonical order
    pub fn iter(&self) -> impl Iterator<Item = Attribute> + '_ {
        self.0.iter().copied()
    }

    /// Get the number of attributes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key types required by these attributes
    pub fn required_keys(&self) -> BTreeSet<KeyType> {
        self.0
            .iter()
            .flat_map(|attr| attr.required_keys().iter().copied())
            .collect()
    }
}

impl<const N: usize> From<[Attribute; N]> for Attributes {
    fn from(attributes: [Attribute; N]) -> Self {
        Self(attributes.into_iter().collect())
    }
}

impl FromIterator<Attribute> for Attributes {
    fn from_iter<I: IntoIterator<Item = Attribute>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// One authority's standing within a TRC
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrimaryAs {
    /// Roles held by the AS
    pub attributes: Attributes,

    /// Keys held by the AS
    #[serde(default)]
    pub keys: BTreeMap<KeyType, KeyMeta>,
}

impl PrimaryAs {
    /// Create a primary AS with no keys
    pub fn new(attributes: impl Into<Attributes>) -> Self {
        Self {
            attributes: attributes.into(),
            keys: BTreeMap::new(),
        }
    }

    /// Add a key (builder pattern)
    pub fn with_key(mut self, key_type: KeyType, meta: KeyMeta) -> Self {
        self.keys.insert(key_type, meta);
        self
    }

    /// Check if the AS holds an attribute
    pub fn is(&self, attribute: Attribute) -> bool {
        self.attributes.contains(attribute)
    }

    /// Get a key by type
    pub fn key(&self, key_type: KeyType) -> Option<&KeyMeta> {
        self.keys.get(&key_type)
    }

    /// Key types this AS must hold, derived from its attributes
    pub fn required_key_types(&self) -> BTreeSet<KeyType> {
        self.attributes.required_keys()
    }

    /// Check that the key set matches the attributes exactly
    pub fn check_keys(&self) -> std::result::Result<(), KeyMismatch> {
        let required = self.required_key_types();
        if let Some(missing) = required.iter().find(|kt| !self.keys.contains_key(kt)) {
            return Err(KeyMismatch::Missing(*missing));
        }
        if let Some(extra) = self.keys.keys().find(|kt| !required.contains(kt)) {
            return Err(KeyMismatch::Unexpected(*extra));
        }
        Ok(())
    }
}

/// How a primary AS's key set disagrees with its attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyMismatch {
    /// A key required by an attribute is absent
    Missing(KeyType),
    /// A key is present that no attribute requires
    Unexpected(KeyType),
}

/// Primary ASes of a TRC, keyed by AS identifier
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrimaryAses(BTreeMap<AsId, PrimaryAs>);

impl PrimaryAses {
    /// Create an empty set of primary ASes
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an AS entry
    pub fn get(&self, id: &AsId) -> Option<&PrimaryAs> {
        self.0.get(id)
    }

    /// Check if the AS is a primary AS
    pub fn contains(&self, id: &AsId) -> bool {
        self.0.contains_key(id)
    }

    /// Insert or replace an AS entry, returning the previous one
    pub fn insert(&mut self, id: AsId, primary: PrimaryAs) -> Option<PrimaryAs> {
        self.0.insert(id, primary)
    }

    /// Remove an AS entry
    pub fn remove(&mut self, id: &AsId) -> Option<PrimaryAs> {
        self.0.remove(id)
    }

    /// Mutable access to an AS entry
    pub(crate) fn get_mut(&mut self, id: &AsId) -> Option<&mut PrimaryAs> {
        self.0.get_mut(id)
    }

    /// Count the ASes holding an attribute
    pub fn count(&self, attribute: Attribute) -> usize {
        self.0.values().filter(|p| p.is(attribute)).count()
    }

    /// Identifiers of the ASes holding an attribute
    pub fn with_attribute(&self, attribute: Attribute) -> impl Iterator<Item = AsId> + '_ {
        self.0
            .iter()
            .filter(move |(_, p)| p.is(attribute))
            .map(|(id, _)| *id)
    }

    /// Key metadata for an AS and key type
    pub fn key_meta(&self, id: &AsId, key_type: KeyType) -> Option<&KeyMeta> {
        self.0.get(id).and_then(|p| p.key(key_type))
    }

    /// Iterate over AS entries in identifier order
    pub fn iter(&self) -> impl Iterator<Item = (&AsId, &PrimaryAs)> {
        self.0.iter()
    }

    /// Identifiers in order
    pub fn ids(&self) -> impl Iterator<Item = AsId> + '_ {
        self.0.keys().copied()
    }

    /// Get the number of primary ASes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check every entry's key set against its attributes
    pub fn check_keys(&self) -> Result<()> {
        for (id, primary) in &self.0 {
            primary.check_keys().map_err(|mismatch| {
                TrcError::Structure(match mismatch {
                    KeyMismatch::Missing(kt) => format!("AS {} is missing its {} key", id, kt),
                    KeyMismatch::Unexpected(kt) => {
                        format!("AS {} holds an unneeded {} key", id, kt)
                    }
                })
            })?;
        }
        Ok(())
    }
}

impl FromIterator<(AsId, PrimaryAs)> for PrimaryAses {
    fn from_iter<I: IntoIterator<Item = (AsId, PrimaryAs)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a PrimaryAses {
    type Item = (&'a AsId, &'a PrimaryAs);
    type IntoIter = std::collections::btree_map::Iter<'a, AsId, PrimaryAs>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn voting_as() -> PrimaryAs {
        PrimaryAs::new([Attribute::Voting, Attribute::Core])
            .with_key(KeyType::Online, KeyMeta::ed25519(1, vec![0, 1]))
            .with_key(KeyType::Offline, KeyMeta::ed25519(1, vec![1, 1]))
    }

    #[test]
    fn test_required_key_types() {
        let primary = PrimaryAs::new([Attribute::Voting, Attribute::Issuing]);
        let required: Vec<_> = primary.required_key_types().into_iter().collect();
        assert_eq!(
            required,
            vec![KeyType::Online, KeyType::Offline, KeyType::Issuing]
        );
    }

    #[test]
    fn test_check_keys() {
        assert_eq!(voting_as().check_keys(), Ok(()));

        let mut missing = voting_as();
        missing.keys.remove(&KeyType::Offline);
        assert_eq!(
            missing.check_keys(),
            Err(KeyMismatch::Missing(KeyType::Offline))
        );

        let extra = voting_as().with_key(KeyType::Issuing, KeyMeta::ed25519(1, vec![2, 1]));
        assert_eq!(
            extra.check_keys(),
            Err(KeyMismatch::Unexpected(KeyType::Issuing))
        );
    }

    #[test]
    fn test_count_and_lookup() {
        let a: AsId = "ff00:0:110".parse().unwrap();
        let b: AsId = "ff00:0:120".parse().unwrap();
        let ases: PrimaryAses = [
            (a, voting_as()),
            (b, PrimaryAs::new([Attribute::Authoritative])),
        ]
        .into_iter()
        .collect();

        assert_eq!(ases.count(Attribute::Voting), 1);
        assert_eq!(ases.count(Attribute::Core), 1);
        assert_eq!(ases.with_attribute(Attribute::Voting).collect::<Vec<_>>(), vec![a]);
        assert_eq!(ases.key_meta(&a, KeyType::Online).map(|m| m.key_version), Some(1));
        assert!(ases.key_meta(&b, KeyType::Online).is_none());
        assert!(ases.check_keys().is_ok());
    }
}
