//! TRC (Trust Root Configuration) Types
//!
//! A TRC names the primary ASes of an isolation domain, their keys, and the
//! voting rules under which the document itself is amended. TRCs form a
//! lineage: each update carries `version = prev.version + 1` and keeps the
//! ISD, base version and trust reset flag of its predecessor.
//!
//! TRC values are immutable once built. Successors are derived with
//! [`TrcBuilder::successor_of`], which copies the predecessor into fresh
//! maps and applies declared changes on top, so a predecessor and its
//! successor never share state.

use crate::error::{Result, TrcError};
use crate::primary::{Attributes, PrimaryAs, PrimaryAses};
use crate::types::{AsId, Attribute, Isd, KeyMeta, KeyType, Validity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A vote cast by a voting AS on a TRC
///
/// Identifies which key signed and at which version, so the signature can be
/// checked elsewhere against the key recorded in the predecessor TRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Key type used to sign
    pub key_type: KeyType,

    /// Version of the signing key
    pub key_version: u64,
}

impl Vote {
    /// Create a vote
    pub fn new(key_type: KeyType, key_version: u64) -> Self {
        Self {
            key_type,
            key_version,
        }
    }

    /// Vote cast with the online key
    pub fn online(key_version: u64) -> Self {
        Self::new(KeyType::Online, key_version)
    }

    /// Vote cast with the offline key
    pub fn offline(key_version: u64) -> Self {
        Self::new(KeyType::Offline, key_version)
    }
}

/// Trust Root Configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trc {
    isd: Isd,
    version: u64,
    base_version: u64,
    #[serde(default)]
    description: String,
    validity: Validity,
    /// Seconds the predecessor stays acceptable after this TRC starts
    #[serde(rename = "grace_period", default)]
    grace_period_secs: u64,
    trust_reset_allowed: bool,
    voting_quorum: u32,
    primary_ases: PrimaryAses,
    #[serde(default)]
    votes: BTreeMap<AsId, Vote>,
    #[serde(default)]
    proof_of_possession: BTreeMap<AsId, BTreeSet<KeyType>>,
}

impl Trc {
    /// Create a builder for constructing TRCs
    pub fn builder() -> TrcBuilder {
        TrcBuilder::new()
    }

    /// Isolation domain governed by this TRC
    pub fn isd(&self) -> Isd {
        self.isd
    }

    /// Version within the lineage
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Version of the lineage's base TRC
    pub fn base_version(&self) -> u64 {
        self.base_version
    }

    /// Free-form description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Validity window
    pub fn validity(&self) -> &Validity {
        &self.validity
    }

    /// Grace period granted to the predecessor
    pub fn grace_period(&self) -> chrono::Duration {
        i64::try_from(self.grace_period_secs)
            .ok()
            .and_then(chrono::Duration::try_seconds)
            .unwrap_or(chrono::Duration::MAX)
    }

    /// Whether a trust reset is allowed for this lineage
    pub fn trust_reset_allowed(&self) -> bool {
        self.trust_reset_allowed
    }

    /// Number of votes required to accept the next TRC version
    pub fn voting_quorum(&self) -> u32 {
        self.voting_quorum
    }

    /// Primary ASes
    pub fn primary_ases(&self) -> &PrimaryAses {
        &self.primary_ases
    }

    /// Votes endorsing this TRC as successor of its predecessor
    pub fn votes(&self) -> &BTreeMap<AsId, Vote> {
        &self.votes
    }

    /// Key types each AS proves possession of in this TRC
    pub fn proof_of_possession(&self) -> &BTreeMap<AsId, BTreeSet<KeyType>> {
        &self.proof_of_possession
    }

    /// Key types the AS proves possession of, empty if none
    pub fn proven_keys(&self, id: &AsId) -> BTreeSet<KeyType> {
        self.proof_of_possession.get(id).cloned().unwrap_or_default()
    }

    /// Check if this TRC starts a lineage rather than updating one
    pub fn is_base(&self) -> bool {
        self.version == self.base_version
    }

    /// Key metadata for an AS and key type
    pub fn key_meta(&self, id: &AsId, key_type: KeyType) -> Option<&KeyMeta> {
        self.primary_ases.key_meta(id, key_type)
    }

    /// Identifiers of the voting ASes
    pub fn voting_ases(&self) -> BTreeSet<AsId> {
        self.primary_ases.with_attribute(Attribute::Voting).collect()
    }

    /// Instant until which the predecessor remains acceptable
    pub fn grace_period_end(&self) -> DateTime<Utc> {
        self.validity
            .not_before
            .checked_add_signed(self.grace_period())
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }

    /// Check whether this TRC is inside its validity window at `now`
    pub fn is_active_at(&self, now: DateTime<Utc>) -> bool {
        self.validity.is_valid_at(now)
    }

    /// Check structural well-formedness
    ///
    /// Validation of updates does not depend on this; it is a convenience
    /// for producers that want to reject malformed documents early.
    pub fn check_structure(&self) -> Result<()> {
        if !self.validity.is_well_formed() {
            return Err(TrcError::Structure(format!(
                "not_before {} is not before not_after {}",
                self.validity.not_before, self.validity.not_after
            )));
        }
        if self.version == 0 || self.base_version == 0 {
            return Err(TrcError::Structure("versions start at 1".into()));
        }
        if self.base_version > self.version {
            return Err(TrcError::Structure(format!(
                "base version {} is newer than version {}",
                self.base_version, self.version
            )));
        }
        let voters = self.primary_ases.count(Attribute::Voting);
        if self.voting_quorum == 0 || self.voting_quorum as usize > voters {
            return Err(TrcError::Structure(format!(
                "voting quorum {} outside [1, {}]",
                self.voting_quorum, voters
            )));
        }
        self.primary_ases.check_keys()
    }

    /// Serialize to JSON bytes
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self).map_err(TrcError::from)
    }

    /// Deserialize from JSON bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(TrcError::from)
    }
}

/// Builder for constructing TRC instances
///
/// # Example
///
/// ```ignore
/// let next = TrcBuilder::successor_of(&prev)
///     .validity(Validity::starting_at(start, Duration::days(365)))
///     .set_key(as_110, KeyType::Issuing, KeyMeta::ed25519(2, new_key))
///     .prove_possession(as_110, KeyType::Issuing)
///     .vote(as_110, Vote::online(1))
///     .build()?;
/// ```
#[derive(Debug, Default)]
pub struct TrcBuilder {
    isd: Option<Isd>,
    version: Option<u64>,
    base_version: Option<u64>,
    description: String,
    validity: Option<Validity>,
    grace_period_secs: u64,
    trust_reset_allowed: bool,
    voting_quorum: u32,
    primary_ases: PrimaryAses,
    votes: BTreeMap<AsId, Vote>,
    proof_of_possession: BTreeMap<AsId, BTreeSet<KeyType>>,
    error: Option<TrcError>,
}

impl TrcBuilder {
    /// Create a new TRC builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a successor of `prev`
    ///
    /// Version is `prev.version + 1`; everything else is copied except the
    /// votes and proofs of possession, which belong to `prev` itself. A
    /// predecessor at `u64::MAX` has no successor and `build` fails.
    pub fn successor_of(prev: &Trc) -> Self {
        let version = prev.version.checked_add(1);
        Self {
            isd: Some(prev.isd),
            version,
            base_version: Some(prev.base_version),
            description: prev.description.clone(),
            validity: Some(prev.validity),
            grace_period_secs: prev.grace_period_secs,
            trust_reset_allowed: prev.trust_reset_allowed,
            voting_quorum: prev.voting_quorum,
            primary_ases: prev.primary_ases.clone(),
            votes: BTreeMap::new(),
            proof_of_possession: BTreeMap::new(),
            error: version.is_none().then(|| {
                TrcError::Structure(format!("version {} has no successor", prev.version))
            }),
        }
    }

    /// Set the isolation domain
    pub fn isd(mut self, isd: Isd) -> Self {
        self.isd = Some(isd);
        self
    }

    /// Set the version
    pub fn version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Set the base version (defaults to the version, i.e. a base TRC)
    pub fn base_version(mut self, base_version: u64) -> Self {
        self.base_version = Some(base_version);
        self
    }

    /// Set the description
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the validity window
    pub fn validity(mut self, validity: Validity) -> Self {
        self.validity = Some(validity);
        self
    }

    /// Set the grace period; negative durations clamp to zero
    pub fn grace_period(mut self, grace_period: chrono::Duration) -> Self {
        self.grace_period_secs = u64::try_from(grace_period.num_seconds()).unwrap_or(0);
        self
    }

    /// Set the trust reset flag
    pub fn trust_reset_allowed(mut self, allowed: bool) -> Self {
        self.trust_reset_allowed = allowed;
        self
    }

    /// Set the voting quorum for the next update
    pub fn voting_quorum(mut self, quorum: u32) -> Self {
        self.voting_quorum = quorum;
        self
    }

    /// Add or replace a primary AS
    pub fn primary(mut self, id: AsId, primary: PrimaryAs) -> Self {
        self.primary_ases.insert(id, primary);
        self
    }

    /// Remove a primary AS
    pub fn remove_primary(mut self, id: AsId) -> Self {
        self.primary_ases.remove(&id);
        self
    }

    /// Replace the attributes of an existing primary AS, keeping its keys
    pub fn set_attributes(self, id: AsId, attributes: impl Into<Attributes>) -> Self {
        let attributes = attributes.into();
        self.modify_primary(id, |primary| primary.attributes = attributes)
    }

    /// Set a key of an existing primary AS
    pub fn set_key(self, id: AsId, key_type: KeyType, meta: KeyMeta) -> Self {
        self.modify_primary(id, |primary| {
            primary.keys.insert(key_type, meta);
        })
    }

    /// Remove a key of an existing primary AS
    pub fn remove_key(self, id: AsId, key_type: KeyType) -> Self {
        self.modify_primary(id, |primary| {
            primary.keys.remove(&key_type);
        })
    }

    /// Record a vote
    pub fn vote(mut self, id: AsId, vote: Vote) -> Self {
        self.votes.insert(id, vote);
        self
    }

    /// Drop a vote
    pub fn remove_vote(mut self, id: AsId) -> Self {
        self.votes.remove(&id);
        self
    }

    /// Drop all votes
    pub fn clear_votes(mut self) -> Self {
        self.votes.clear();
        self
    }

    /// Record proof of possession of a key
    pub fn prove_possession(mut self, id: AsId, key_type: KeyType) -> Self {
        self.proof_of_possession
            .entry(id)
            .or_default()
            .insert(key_type);
        self
    }

    /// Drop all proofs of possession for an AS
    pub fn clear_proofs(mut self, id: AsId) -> Self {
        self.proof_of_possession.remove(&id);
        self
    }

    fn modify_primary(mut self, id: AsId, f: impl FnOnce(&mut PrimaryAs)) -> Self {
        match self.primary_ases.get_mut(&id) {
            Some(primary) => f(primary),
            None => {
                self.error
                    .get_or_insert_with(|| TrcError::MissingField(format!("primary AS {}", id)));
            }
        }
        self
    }

    /// Build the TRC
    ///
    /// Returns an error if required fields are missing or a change referred
    /// to an AS that is not a primary AS.
    pub fn build(self) -> Result<Trc> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let isd = self.isd.ok_or(TrcError::MissingField("isd".into()))?;
        let version = self
            .version
            .ok_or(TrcError::MissingField("version".into()))?;
        let validity = self
            .validity
            .ok_or(TrcError::MissingField("validity".into()))?;

        Ok(Trc {
            isd,
            version,
            base_version: self.base_version.unwrap_or(version),
            description: self.description,
            validity,
            grace_period_secs: self.grace_period_secs,
            trust_reset_allowed: self.trust_reset_allowed,
            voting_quorum: self.voting_quorum,
            primary_ases: self.primary_ases,
            votes: self.votes,
            proof_of_possession: self.proof_of_possession,
        })
    }
}
