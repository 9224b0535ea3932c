//! Common types used across the TRC document model

use crate::error::{Result, TrcError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest AS number that is displayed in decimal (BGP) notation
const MAX_BGP_AS: u64 = u32::MAX as u64;

/// Largest valid AS number (48 bits)
pub const MAX_AS: u64 = (1 << 48) - 1;

/// Isolation domain identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Isd(pub u16);

impl fmt::Display for Isd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Autonomous system identifier
///
/// Values in the BGP range print as decimal, everything else as three
/// colon-separated hex groups (`ff00:0:110`). Both forms parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AsId(u64);

impl AsId {
    /// Create an AS identifier, rejecting values wider than 48 bits
    pub fn new(value: u64) -> Result<Self> {
        if value > MAX_AS {
            return Err(TrcError::InvalidAsId(format!(
                "{} exceeds the 48-bit AS range",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Raw numeric value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for AsId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 <= MAX_BGP_AS {
            return write!(f, "{}", self.0);
        }
        write!(
            f,
            "{:x}:{:x}:{:x}",
            (self.0 >> 32) & 0xffff,
            (self.0 >> 16) & 0xffff,
            self.0 & 0xffff
        )
    }
}

impl FromStr for AsId {
    type Err = TrcError;

    fn from_str(s: &str) -> Result<Self> {
        if !s.contains(':') {
            // `u64::from_str` takes a leading '+'
            if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
                return Err(TrcError::InvalidAsId(format!("'{}' is not a number", s)));
            }
            let value: u64 = s
                .parse()
                .map_err(|_| TrcError::InvalidAsId(format!("'{}' is not a number", s)))?;
            if value > MAX_BGP_AS {
                return Err(TrcError::InvalidAsId(format!(
                    "decimal AS '{}' exceeds the BGP range",
                    s
                )));
            }
            return Ok(Self(value));
        }

        let groups: Vec<&str> = s.split(':').collect();
        if groups.len() != 3 {
            return Err(TrcError::InvalidAsId(format!(
                "expected 3 hex groups, got '{}'",
                s
            )));
        }

        let mut value = 0u64;
        for group in groups {
            if group.is_empty()
                || group.len() > 4
                || !group.bytes().all(|b| b.is_ascii_hexdigit())
            {
                return Err(TrcError::InvalidAsId(format!("bad hex group in '{}'", s)));
            }
            let part = u16::from_str_radix(group, 16)
                .map_err(|_| TrcError::InvalidAsId(format!("bad hex group in '{}'", s)))?;
            value = (value << 16) | u64::from(part);
        }
        Ok(Self(value))
    }
}

impl TryFrom<String> for AsId {
    type Error = TrcError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<AsId> for String {
    fn from(id: AsId) -> Self {
        id.to_string()
    }
}

/// Key types held by primary ASes
///
/// Online and offline keys are the two voting keys: online keys sign
/// regular updates, offline keys sign sensitive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// Online voting key
    Online,
    /// Offline voting key
    Offline,
    /// Issuing key for AS certificates
    Issuing,
}

impl KeyType {
    /// All key types, in canonical order
    pub const ALL: [KeyType; 3] = [KeyType::Online, KeyType::Offline, KeyType::Issuing];

    /// Whether votes may be cast with this key type
    pub fn is_voting_key(&self) -> bool {
        matches!(self, KeyType::Online | KeyType::Offline)
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            KeyType::Online => "online",
            KeyType::Offline => "offline",
            KeyType::Issuing => "issuing",
        };
        f.write_str(name)
    }
}

/// Role markers on a primary AS
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Attribute {
    /// Core AS
    Core,
    /// Authoritative AS
    Authoritative,
    /// Issues AS certificates
    Issuing,
    /// Votes on TRC updates
    Voting,
}

impl Attribute {
    /// Key types an AS must hold because of this attribute
    pub fn required_keys(&self) -> &'static [KeyType] {
        match self {
            Attribute::Voting => &[KeyType::Online, KeyType::Offline],
            Attribute::Issuing => &[KeyType::Issuing],
            Attribute::Core | Attribute::Authoritative => &[],
        }
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Attribute::Core => "core",
            Attribute::Authoritative => "authoritative",
            Attribute::Issuing => "issuing",
            Attribute::Voting => "voting",
        };
        f.write_str(name)
    }
}

/// Signature algorithm of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    /// Ed25519
    Ed25519,
    /// ECDSA over P-256
    EcdsaP256,
    /// ECDSA over P-384
    EcdsaP384,
}

/// Metadata for one key held by a primary AS
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyMeta {
    /// Version of this key, starting at 1
    pub key_version: u64,

    /// Signature algorithm
    pub algorithm: Algorithm,

    /// Raw public key bytes
    #[serde(with = "serde_bytes_base64")]
    pub key: Vec<u8>,
}

impl KeyMeta {
    /// Create key metadata
    pub fn new(key_version: u64, algorithm: Algorithm, key: impl Into<Vec<u8>>) -> Self {
        Self {
            key_version,
            algorithm,
            key: key.into(),
        }
    }

    /// Create Ed25519 key metadata
    pub fn ed25519(key_version: u64, key: impl Into<Vec<u8>>) -> Self {
        Self::new(key_version, Algorithm::Ed25519, key)
    }

    /// Whether both metas describe the same key material, ignoring the version
    pub fn same_material(&self, other: &KeyMeta) -> bool {
        self.algorithm == other.algorithm && self.key == other.key
    }
}

/// Base64 serialization for key bytes
mod serde_bytes_base64 {
    use base64::{engine::general_purpose::STANDARD, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<u8>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        STANDARD.decode(&s).map_err(serde::de::Error::custom)
    }
}

/// Validity window of a TRC: `[not_before, not_after)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Validity {
    /// First instant the TRC is valid
    pub not_before: DateTime<Utc>,

    /// Instant the TRC stops being valid
    pub not_after: DateTime<Utc>,
}

impl Validity {
    /// Create a validity window
    pub fn new(not_before: DateTime<Utc>, not_after: DateTime<Utc>) -> Self {
        Self {
            not_before,
            not_after,
        }
    }

    /// Window starting at `not_before` and lasting `duration`
    pub fn starting_at(not_before: DateTime<Utc>, duration: chrono::Duration) -> Self {
        Self::new(not_before, not_before + duration)
    }

    /// Check that the window is non-empty
    pub fn is_well_formed(&self) -> bool {
        self.not_before < self.not_after
    }

    /// Check whether `t` lies inside the window, both ends inclusive
    ///
    /// Used for lineage continuity: a successor may start exactly when its
    /// predecessor expires.
    pub fn contains(&self, t: DateTime<Utc>) -> bool {
        self.not_before <= t && t <= self.not_after
    }

    /// Check whether the window is active at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.not_before <= now && now < self.not_after
    }
}
