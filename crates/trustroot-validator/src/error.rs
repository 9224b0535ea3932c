//! Update rejection reasons
//!
//! Every rejection is final: the candidate TRC is discarded and the
//! previous TRC stays the active trust anchor. Each variant carries enough
//! context for audit logging.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use trustroot_core::{AsId, Isd, KeyType};

/// Why a candidate TRC is not a valid update of its predecessor
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    // Lineage invariants
    #[error("TRC version {version} is a base TRC, not an update")]
    BaseNotUpdate { version: u64 },

    #[error("Invalid validity period: not_before {not_before} is not before not_after {not_after}")]
    InvalidValidityPeriod {
        not_before: DateTime<Utc>,
        not_after: DateTime<Utc>,
    },

    #[error("ISD is immutable: expected {expected}, got {actual}")]
    ImmutableIsd { expected: Isd, actual: Isd },

    /// `expected` is `None` once the predecessor sits at `u64::MAX`
    #[error("Invalid version increment: expected {}, got {actual}", successor(.expected))]
    InvalidVersionIncrement { expected: Option<u64>, actual: u64 },

    #[error("Trust reset flag is immutable: expected {expected}, got {actual}")]
    ImmutableTrustResetAllowed { expected: bool, actual: bool },

    #[error("Base version is immutable: expected {expected}, got {actual}")]
    ImmutableBaseVersion { expected: u64, actual: u64 },

    #[error("not_before {not_before} outside previous validity [{prev_not_before}, {prev_not_after}]")]
    NotInsidePreviousValidityPeriod {
        not_before: DateTime<Utc>,
        prev_not_before: DateTime<Utc>,
        prev_not_after: DateTime<Utc>,
    },

    // Quorum field
    #[error("Voting quorum must be at least 1")]
    ZeroVotingQuorum,

    #[error("Voting quorum {quorum} exceeds the {voters} voting ASes")]
    VotingQuorumTooLarge { quorum: u32, voters: usize },

    // Voting
    #[error("AS {as_id} voted without holding the voting attribute")]
    NoVotingRight { as_id: AsId },

    #[error("AS {as_id} voted but is not a primary AS of the previous TRC")]
    UnexpectedVote { as_id: AsId },

    #[error("AS {as_id} voted with its {actual} key, expected {expected}")]
    WrongVotingKeyType {
        as_id: AsId,
        expected: KeyType,
        actual: KeyType,
    },

    #[error("AS {as_id} voted with {key_type} key version {actual}, recorded version is {expected:?}")]
    WrongVotingKeyVersion {
        as_id: AsId,
        key_type: KeyType,
        expected: Option<u64>,
        actual: u64,
    },

    #[error("Quorum unmet: {votes} votes, {quorum} required")]
    QuorumUnmet { votes: usize, quorum: u32 },

    #[error("AS {as_id} must vote with its {key_type} key")]
    MissingVote { as_id: AsId, key_type: KeyType },

    // Keys and proof of possession
    #[error("AS {as_id} did not prove possession of its new {key_type} key")]
    MissingProofOfPossession { as_id: AsId, key_type: KeyType },

    #[error("AS {as_id} proved possession of an unchanged {key_type} key")]
    UnexpectedProofOfPossession { as_id: AsId, key_type: KeyType },

    #[error("AS {as_id} is missing its {key_type} key")]
    MissingKey { as_id: AsId, key_type: KeyType },

    #[error("AS {as_id} holds a {key_type} key its attributes do not require")]
    UnexpectedKey { as_id: AsId, key_type: KeyType },

    #[error("AS {as_id} {key_type} key has version {actual}, expected {}", successor(.expected))]
    InvalidKeyVersion {
        as_id: AsId,
        key_type: KeyType,
        expected: Option<u64>,
        actual: u64,
    },
}

fn successor(expected: &Option<u64>) -> String {
    match expected {
        Some(version) => version.to_string(),
        None => "none (version space exhausted)".to_string(),
    }
}

/// Grouping of rejection reasons for audit logs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Version, validity and immutable-field continuity
    Lineage,
    /// Range of the voting quorum field
    QuorumField,
    /// Voter rights, vote keys and quorum
    Voting,
    /// Key sets, key versions and proof of possession
    KeyPossession,
}

impl UpdateError {
    /// Category of this rejection
    pub fn category(&self) -> ErrorCategory {
        match self {
            UpdateError::BaseNotUpdate { .. }
            | UpdateError::InvalidValidityPeriod { .. }
            | UpdateError::ImmutableIsd { .. }
            | UpdateError::InvalidVersionIncrement { .. }
            | UpdateError::ImmutableTrustResetAllowed { .. }
            | UpdateError::ImmutableBaseVersion { .. }
            | UpdateError::NotInsidePreviousValidityPeriod { .. } => ErrorCategory::Lineage,
            UpdateError::ZeroVotingQuorum | UpdateError::VotingQuorumTooLarge { .. } => {
                ErrorCategory::QuorumField
            }
            UpdateError::NoVotingRight { .. }
            | UpdateError::UnexpectedVote { .. }
            | UpdateError::WrongVotingKeyType { .. }
            | UpdateError::WrongVotingKeyVersion { .. }
            | UpdateError::QuorumUnmet { .. }
            | UpdateError::MissingVote { .. } => ErrorCategory::Voting,
            UpdateError::MissingProofOfPossession { .. }
            | UpdateError::UnexpectedProofOfPossession { .. }
            | UpdateError::MissingKey { .. }
            | UpdateError::UnexpectedKey { .. }
            | UpdateError::InvalidKeyVersion { .. } => ErrorCategory::KeyPossession,
        }
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            UpdateError::BaseNotUpdate { .. } => "BASE_NOT_UPDATE",
            UpdateError::InvalidValidityPeriod { .. } => "INVALID_VALIDITY_PERIOD",
            UpdateError::ImmutableIsd { .. } => "IMMUTABLE_ISD",
            UpdateError::InvalidVersionIncrement { .. } => "INVALID_VERSION_INCREMENT",
            UpdateError::ImmutableTrustResetAllowed { .. } => "IMMUTABLE_TRUST_RESET_ALLOWED",
            UpdateError::ImmutableBaseVersion { .. } => "IMMUTABLE_BASE_VERSION",
            UpdateError::NotInsidePreviousValidityPeriod { .. } => {
                "NOT_INSIDE_PREVIOUS_VALIDITY_PERIOD"
            }
            UpdateError::ZeroVotingQuorum => "ZERO_VOTING_QUORUM",
            UpdateError::VotingQuorumTooLarge { .. } => "VOTING_QUORUM_TOO_LARGE",
            UpdateError::NoVotingRight { .. } => "NO_VOTING_RIGHT",
            UpdateError::UnexpectedVote { .. } => "UNEXPECTED_VOTE",
            UpdateError::WrongVotingKeyType { .. } => "WRONG_VOTING_KEY_TYPE",
            UpdateError::WrongVotingKeyVersion { .. } => "WRONG_VOTING_KEY_VERSION",
            UpdateError::QuorumUnmet { .. } => "QUORUM_UNMET",
            UpdateError::MissingVote { .. } => "MISSING_VOTE",
            UpdateError::MissingProofOfPossession { .. } => "MISSING_PROOF_OF_POSSESSION",
            UpdateError::UnexpectedProofOfPossession { .. } => "UNEXPECTED_PROOF_OF_POSSESSION",
            UpdateError::MissingKey { .. } => "MISSING_KEY",
            UpdateError::UnexpectedKey { .. } => "UNEXPECTED_KEY",
            UpdateError::InvalidKeyVersion { .. } => "INVALID_KEY_VERSION",
        }
    }
}
