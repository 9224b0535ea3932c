//! Vote and quorum checks
//!
//! Votes are checked against the voters and key state of the previous
//! TRC: the quorum recorded in a TRC governs votes on its successor.

use crate::core::classify::Classification;
use crate::error::UpdateError;
use trustroot_core::{Attribute, KeyType, Trc};

/// Check every vote on `next` and that they reach `prev`'s quorum
pub fn validate_votes(
    prev: &Trc,
    next: &Trc,
    class: &Classification,
) -> Result<usize, UpdateError> {
    let mut valid = 0usize;

    for (as_id, vote) in next.votes() {
        let primary = prev
            .primary_ases()
            .get(as_id)
            .ok_or(UpdateError::UnexpectedVote { as_id: *as_id })?;

        if !primary.is(Attribute::Voting) {
            return Err(UpdateError::NoVotingRight { as_id: *as_id });
        }

        let expected_key = class.required_vote_key(as_id);
        if vote.key_type != expected_key {
            return Err(UpdateError::WrongVotingKeyType {
                as_id: *as_id,
                expected: expected_key,
                actual: vote.key_type,
            });
        }

        let recorded = primary.key(vote.key_type).map(|meta| meta.key_version);
        if recorded != Some(vote.key_version) {
            return Err(UpdateError::WrongVotingKeyVersion {
                as_id: *as_id,
                key_type: vote.key_type,
                expected: recorded,
                actual: vote.key_version,
            });
        }

        valid += 1;
    }

    if let Classification::Regular { rotating_online } = class {
        if let Some(as_id) = rotating_online
            .iter()
            .find(|id| !next.votes().contains_key(id))
        {
            return Err(UpdateError::MissingVote {
                as_id: *as_id,
                key_type: KeyType::Offline,
            });
        }
    }

    if valid < prev.voting_quorum() as usize {
        return Err(UpdateError::QuorumUnmet {
            votes: valid,
            quorum: prev.voting_quorum(),
        });
    }

    Ok(valid)
}

/// Check that `next`'s quorum is satisfiable by its own voters
pub fn validate_quorum_field(next: &Trc) -> Result<(), UpdateError> {
    let quorum = next.voting_quorum();
    if quorum == 0 {
        return Err(UpdateError::ZeroVotingQuorum);
    }

    let voters = next.primary_ases().count(Attribute::Voting);
    if quorum as usize > voters {
        return Err(UpdateError::VotingQuorumTooLarge { quorum, voters });
    }

    Ok(())
}
