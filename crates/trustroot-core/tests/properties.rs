//! Property-Based Tests for TRC Data Types
//!
//! These tests verify that the data model holds for arbitrary inputs:
//! 1. AS identifiers survive formatting and parsing
//! 2. TRCs survive the JSON codec unchanged
//! 3. Successors never share state with their predecessor
//!
//! Uses proptest for property-based testing with arbitrary inputs.

use chrono::{Duration, TimeZone, Utc};
use proptest::prelude::*;
use trustroot_core::types::MAX_AS;
use trustroot_core::{
    AsId, Attribute, Isd, KeyMeta, KeyType, PrimaryAs, Trc, TrcBuilder, Validity, Vote,
};

// =============================================================================
// Test Helpers
// =============================================================================

fn arb_as_id() -> impl Strategy<Value = AsId> {
    (0..=MAX_AS).prop_map(|v| AsId::new(v).unwrap())
}

fn arb_key() -> impl Strategy<Value = KeyMeta> {
    (1..100u64, proptest::collection::vec(any::<u8>(), 1..64))
        .prop_map(|(version, bytes)| KeyMeta::ed25519(version, bytes))
}

fn arb_trc() -> impl Strategy<Value = Trc> {
    (
        any::<u16>(),
        1..1000u64,
        0..(365 * 24 * 3600i64),
        proptest::collection::btree_map(arb_as_id(), (arb_key(), arb_key()), 1..6),
        "[a-zA-Z0-9 ]{0,32}",
    )
        .prop_map(|(isd, version, grace, voters, description)| {
            let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
            let quorum = voters.len() as u32;
            let mut builder = Trc::builder()
                .isd(Isd(isd))
                .version(version)
                .description(description)
                .validity(Validity::starting_at(start, Duration::days(365)))
                .grace_period(Duration::seconds(grace))
                .voting_quorum(quorum);
            for (id, (online, offline)) in voters {
                let primary = PrimaryAs::new([Attribute::Voting, Attribute::Core])
                    .with_key(KeyType::Online, online)
                    .with_key(KeyType::Offline, offline);
                builder = builder.primary(id, primary).vote(id, Vote::online(1));
            }
            builder.build().unwrap()
        })
}

// =============================================================================
// AS identifiers
// =============================================================================

proptest! {
    /// Display and FromStr are inverse for every valid AS number
    #[test]
    fn prop_as_id_display_parse(id in arb_as_id()) {
        let text = id.to_string();
        let parsed: AsId = text.parse().unwrap();
        prop_assert_eq!(parsed, id);
    }

    /// Numbers above 48 bits are rejected
    #[test]
    fn prop_as_id_range(value in (MAX_AS + 1)..=u64::MAX) {
        prop_assert!(AsId::new(value).is_err());
    }

    /// Garbage never parses into an AS id
    #[test]
    fn prop_as_id_rejects_garbage(text in "[g-z]{1,12}") {
        prop_assert!(text.parse::<AsId>().is_err());
    }

    /// A sign in front of any group is rejected
    #[test]
    fn prop_as_id_rejects_signed_group(
        value in (u64::from(u32::MAX) + 1)..=MAX_AS,
        group in 0..3usize,
        sign in "[+-]",
    ) {
        let text = AsId::new(value).unwrap().to_string();
        let mut groups: Vec<String> = text.split(':').map(str::to_string).collect();
        groups[group].insert_str(0, &sign);
        prop_assert!(groups.join(":").parse::<AsId>().is_err());
    }
}

// =============================================================================
// Codec
// =============================================================================

proptest! {
    /// JSON encoding round-trips arbitrary TRCs
    #[test]
    fn prop_trc_json_roundtrip(trc in arb_trc()) {
        let bytes = trc.to_bytes().unwrap();
        let restored = Trc::from_bytes(&bytes).unwrap();
        prop_assert_eq!(restored, trc);
    }

    /// Built TRCs with a voter per quorum slot are well formed
    #[test]
    fn prop_generated_trc_structure(trc in arb_trc()) {
        prop_assert!(trc.check_structure().is_ok());
        prop_assert_eq!(trc.voting_ases().len(), trc.voting_quorum() as usize);
    }
}

// =============================================================================
// Successors
// =============================================================================

proptest! {
    /// A successor continues the lineage and drops its predecessor's ballot
    #[test]
    fn prop_successor_lineage(trc in arb_trc()) {
        let next = TrcBuilder::successor_of(&trc).build().unwrap();

        prop_assert_eq!(next.version(), trc.version() + 1);
        prop_assert_eq!(next.isd(), trc.isd());
        prop_assert_eq!(next.base_version(), trc.base_version());
        prop_assert_eq!(next.primary_ases(), trc.primary_ases());
        prop_assert!(next.votes().is_empty());
        prop_assert!(next.proof_of_possession().is_empty());
    }

    /// Changing a successor's keys leaves the predecessor untouched
    #[test]
    fn prop_successor_does_not_alias(trc in arb_trc(), key in arb_key()) {
        let before = trc.clone();
        let id = trc.primary_ases().ids().next().unwrap();

        let next = TrcBuilder::successor_of(&trc)
            .set_key(id, KeyType::Online, key)
            .remove_primary(id)
            .build()
            .unwrap();

        prop_assert_eq!(&trc, &before);
        prop_assert!(!next.primary_ases().contains(&id));
        prop_assert!(trc.primary_ases().contains(&id));
    }

    /// The grace period ends exactly `grace_period` after `not_before`
    #[test]
    fn prop_grace_period_end(trc in arb_trc()) {
        prop_assert_eq!(
            trc.grace_period_end(),
            trc.validity().not_before + trc.grace_period()
        );
    }
}
