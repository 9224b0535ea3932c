//! Shared TRC fixtures
//!
//! A five-AS ISD:
//!
//! | AS  | Attributes                | Keys                     |
//! |-----|---------------------------|--------------------------|
//! | 110 | voting, issuing, core     | online, offline, issuing |
//! | 120 | voting, core              | online, offline          |
//! | 130 | issuing, core             | issuing                  |
//! | 140 | voting, authoritative     | online, offline          |
//! | 150 | authoritative             | none                     |
//!
//! Voting quorum is 3. Key bytes are `[type, AS, version]` so that a new
//! version of a key has new material.

#![allow(dead_code)]

use chrono::{DateTime, Duration, TimeZone, Utc};
use trustroot_core::{
    AsId, Attribute, Attributes, Isd, KeyMeta, KeyType, PrimaryAs, Trc, TrcBuilder, Validity, Vote,
};

pub fn as_id(n: u64) -> AsId {
    format!("ff00:0:{}", n).parse().expect("valid AS id")
}

pub fn key(key_type: KeyType, n: u64, version: u64) -> KeyMeta {
    let tag = match key_type {
        KeyType::Online => 0,
        KeyType::Offline => 1,
        KeyType::Issuing => 2,
    };
    KeyMeta::ed25519(version, vec![tag, n as u8, version as u8])
}

pub fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

pub fn voting_as(n: u64, extra: &[Attribute]) -> PrimaryAs {
    let attributes: Attributes = std::iter::once(Attribute::Voting)
        .chain(extra.iter().copied())
        .collect();
    let mut primary = PrimaryAs::new(attributes)
        .with_key(KeyType::Online, key(KeyType::Online, n, 1))
        .with_key(KeyType::Offline, key(KeyType::Offline, n, 1));
    if extra.contains(&Attribute::Issuing) {
        primary = primary.with_key(KeyType::Issuing, key(KeyType::Issuing, n, 1));
    }
    primary
}

/// Base TRC, version 1
pub fn base() -> Trc {
    base_with_quorum(3)
}

pub fn base_with_quorum(quorum: u32) -> Trc {
    Trc::builder()
        .isd(Isd(1))
        .version(1)
        .description("ISD 1 trust root")
        .validity(Validity::starting_at(start(), Duration::days(365)))
        .grace_period(Duration::hours(6))
        .trust_reset_allowed(true)
        .voting_quorum(quorum)
        .primary(as_id(110), voting_as(110, &[Attribute::Issuing, Attribute::Core]))
        .primary(as_id(120), voting_as(120, &[Attribute::Core]))
        .primary(
            as_id(130),
            PrimaryAs::new([Attribute::Issuing, Attribute::Core])
                .with_key(KeyType::Issuing, key(KeyType::Issuing, 130, 1)),
        )
        .primary(as_id(140), voting_as(140, &[Attribute::Authoritative]))
        .primary(as_id(150), PrimaryAs::new([Attribute::Authoritative]))
        .build()
        .expect("valid base TRC")
}

/// Online votes from every voting AS of the fixture
pub fn online_votes(builder: TrcBuilder) -> TrcBuilder {
    builder
        .vote(as_id(110), Vote::online(1))
        .vote(as_id(120), Vote::online(1))
        .vote(as_id(140), Vote::online(1))
}

/// Offline votes from every voting AS of the fixture
pub fn offline_votes(builder: TrcBuilder) -> TrcBuilder {
    builder
        .vote(as_id(110), Vote::offline(1))
        .vote(as_id(120), Vote::offline(1))
        .vote(as_id(140), Vote::offline(1))
}

/// Regular update of `prev`, voted with online keys
pub fn regular_update(prev: &Trc) -> TrcBuilder {
    online_votes(TrcBuilder::successor_of(prev))
}

/// Sensitive update of `prev`, voted with offline keys
pub fn sensitive_update(prev: &Trc) -> TrcBuilder {
    offline_votes(TrcBuilder::successor_of(prev))
}

/// Version 2, a regular update of [`base`]
pub fn v2() -> Trc {
    regular_update(&base()).build().expect("valid v2")
}
