//! # Trustroot Core
//!
//! Document model for Trust Root Configurations (TRCs), the signed
//! documents that name an isolation domain's primary authorities, their
//! keys, and the voting rules by which the document is amended.
//!
//! ## Key Concepts
//!
//! - **TRC**: one version of an ISD's trust root, part of a lineage
//! - **Primary AS**: an authority with attributes (core, authoritative,
//!   issuing, voting) and the keys those attributes require
//! - **Vote**: a signature by a voting AS endorsing a successor TRC
//! - **Proof of possession**: evidence that an AS controls newly introduced
//!   key material
//!
//! ## Lineage Invariants
//!
//! 1. **Identity**: ISD, base version and trust reset flag never change
//! 2. **Continuity**: versions increase by exactly one and validity windows
//!    overlap
//! 3. **Authority**: every update is endorsed by a quorum of voters of the
//!    predecessor
//!
//! The invariants are enforced by `trustroot-validator`; this crate only
//! models the documents.

pub mod error;
pub mod primary;
pub mod trc;
pub mod types;

pub use error::{Result, TrcError};
pub use primary::{Attributes, KeyMismatch, PrimaryAs, PrimaryAses};
pub use trc::{Trc, TrcBuilder, Vote};
pub use types::{Algorithm, AsId, Attribute, Isd, KeyMeta, KeyType, Validity};

/// Library version, reported by `trc-validate --version`
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
