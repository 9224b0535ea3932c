//! Lineage walking and anchor selection

use crate::error::UpdateError;
use crate::info::UpdateInfo;
use crate::validator::UpdateValidator;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use trustroot_core::Trc;

/// A broken link in a TRC lineage
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("TRC at index {index} (version {version}) is not a valid update: {source}")]
pub struct ChainError {
    /// Index of the rejected TRC in the input
    pub index: usize,
    /// Version the rejected TRC claims
    pub version: u64,
    /// Why the update was rejected
    pub source: UpdateError,
}

/// Validate each consecutive pair of `trcs`
///
/// The first TRC is taken as trusted. Returns one [`UpdateInfo`] per update,
/// so a lineage of `n` TRCs yields `n - 1` entries.
pub fn validate_chain(trcs: &[Trc]) -> Result<Vec<UpdateInfo>, ChainError> {
    let infos = trcs
        .windows(2)
        .enumerate()
        .map(|(i, pair)| {
            UpdateValidator::new(&pair[0], &pair[1])
                .validate()
                .map_err(|source| ChainError {
                    index: i + 1,
                    version: pair[1].version(),
                    source,
                })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if let Some(last) = trcs.last() {
        debug!(
            isd = %last.isd(),
            updates = infos.len(),
            latest_version = last.version(),
            "TRC lineage verified"
        );
    }
    Ok(infos)
}

/// Check whether `prev` may still be used as an anchor at `now`
///
/// After `next` takes effect, its predecessor stays acceptable until the
/// grace period of `next` ends, and only while `prev` itself is valid.
pub fn is_predecessor_acceptable(prev: &Trc, next: &Trc, now: DateTime<Utc>) -> bool {
    prev.is_active_at(now) && now < next.grace_period_end()
}
