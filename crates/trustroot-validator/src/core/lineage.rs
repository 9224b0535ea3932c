//! Lineage invariants
//!
//! Checked for every update regardless of its class. A failure here means
//! the candidate does not belong to the predecessor's lineage at all.

use crate::error::UpdateError;
use trustroot_core::Trc;

/// Check that `next` continues the lineage of `prev`
pub fn validate_lineage(prev: &Trc, next: &Trc) -> Result<(), UpdateError> {
    if next.is_base() {
        return Err(UpdateError::BaseNotUpdate {
            version: next.version(),
        });
    }

    let validity = next.validity();
    if !validity.is_well_formed() {
        return Err(UpdateError::InvalidValidityPeriod {
            not_before: validity.not_before,
            not_after: validity.not_after,
        });
    }

    if next.isd() != prev.isd() {
        return Err(UpdateError::ImmutableIsd {
            expected: prev.isd(),
            actual: next.isd(),
        });
    }

    let expected_version = prev.version().checked_add(1);
    if expected_version != Some(next.version()) {
        return Err(UpdateError::InvalidVersionIncrement {
            expected: expected_version,
            actual: next.version(),
        });
    }

    if next.trust_reset_allowed() != prev.trust_reset_allowed() {
        return Err(UpdateError::ImmutableTrustResetAllowed {
            expected: prev.trust_reset_allowed(),
            actual: next.trust_reset_allowed(),
        });
    }

    if next.base_version() != prev.base_version() {
        return Err(UpdateError::ImmutableBaseVersion {
            expected: prev.base_version(),
            actual: next.base_version(),
        });
    }

    if !prev.validity().contains(validity.not_before) {
        return Err(UpdateError::NotInsidePreviousValidityPeriod {
            not_before: validity.not_before,
            prev_not_before: prev.validity().not_before,
            prev_not_after: prev.validity().not_after,
        });
    }

    Ok(())
}
