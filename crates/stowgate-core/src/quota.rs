//! Storage quota policy
//!
//! One rule for every tier: an upload is allowed only while the account is
//! paid, is below its ceiling, and the new file fits under that ceiling. The
//! tier does nothing but select the ceiling from [`TIER_CEILINGS`].

use crate::error::AppError;
use crate::models::ServiceTier;

/// Storage ceiling in bytes, indexed by tier ordinal
pub const TIER_CEILINGS: [i64; 3] = [
    10_000_000,        // Free
    40_000_000_000,    // Standard
    1_000_000_000_000, // Enterprise
];

/// Why an upload was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    Unpaid,
    QuotaExceeded {
        tier: ServiceTier,
        current_usage_bytes: i64,
        requested_bytes: i64,
        ceiling_bytes: i64,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuotaDecision {
    Allow,
    Deny(DenyReason),
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        match reason {
            DenyReason::Unpaid => AppError::Unpaid,
            DenyReason::QuotaExceeded {
                tier,
                current_usage_bytes,
                requested_bytes,
                ceiling_bytes,
            } => AppError::QuotaExceeded {
                tier,
                current_usage_bytes,
                requested_bytes,
                ceiling_bytes,
            },
        }
    }
}

pub fn ceiling_bytes(tier: ServiceTier) -> i64 {
    TIER_CEILINGS[tier.ordinal()]
}

/// Decide whether a new upload may proceed.
///
/// The entitlement gate is checked before any size arithmetic. An addition
/// that overflows `i64` counts as exceeding the ceiling.
pub fn decide(
    tier: ServiceTier,
    is_paid: bool,
    current_usage_bytes: i64,
    requested_bytes: i64,
) -> QuotaDecision {
    if !is_paid {
        return QuotaDecision::Deny(DenyReason::Unpaid);
    }

    let ceiling = ceiling_bytes(tier);
    let exceeds = current_usage_bytes >= ceiling
        || current_usage_bytes
            .checked_add(requested_bytes)
            .map_or(true, |total| total > ceiling);

    if exceeds {
        QuotaDecision::Deny(DenyReason::QuotaExceeded {
            tier,
            current_usage_bytes,
            requested_bytes,
            ceiling_bytes: ceiling,
        })
    } else {
        QuotaDecision::Allow
    }
}
