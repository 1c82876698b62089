use std::fmt::{Display, Formatter, Result as FmtResult};

/// Ordinal service tier of an account.
///
/// Stored as a number in the identity store. Any ordinal outside the known
/// range is treated as `Free`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ServiceTier {
    #[default]
    Free = 0,
    Standard = 1,
    Enterprise = 2,
}

impl ServiceTier {
    pub fn from_ordinal(ordinal: i64) -> Self {
        match ordinal {
            1 => ServiceTier::Standard,
            2 => ServiceTier::Enterprise,
            _ => ServiceTier::Free,
        }
    }

    pub fn ordinal(self) -> usize {
        self as usize
    }
}

impl Display for ServiceTier {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ServiceTier::Free => write!(f, "free"),
            ServiceTier::Standard => write!(f, "standard"),
            ServiceTier::Enterprise => write!(f, "enterprise"),
        }
    }
}

/// Identity and entitlement state of an account, as persisted in the identity store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRecord {
    pub subject_id: String,
    /// Namespace under which the account's objects are stored
    pub account_group_id: String,
    pub service_tier: ServiceTier,
    pub is_paid: bool,
}
