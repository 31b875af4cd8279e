//! Account tier value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Service account tier
///
/// The tier decides the per-call element cap, which drives how requests
/// are partitioned:
///
/// | Tier     | Per call | Per 10 s window | Per 24 h |
/// |----------|----------|-----------------|----------|
/// | Free     | 100      | 100             | 2 500    |
/// | For work | 625      | 1 000           | 100 000  |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AccountTier {
    /// Standard free usage
    #[default]
    Free,
    /// Premium "for work" customers
    ForWork,
}

impl AccountTier {
    /// Canonical configuration name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Free => "free",
            Self::ForWork => "for_work",
        }
    }

    /// Maximum origin x destination elements in a single call
    #[must_use]
    pub const fn max_elements_per_call(&self) -> usize {
        match self {
            Self::Free => 100,
            Self::ForWork => 625,
        }
    }

    /// Maximum elements in one rolling 10 second window
    #[must_use]
    pub const fn max_elements_per_window(&self) -> usize {
        match self {
            Self::Free => 100,
            Self::ForWork => 1_000,
        }
    }

    /// Maximum elements in a 24 hour period
    #[must_use]
    pub const fn max_elements_per_day(&self) -> usize {
        match self {
            Self::Free => 2_500,
            Self::ForWork => 100_000,
        }
    }

    /// All account tiers
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Free, Self::ForWork]
    }
}

impl fmt::Display for AccountTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountTier {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::all()
            .into_iter()
            .find(|tier| tier.as_str() == normalized)
            .ok_or_else(|| DomainError::UnknownAccountTier(s.to_string()))
    }
}
