//! This module defines [`Height`].

use serde::{Deserialize, Serialize};

/// Height of the counterparty chain
///
/// Heights are ordered lexicographically on `(revision_number, revision_height)`,
/// so a height in a later revision is always greater regardless of block number.
#[derive(
    Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug, Default,
)]
pub struct Height {
    /// The revision number
    /// This is always 0 for the supported client types
    #[serde(default)]
    pub revision_number: u64,
    /// The block number
    pub revision_height: u64,
}

impl Height {
    /// Create a new [`Height`]
    #[must_use]
    pub const fn new(revision_number: u64, revision_height: u64) -> Self {
        Self {
            revision_number,
            revision_height,
        }
    }

    /// Returns true if the height is the zero height
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.revision_number == 0 && self.revision_height == 0
    }
}

impl std::fmt::Display for Height {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.revision_number, self.revision_height)
    }
}
