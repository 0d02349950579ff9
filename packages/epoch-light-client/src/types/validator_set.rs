//! This module defines [`ValidatorSet`], the committee trusted for an epoch.

use alloy_primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// A single committee member
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct CommitteeMember {
    /// The member's account address
    pub address: Address,
    /// The member's BLS public key
    pub bls_public_key: Bytes,
    /// The member's voting weight
    pub weight: u64,
}

/// The ordered committee of an epoch
///
/// The position of a member is its index in commit bitmaps.
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct ValidatorSet {
    /// The committee members, in bitmap order
    pub members: Vec<CommitteeMember>,
}

impl ValidatorSet {
    /// Creates a validator set from its members
    #[must_use]
    pub const fn new(members: Vec<CommitteeMember>) -> Self {
        Self { members }
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Whether the committee has no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Sum of all member weights
    #[must_use]
    pub fn total_weight(&self) -> u128 {
        self.members.iter().map(|m| u128::from(m.weight)).sum()
    }
}
