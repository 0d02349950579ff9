//! This module defines [`ConsensusState`] and [`Root`].

use std::collections::HashSet;

use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{error::EpochClientError, types::validator_set::ValidatorSet};

/// The commitment root of a consensus state
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct Root {
    hash: Bytes,
}

impl Root {
    /// Wraps the given root hash
    #[must_use]
    pub const fn new(hash: Bytes) -> Self {
        Self { hash }
    }

    /// The root hash
    #[must_use]
    pub const fn hash(&self) -> &Bytes {
        &self.hash
    }

    /// Whether the root hash has no bytes
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hash.is_empty()
    }
}

/// The consensus state of the client at a verified height
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct ConsensusState {
    /// The epoch of the verified header
    pub epoch: U256,
    /// The committee of that epoch
    pub validators: ValidatorSet,
    /// The commitment root of the verified header
    pub commitment_root: Bytes,
    /// Block time of the verified header in nanoseconds
    pub timestamp: u64,
}

impl ConsensusState {
    /// The commitment root
    #[must_use]
    pub fn get_root(&self) -> Root {
        Root::new(self.commitment_root.clone())
    }

    /// The timestamp in nanoseconds
    #[must_use]
    pub const fn get_timestamp(&self) -> u64 {
        self.timestamp
    }

    /// Checks the structure of the consensus state
    ///
    /// # Errors
    /// Returns [`EpochClientError::InvalidConsensusState`] if:
    /// - The commitment root is empty
    /// - The timestamp is zero
    /// - The committee is empty
    /// - A member has zero weight or an empty public key
    /// - Two members share an address
    pub fn validate_basic(&self) -> Result<(), EpochClientError> {
        let invalid = |reason: &str| EpochClientError::InvalidConsensusState {
            reason: reason.to_string(),
        };

        ensure!(
            !self.commitment_root.is_empty(),
            invalid("commitment root cannot be empty")
        );
        ensure!(self.timestamp != 0, invalid("timestamp cannot be zero"));
        ensure!(
            !self.validators.is_empty(),
            invalid("committee cannot be empty")
        );

        let mut seen = HashSet::with_capacity(self.validators.len());
        for member in &self.validators.members {
            ensure!(
                member.weight > 0,
                invalid(&format!("member {} has zero weight", member.address))
            );
            ensure!(
                !member.bls_public_key.is_empty(),
                invalid(&format!("member {} has an empty public key", member.address))
            );
            ensure!(
                seen.insert(member.address),
                invalid(&format!("duplicate member {}", member.address))
            );
        }

        Ok(())
    }
}
