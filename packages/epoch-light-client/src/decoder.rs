//! The beacon header decoder the client relies on to read raw consensus headers.

use alloy_primitives::{B256, U256};
use serde::{Deserialize, Serialize};

use crate::{error::EpochClientError, types::validator_set::ValidatorSet};

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// The fields of a raw beacon header the client needs
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct DecodedBeaconHeader {
    /// Block number
    pub number: u64,
    /// Epoch the block belongs to
    pub epoch: U256,
    /// Block time in unix seconds
    pub time: u64,
    /// Block hash, the message committed to by the commit signature
    pub hash: B256,
    /// Committee of the next epoch, announced by the last block of an epoch
    #[serde(default)]
    pub next_committee: Option<ValidatorSet>,
}

impl DecodedBeaconHeader {
    /// Block time in unix seconds
    #[must_use]
    pub const fn time(&self) -> u64 {
        self.time
    }

    /// Block time in unix nanoseconds
    ///
    /// # Errors
    /// Returns [`EpochClientError::TimestampOverflow`] if the time does not fit in nanoseconds
    pub const fn timestamp_nanos(&self) -> Result<u64, EpochClientError> {
        match self.time.checked_mul(NANOS_PER_SECOND) {
            Some(timestamp) => Ok(timestamp),
            None => Err(EpochClientError::TimestampOverflow),
        }
    }

    /// Block hash
    #[must_use]
    pub const fn hash(&self) -> B256 {
        self.hash
    }

    /// Block number
    #[must_use]
    pub const fn number(&self) -> u64 {
        self.number
    }

    /// Epoch of the block
    #[must_use]
    pub const fn epoch(&self) -> U256 {
        self.epoch
    }

    /// Committee announced for the next epoch, if any
    #[must_use]
    pub const fn next_committee(&self) -> Option<&ValidatorSet> {
        self.next_committee.as_ref()
    }
}

/// Decodes the consensus-specific encoding of a beacon header
pub trait BeaconHeaderDecoder {
    /// Decodes raw beacon header bytes
    ///
    /// # Errors
    /// Returns a description of the failure if the bytes are not a valid beacon header
    fn decode(&self, bytes: &[u8]) -> Result<DecodedBeaconHeader, String>;
}
