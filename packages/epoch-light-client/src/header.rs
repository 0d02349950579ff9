//! This module defines [`Header`] and [`SignedHeader`].
//!
//! Both client types share the same header layout; the client type travels in the type URL of
//! the encoded message and is resolved by the host's `ClientMessage::client_type`.

use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    error::EpochClientError,
    types::{client_type::ClientType, height::Height},
};

/// A raw beacon header together with the committee commit over it
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct SignedHeader {
    /// The consensus-specific encoding of the beacon header
    pub header: Bytes,
    /// Aggregate commit signature of the committee
    pub commit_sig: Bytes,
    /// Bitmap of the committee members that signed
    pub commit_bitmap: Bytes,
}

/// The header used to update the client and as misbehaviour evidence
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct Header {
    /// Block number of the header
    pub number: u64,
    /// Epoch of the header
    pub epoch: U256,
    /// The signed beacon header
    pub signed_header: Option<SignedHeader>,
    /// Proof of the IBC account at this header
    pub account_proof: Bytes,
    /// Commitment root at this header
    pub commitment_root: Bytes,
    /// Last headers of the epochs between the trusted epoch and this header's epoch
    #[serde(default)]
    pub epoch_headers: Vec<SignedHeader>,
}

impl Header {
    /// The height of the header
    #[must_use]
    pub const fn height(&self) -> Height {
        Height::new(0, self.number)
    }

    /// The raw beacon header bytes, if the header is signed
    #[must_use]
    pub fn beacon_header(&self) -> Option<&Bytes> {
        self.signed_header.as_ref().map(|signed| &signed.header)
    }

    /// The signed beacon header
    ///
    /// # Errors
    /// Returns [`EpochClientError::MalformedHeader`] if the header is unsigned
    pub fn signed_header(&self) -> Result<&SignedHeader, EpochClientError> {
        self.signed_header
            .as_ref()
            .ok_or_else(|| EpochClientError::MalformedHeader {
                reason: "signed header cannot be empty".to_string(),
            })
    }

    /// Checks that the header's number falls inside the epoch it claims
    ///
    /// # Errors
    /// Returns [`EpochClientError::InvalidEpochSize`] if `epoch_size` is zero and
    /// [`EpochClientError::MalformedHeader`] if `number / epoch_size` is not the header's epoch
    pub fn check_epoch_membership(&self, epoch_size: u64) -> Result<(), EpochClientError> {
        ensure!(epoch_size > 0, EpochClientError::InvalidEpochSize);
        ensure!(
            U256::from(self.number / epoch_size) == self.epoch,
            EpochClientError::MalformedHeader {
                reason: format!(
                    "block {} is not in epoch {} with epoch size {epoch_size}",
                    self.number, self.epoch
                ),
            }
        );
        Ok(())
    }

    /// Checks the structure of the header for the given client type
    ///
    /// # Errors
    /// Returns [`EpochClientError::MalformedHeader`] if:
    /// - The signed header is missing
    /// - The commitment root is empty
    /// - For [`ClientType::Harmony`], the beacon header bytes are empty
    pub fn validate_basic(&self, client_type: ClientType) -> Result<(), EpochClientError> {
        let signed_header = self.signed_header()?;

        ensure!(
            !self.commitment_root.is_empty(),
            EpochClientError::MalformedHeader {
                reason: "commitment root cannot be empty".to_string(),
            }
        );

        if client_type.requires_beacon_header() {
            ensure!(
                !signed_header.header.is_empty(),
                EpochClientError::MalformedHeader {
                    reason: "beacon header cannot be empty".to_string(),
                }
            );
        }

        Ok(())
    }
}
