//! This module defines [`ClientState`] and [`Status`].

use alloy_primitives::{Bytes, U256};
use serde::{Deserialize, Serialize};

use crate::{
    consensus_state::ConsensusState, error::EpochClientError, types::height::Height,
};

/// The client state of the epoch light client
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct ClientState {
    /// The identifier of the client
    pub client_identifier: String,
    /// Whether the client is frozen due to misbehaviour
    pub frozen: bool,
    /// The latest epoch the client has verified
    pub latest_epoch: U256,
    /// The number of blocks in an epoch
    pub epoch_size: u64,
    /// The latest block number the client has verified
    pub latest_height: u64,
}

/// The status of a client
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Debug)]
pub enum Status {
    /// The client accepts updates
    Active,
    /// The client was frozen by misbehaviour
    Frozen,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "Active"),
            Self::Frozen => write!(f, "Frozen"),
        }
    }
}

/// A key-value pair of client metadata exported at genesis
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct GenesisMetadata {
    /// Metadata key
    pub key: Bytes,
    /// Metadata value
    pub value: Bytes,
}

/// The common inputs of the proof verification entry points
#[derive(Clone, Copy, Debug)]
pub struct ProofContext<'a> {
    /// Height the proof was generated at
    pub height: Height,
    /// Commitment prefix of the counterparty store
    pub prefix: &'a [u8],
    /// The proof
    pub proof: &'a [u8],
}

impl ClientState {
    /// The latest verified height
    #[must_use]
    pub const fn latest_height(&self) -> Height {
        Height::new(0, self.latest_height)
    }

    /// The status of the client
    #[must_use]
    pub const fn status(&self) -> Status {
        if self.frozen {
            Status::Frozen
        } else {
            Status::Active
        }
    }

    /// Marks the client as frozen
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// Checks the client state invariants
    ///
    /// # Errors
    /// Returns an error if the client identifier is blank or the latest epoch, epoch size or
    /// latest height is zero
    pub fn validate(&self) -> Result<(), EpochClientError> {
        ensure!(
            !self.client_identifier.trim().is_empty(),
            EpochClientError::InvalidClientIdentifier {
                client_id: self.client_identifier.clone(),
                reason: "client identifier cannot be blank".to_string(),
            }
        );
        ensure!(
            self.latest_epoch > U256::ZERO,
            EpochClientError::InvalidLatestEpoch
        );
        ensure!(self.epoch_size > 0, EpochClientError::InvalidEpochSize);
        ensure!(self.latest_height > 0, EpochClientError::InvalidLatestHeight);
        Ok(())
    }

    /// Checks that the client can be created from this client state and the given consensus
    /// state
    ///
    /// # Errors
    /// Returns an error if either state is invalid or the consensus state does not belong to
    /// the latest epoch
    pub fn initialize(&self, consensus_state: &ConsensusState) -> Result<(), EpochClientError> {
        self.validate()?;
        consensus_state.validate_basic()?;
        ensure!(
            consensus_state.epoch == self.latest_epoch,
            EpochClientError::InvalidConsensusState {
                reason: format!(
                    "consensus state epoch ({}) does not match latest epoch ({})",
                    consensus_state.epoch, self.latest_epoch
                ),
            }
        );
        Ok(())
    }

    /// The genesis metadata of the client, which is always empty
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn export_metadata(&self) -> Vec<GenesisMetadata> {
        Vec::new()
    }

    /// Returns a copy with every field not shared across upgrades reset to its default
    #[must_use]
    pub fn zero_custom_fields(&self) -> Self {
        Self {
            frozen: self.frozen,
            latest_epoch: self.latest_epoch,
            epoch_size: self.epoch_size,
            latest_height: self.latest_height,
            ..Self::default()
        }
    }

    /// Replacing the client with a substitute is not supported
    ///
    /// # Errors
    /// Always returns [`EpochClientError::UnsupportedOperation`]
    #[allow(clippy::unused_self)]
    pub const fn check_substitute_and_update_state(
        &self,
        _substitute: &Self,
    ) -> Result<Self, EpochClientError> {
        Err(EpochClientError::UnsupportedOperation("substitute client"))
    }

    /// Upgrading the client is not supported
    ///
    /// # Errors
    /// Always returns [`EpochClientError::UnsupportedOperation`]
    #[allow(clippy::unused_self)]
    pub const fn verify_upgrade_and_update_state(
        &self,
        _upgraded_client_state: &Self,
        _upgraded_consensus_state: &ConsensusState,
        _proof_upgrade_client: &[u8],
        _proof_upgrade_consensus_state: &[u8],
    ) -> Result<(Self, ConsensusState), EpochClientError> {
        Err(EpochClientError::UnsupportedOperation("upgrade client"))
    }

    fn check_proof(&self, ctx: &ProofContext<'_>) -> Result<(), EpochClientError> {
        ensure!(
            !ctx.proof.is_empty(),
            EpochClientError::InvalidProof {
                reason: "proof cannot be empty".to_string(),
            }
        );
        ensure!(
            ctx.height <= self.latest_height(),
            EpochClientError::InvalidProofHeight {
                proof_height: ctx.height,
                latest_height: self.latest_height(),
            }
        );
        Ok(())
    }

    /// Verifies a counterparty client state
    ///
    /// # Errors
    /// Returns an error if the proof is empty or above the latest height, and
    /// [`EpochClientError::NotImplemented`] otherwise
    pub fn verify_client_state(
        &self,
        ctx: &ProofContext<'_>,
        _counterparty_client_id: &str,
        _client_state: &[u8],
    ) -> Result<(), EpochClientError> {
        self.check_proof(ctx)?;
        Err(EpochClientError::NotImplemented("verify client state"))
    }

    /// Verifies a counterparty consensus state
    ///
    /// # Errors
    /// Returns an error if the proof is empty or above the latest height, and
    /// [`EpochClientError::NotImplemented`] otherwise
    pub fn verify_client_consensus_state(
        &self,
        ctx: &ProofContext<'_>,
        _counterparty_client_id: &str,
        _consensus_height: Height,
        _consensus_state: &[u8],
    ) -> Result<(), EpochClientError> {
        self.check_proof(ctx)?;
        Err(EpochClientError::NotImplemented(
            "verify client consensus state",
        ))
    }

    /// Verifies a counterparty connection end
    ///
    /// # Errors
    /// Returns an error if the proof is empty or above the latest height, and
    /// [`EpochClientError::NotImplemented`] otherwise
    pub fn verify_connection_state(
        &self,
        ctx: &ProofContext<'_>,
        _connection_id: &str,
        _connection_end: &[u8],
    ) -> Result<(), EpochClientError> {
        self.check_proof(ctx)?;
        Err(EpochClientError::NotImplemented("verify connection state"))
    }

    /// Verifies a counterparty channel end
    ///
    /// # Errors
    /// Returns an error if the proof is empty or above the latest height, and
    /// [`EpochClientError::NotImplemented`] otherwise
    pub fn verify_channel_state(
        &self,
        ctx: &ProofContext<'_>,
        _port_id: &str,
        _channel_id: &str,
        _channel: &[u8],
    ) -> Result<(), EpochClientError> {
        self.check_proof(ctx)?;
        Err(EpochClientError::NotImplemented("verify channel state"))
    }

    /// Verifies a packet commitment
    ///
    /// # Errors
    /// Returns an error if the proof is empty or above the latest height, and
    /// [`EpochClientError::NotImplemented`] otherwise
    pub fn verify_packet_commitment(
        &self,
        ctx: &ProofContext<'_>,
        _port_id: &str,
        _channel_id: &str,
        _sequence: u64,
        _commitment: &[u8],
    ) -> Result<(), EpochClientError> {
        self.check_proof(ctx)?;
        Err(EpochClientError::NotImplemented("verify packet commitment"))
    }

    /// Verifies a packet acknowledgement
    ///
    /// # Errors
    /// Returns an error if the proof is empty or above the latest height, and
    /// [`EpochClientError::NotImplemented`] otherwise
    pub fn verify_packet_acknowledgement(
        &self,
        ctx: &ProofContext<'_>,
        _port_id: &str,
        _channel_id: &str,
        _sequence: u64,
        _acknowledgement: &[u8],
    ) -> Result<(), EpochClientError> {
        self.check_proof(ctx)?;
        Err(EpochClientError::NotImplemented(
            "verify packet acknowledgement",
        ))
    }

    /// Verifies the absence of a packet receipt
    ///
    /// # Errors
    /// Returns an error if the proof is empty or above the latest height, and
    /// [`EpochClientError::NotImplemented`] otherwise
    pub fn verify_packet_receipt_absence(
        &self,
        ctx: &ProofContext<'_>,
        _port_id: &str,
        _channel_id: &str,
        _sequence: u64,
    ) -> Result<(), EpochClientError> {
        self.check_proof(ctx)?;
        Err(EpochClientError::NotImplemented(
            "verify packet receipt absence",
        ))
    }

    /// Verifies the next receive sequence of a channel
    ///
    /// # Errors
    /// Returns an error if the proof is empty or above the latest height, and
    /// [`EpochClientError::NotImplemented`] otherwise
    pub fn verify_next_sequence_recv(
        &self,
        ctx: &ProofContext<'_>,
        _port_id: &str,
        _channel_id: &str,
        _next_sequence_recv: u64,
    ) -> Result<(), EpochClientError> {
        self.check_proof(ctx)?;
        Err(EpochClientError::NotImplemented("verify next sequence recv"))
    }
}
