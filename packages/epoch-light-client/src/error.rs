//! This module defines [`EpochClientError`].

use alloy_primitives::U256;

use crate::types::height::Height;

/// Identifies one of the two headers carried by a misbehaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MisbehaviourHeader {
    /// The first (chronologically later) header
    Header1,
    /// The second header
    Header2,
}

impl std::fmt::Display for MisbehaviourHeader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Header1 => write!(f, "header 1"),
            Self::Header2 => write!(f, "header 2"),
        }
    }
}

/// Error types for the epoch light client
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[allow(clippy::module_name_repetitions)]
pub enum EpochClientError {
    /// Header is structurally invalid
    #[error("malformed header: {reason}")]
    MalformedHeader {
        /// Reason for error
        reason: String,
    },

    /// Misbehaviour is missing one of its headers
    #[error("misbehaviour {0} cannot be empty")]
    MissingHeader(MisbehaviourHeader),

    /// Client identifier rejected
    #[error("invalid client identifier ({client_id}): {reason}")]
    InvalidClientIdentifier {
        /// The rejected identifier
        client_id: String,
        /// Reason for error
        reason: String,
    },

    /// One of the misbehaviour headers failed basic validation
    #[error("{which} failed validation: {source}")]
    HeaderValidationFailed {
        /// The failing header
        which: MisbehaviourHeader,
        /// Underlying validation error
        #[source]
        source: Box<EpochClientError>,
    },

    /// Misbehaviour headers belong to different epochs
    #[error("header 1 epoch is not the same as header 2 epoch ({epoch_1} != {epoch_2})")]
    EpochMismatch {
        /// Epoch of header 1
        epoch_1: U256,
        /// Epoch of header 2
        epoch_2: U256,
    },

    /// Misbehaviour headers are at different heights
    #[error("header 1 height is not the same as header 2 height ({height_1} != {height_2})")]
    HeightMismatch {
        /// Height of header 1
        height_1: Height,
        /// Height of header 2
        height_2: Height,
    },

    /// A misbehaviour header carries epoch headers
    #[error("{0} with epoch headers cannot be accepted as evidence")]
    UnsupportedEvidenceShape(MisbehaviourHeader),

    /// The beacon header of a misbehaviour header could not be decoded
    #[error("invalid {which}: {reason}")]
    DecodeFailed {
        /// The failing header
        which: MisbehaviourHeader,
        /// Decoder error
        reason: String,
    },

    /// Header 1 is older than header 2
    #[error("header 1 timestamp is less than header 2 timestamp ({time_1} < {time_2})")]
    TimestampOrdering {
        /// Beacon time of header 1
        time_1: u64,
        /// Beacon time of header 2
        time_2: u64,
    },

    /// Both headers attest to the same thing
    #[error("non-distinct evidence: {reason}")]
    NonDistinctEvidence {
        /// Reason for error
        reason: String,
    },

    /// A value of the wrong concrete type was supplied
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        /// Expected type
        expected: String,
        /// Supplied type
        found: String,
    },

    /// The operation is not supported by this client type
    #[error("unsupported operation: {0}")]
    UnsupportedOperation(&'static str),

    /// The operation has no verified implementation yet
    #[error("not implemented: {0}")]
    NotImplemented(&'static str),

    /// Latest epoch must be positive
    #[error("invalid latest epoch: latest epoch must be greater than zero")]
    InvalidLatestEpoch,

    /// Epoch size must be positive
    #[error("invalid epoch size: epoch size must be greater than zero")]
    InvalidEpochSize,

    /// Latest height must be positive
    #[error("invalid latest height: latest height must be greater than zero")]
    InvalidLatestHeight,

    /// Consensus state is structurally invalid
    #[error("invalid consensus state: {reason}")]
    InvalidConsensusState {
        /// Reason for error
        reason: String,
    },

    /// Client is frozen
    #[error("client is frozen")]
    ClientFrozen,

    /// Header is for an epoch older than the trusted one
    #[error("header epoch ({header_epoch}) is older than the trusted epoch ({trusted_epoch})")]
    StaleEpoch {
        /// Epoch of the header
        header_epoch: U256,
        /// Epoch of the trusted consensus state
        trusted_epoch: U256,
    },

    /// Epoch headers do not bridge the trusted epoch to the header epoch
    #[error("invalid epoch headers: {reason}")]
    InvalidEpochHeaders {
        /// Reason for error
        reason: String,
    },

    /// A beacon header could not be decoded
    #[error("unable to decode beacon header: {0}")]
    BeaconHeaderDecode(String),

    /// Commit bitmap does not fit the committee
    #[error("invalid commit bitmap: {reason}")]
    InvalidCommitBitmap {
        /// Reason for error
        reason: String,
    },

    /// Signers do not reach a two-thirds weighted quorum
    #[error("insufficient quorum: signed weight {signed_weight} of total weight {total_weight}")]
    InsufficientQuorum {
        /// Weight of the members that signed
        signed_weight: u128,
        /// Weight of the whole committee
        total_weight: u128,
    },

    /// Aggregate commit signature did not verify
    #[error("commit signature verification failed: {0}")]
    CommitSignatureVerification(String),

    /// No trusted committee is known for the epoch
    #[error("no trusted committee for epoch {epoch}")]
    MissingCommittee {
        /// The epoch without a committee
        epoch: U256,
    },

    /// Header disagrees with the consensus state already stored at its height
    #[error("header conflicts with the consensus state stored at height {height}")]
    ConflictingConsensusState {
        /// Height of the header
        height: Height,
    },

    /// Header time is out of order with the neighbouring consensus states
    #[error("non-monotonic timestamp: {reason}")]
    NonMonotonicTimestamp {
        /// Reason for error
        reason: String,
    },

    /// Timestamp does not fit in nanoseconds
    #[error("timestamp too large overflow")]
    TimestampOverflow,

    /// Proof is structurally invalid
    #[error("proof invalid: {reason}")]
    InvalidProof {
        /// Reason for error
        reason: String,
    },

    /// Proof height is above the latest known height
    #[error("proof height {proof_height} is greater than the latest height {latest_height}")]
    InvalidProofHeight {
        /// Height of the proof
        proof_height: Height,
        /// Latest height of the client
        latest_height: Height,
    },
}
