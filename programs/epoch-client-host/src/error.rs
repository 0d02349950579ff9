//! Defines the [`HostError`] type.

use epoch_light_client::{error::EpochClientError, types::height::Height};
use thiserror::Error;

/// Error types that can be returned by host operations
#[derive(Error, Debug)]
#[allow(clippy::module_name_repetitions)]
pub enum HostError {
    /// Client state not found
    #[error("client state not found for {0}")]
    ClientStateNotFound(String),

    /// Client state already exists
    #[error("client {0} already exists")]
    ClientAlreadyExists(String),

    /// Consensus state not found
    #[error("consensus state not found at height {0}")]
    ConsensusStateNotFound(Height),

    /// A different consensus state is already stored at the height
    #[error("a different consensus state is already stored at height {0}")]
    ConsensusStateConflict(Height),

    /// An iteration key names a consensus state that is not stored
    #[error("iteration key points to missing consensus state {0}")]
    ConsensusStateKeyDangling(String),

    /// The client type is not registered with the host
    #[error("unknown client type: {0}")]
    UnknownClientType(String),

    /// A value of the wrong concrete type was supplied
    #[error("type mismatch: expected {expected}, got {found}")]
    TypeMismatch {
        /// Expected type URL
        expected: String,
        /// Supplied type URL
        found: String,
    },

    /// Misbehaviour submitted to another client
    #[error("misbehaviour for client {found} submitted to client {expected}")]
    ClientIdMismatch {
        /// The addressed client
        expected: String,
        /// The client named by the misbehaviour
        found: String,
    },

    /// Client is frozen
    #[error("client {0} is frozen")]
    ClientFrozen(String),

    /// Host configuration is invalid
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Initializing the client failed
    #[error("initialize failed: {0}")]
    InitializeFailed(#[source] EpochClientError),

    /// Verify client message failed
    #[error("verify client message failed: {0}")]
    VerifyClientMessageFailed(#[source] EpochClientError),

    /// Update client state failed
    #[error("update client state failed: {0}")]
    UpdateClientStateFailed(#[source] EpochClientError),

    /// Misbehaviour verification failed
    #[error("misbehaviour verification failed: {0}")]
    MisbehaviourFailed(#[source] EpochClientError),

    /// The client rejected a substitute or upgrade
    #[error("client recovery failed: {0}")]
    RecoveryFailed(#[source] EpochClientError),

    // Generic translation errors
    /// Prost decoding error
    #[error("prost decoding error: {0}")]
    ProstDecodeError(#[from] prost::DecodeError),

    /// Serde JSON error
    #[error("serde json error: {0}")]
    SerdeJsonError(#[from] serde_json::Error),
}
