//! The messages that are passed between the host and the client handlers
#![allow(clippy::module_name_repetitions)]

use epoch_light_client::{
    client_state::{GenesisMetadata, Status},
    types::height::Height,
};
use serde::{Deserialize, Serialize};

/// The sudo messages that change client state
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SudoMsg {
    /// Create the client from an initial client and consensus state
    Initialize(InitializeMsg),
    /// Update the client with a verified header
    UpdateState(UpdateStateMsg),
    /// Freeze the client with verified misbehaviour
    UpdateStateOnMisbehaviour(UpdateStateOnMisbehaviourMsg),
    /// Replace the client with a substitute
    SubstituteClient(SubstituteClientMsg),
    /// Upgrade the client
    UpgradeClient(VerifyUpgradeAndUpdateStateMsg),
}

/// The query messages that read client state
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum QueryMsg {
    /// The status of the client
    Status,
    /// The latest height of the client
    LatestHeight,
    /// The consensus timestamp at a height
    TimestampAtHeight(TimestampAtHeightMsg),
    /// The genesis metadata of the client
    ExportMetadata,
    /// Verify a header or misbehaviour without storing it
    VerifyClientMessage(VerifyClientMessageMsg),
    /// Check whether a client message is misbehaviour
    CheckForMisbehaviour(CheckForMisbehaviourMsg),
}

/// Initialize message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct InitializeMsg {
    /// The `Any` encoded client state
    pub client_state: Vec<u8>,
    /// The `Any` encoded consensus state
    pub consensus_state: Vec<u8>,
}

/// Update state message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateStateMsg {
    /// The `Any` encoded header
    pub client_message: Vec<u8>,
}

/// Update state on misbehaviour message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateStateOnMisbehaviourMsg {
    /// The `Any` encoded misbehaviour
    pub client_message: Vec<u8>,
}

/// Substitute client message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct SubstituteClientMsg {
    /// The identifier of the substitute client
    pub substitute_client_id: String,
}

/// Verify upgrade and update state message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VerifyUpgradeAndUpdateStateMsg {
    /// The `Any` encoded upgraded client state
    pub upgrade_client_state: Vec<u8>,
    /// The `Any` encoded upgraded consensus state
    pub upgrade_consensus_state: Vec<u8>,
    /// The proof of the upgraded client state
    pub proof_upgrade_client: Vec<u8>,
    /// The proof of the upgraded consensus state
    pub proof_upgrade_consensus_state: Vec<u8>,
}

/// Timestamp at height message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TimestampAtHeightMsg {
    /// The height to retrieve the timestamp at
    pub height: Height,
}

/// Verify client message message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct VerifyClientMessageMsg {
    /// The `Any` encoded header or misbehaviour
    pub client_message: Vec<u8>,
}

/// Check for misbehaviour message
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CheckForMisbehaviourMsg {
    /// The `Any` encoded header or misbehaviour
    pub client_message: Vec<u8>,
}

/// The update state result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UpdateStateResult {
    /// The updated consensus heights
    pub heights: Vec<Height>,
}

/// The status query result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct StatusResult {
    /// The status of the client
    pub status: Status,
}

/// The latest height query result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct LatestHeightResult {
    /// The latest height of the client
    pub height: Height,
}

/// The timestamp at height query result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TimestampAtHeightResult {
    /// The timestamp at the given height in nanoseconds
    pub timestamp: u64,
}

/// The export metadata query result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ExportMetadataResult {
    /// The genesis metadata
    pub genesis_metadata: Vec<GenesisMetadata>,
}

/// The check for misbehaviour query result
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct CheckForMisbehaviourResult {
    /// Whether misbehaviour was found
    pub found_misbehaviour: bool,
}
