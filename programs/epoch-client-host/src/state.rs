//! State management for the epoch light client host
//!
//! Every value is stored as a protobuf [`Any`] whose `value` holds the JSON encoding of the
//! client type and whose `type_url` names the client type.

use epoch_light_client::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    header::Header,
    misbehaviour::Misbehaviour,
    types::{client_type::ClientType, height::Height},
};
use cosmwasm_std::{Order, Storage};
use ibc_proto::google::protobuf::Any;
use prost::Message;
use serde::{de::DeserializeOwned, Serialize};

use crate::HostError;

/// The store key prefix of every client
pub const HOST_CLIENTS_PREFIX: &str = "clients";
/// The store key used to store the client state
pub const HOST_CLIENT_STATE_KEY: &str = "clientState";
/// The store key used to store the consensus states
pub const HOST_CONSENSUS_STATES_KEY: &str = "consensusStates";
/// The store key used to store sorted keys of consensusStates
pub const HOST_ITERATE_CONSENSUS_STATES_KEY: &str = "iterateConsensusStates";

/// The key used to store the client state of `client_id`
#[must_use]
pub fn client_state_key(client_id: &str) -> String {
    format!("{HOST_CLIENTS_PREFIX}/{client_id}/{HOST_CLIENT_STATE_KEY}")
}

/// The key used to store the consensus states by height
#[must_use]
pub fn consensus_db_key(client_id: &str, height: Height) -> String {
    format!(
        "{HOST_CLIENTS_PREFIX}/{client_id}/{HOST_CONSENSUS_STATES_KEY}/{}-{}",
        height.revision_number, height.revision_height
    )
}

fn iteration_prefix(client_id: &str) -> Vec<u8> {
    format!("{HOST_CLIENTS_PREFIX}/{client_id}/{HOST_ITERATE_CONSENSUS_STATES_KEY}/").into_bytes()
}

/// The first key after every iteration key of `client_id`
fn iteration_prefix_end(client_id: &str) -> Vec<u8> {
    format!("{HOST_CLIENTS_PREFIX}/{client_id}/{HOST_ITERATE_CONSENSUS_STATES_KEY}0").into_bytes()
}

/// The key used to iterate the consensus states in height order
#[must_use]
pub fn iteration_db_key(client_id: &str, height: Height) -> Vec<u8> {
    let mut key = iteration_prefix(client_id);
    key.extend_from_slice(&height.revision_number.to_be_bytes());
    key.extend_from_slice(&height.revision_height.to_be_bytes());
    key
}

/// Encodes `value` as an [`Any`] with the given type URL
/// # Errors
/// Returns an error if the value cannot be serialized
pub fn encode_any<T: Serialize>(type_url: &str, value: &T) -> Result<Vec<u8>, HostError> {
    let any = Any {
        type_url: type_url.to_string(),
        value: serde_json::to_vec(value)?,
    };
    Ok(any.encode_to_vec())
}

/// Decodes an [`Any`] holding a value of the given type URL
/// # Errors
/// Returns an error if the bytes are not an [`Any`], the type URL differs or the value cannot
/// be deserialized
pub fn decode_any<T: DeserializeOwned>(bytes: &[u8], type_url: &str) -> Result<T, HostError> {
    let any = Any::decode(bytes)?;
    if any.type_url != type_url {
        return Err(HostError::TypeMismatch {
            expected: type_url.to_string(),
            found: any.type_url,
        });
    }
    Ok(serde_json::from_slice(&any.value)?)
}

/// Decodes an [`Any`] client state, resolving its client type from the type URL
/// # Errors
/// Returns an error if the bytes are not an [`Any`], the type URL names no known client type
/// or the value cannot be deserialized
pub fn decode_client_state(bytes: &[u8]) -> Result<(ClientType, ClientState), HostError> {
    let any = Any::decode(bytes)?;
    let client_type = ClientType::from_client_state_type_url(&any.type_url)
        .ok_or(HostError::UnknownClientType(any.type_url))?;
    Ok((client_type, serde_json::from_slice(&any.value)?))
}

/// A decoded client message, tagged with the client type it was decoded for
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ClientMessage {
    /// A header updating the client
    Header(ClientType, Box<Header>),
    /// Misbehaviour freezing the client
    Misbehaviour(ClientType, Box<Misbehaviour>),
}

impl ClientMessage {
    /// The client type the message belongs to
    #[must_use]
    pub const fn client_type(&self) -> ClientType {
        match self {
            Self::Header(client_type, _) | Self::Misbehaviour(client_type, _) => *client_type,
        }
    }
}

/// Decodes an [`Any`] client message of the given client type
/// # Errors
/// Returns [`HostError::TypeMismatch`] if the type URL is neither the client type's header nor
/// its misbehaviour, or an error if the value cannot be deserialized
pub fn decode_client_message(
    bytes: &[u8],
    client_type: ClientType,
) -> Result<ClientMessage, HostError> {
    let any = Any::decode(bytes)?;
    if any.type_url == client_type.header_type_url() {
        Ok(ClientMessage::Header(
            client_type,
            serde_json::from_slice(&any.value)?,
        ))
    } else if any.type_url == client_type.misbehaviour_type_url() {
        Ok(ClientMessage::Misbehaviour(
            client_type,
            serde_json::from_slice(&any.value)?,
        ))
    } else {
        Err(HostError::TypeMismatch {
            expected: client_type.header_type_url().to_string(),
            found: any.type_url,
        })
    }
}

/// Whether a client state is stored for `client_id`
#[must_use]
pub fn has_client_state(storage: &dyn Storage, client_id: &str) -> bool {
    storage.get(client_state_key(client_id).as_bytes()).is_some()
}

/// Get the client state and its client type
/// # Errors
/// Returns an error if the client state is not found or cannot be deserialized
pub fn get_client_state(
    storage: &dyn Storage,
    client_id: &str,
) -> Result<(ClientType, ClientState), HostError> {
    let bytes = storage
        .get(client_state_key(client_id).as_bytes())
        .ok_or_else(|| HostError::ClientStateNotFound(client_id.to_string()))?;
    decode_client_state(&bytes)
}

/// Get the consensus state at a given height
/// # Errors
/// Returns an error if the consensus state is not found or cannot be deserialized
pub fn get_consensus_state(
    storage: &dyn Storage,
    client_id: &str,
    client_type: ClientType,
    height: Height,
) -> Result<ConsensusState, HostError> {
    let bytes = storage
        .get(consensus_db_key(client_id, height).as_bytes())
        .ok_or(HostError::ConsensusStateNotFound(height))?;
    decode_any(&bytes, client_type.consensus_state_type_url())
}

/// Get the consensus state with the greatest height not above `height`
/// # Errors
/// Returns an error if the consensus state cannot be deserialized
pub fn get_latest_consensus_state_at_or_below(
    storage: &dyn Storage,
    client_id: &str,
    client_type: ClientType,
    height: Height,
) -> Result<Option<ConsensusState>, HostError> {
    let mut end = iteration_db_key(client_id, height);
    end.push(0);

    first_consensus_state_in(
        storage,
        client_type,
        &iteration_prefix(client_id),
        &end,
        Order::Descending,
    )
}

/// Get the consensus state with the greatest height below `height`
/// # Errors
/// Returns an error if the consensus state cannot be deserialized
pub fn get_previous_consensus_state(
    storage: &dyn Storage,
    client_id: &str,
    client_type: ClientType,
    height: Height,
) -> Result<Option<ConsensusState>, HostError> {
    first_consensus_state_in(
        storage,
        client_type,
        &iteration_prefix(client_id),
        &iteration_db_key(client_id, height),
        Order::Descending,
    )
}

/// Get the consensus state with the smallest height above `height`
/// # Errors
/// Returns an error if the consensus state cannot be deserialized
pub fn get_next_consensus_state(
    storage: &dyn Storage,
    client_id: &str,
    client_type: ClientType,
    height: Height,
) -> Result<Option<ConsensusState>, HostError> {
    let mut start = iteration_db_key(client_id, height);
    start.push(0);

    first_consensus_state_in(
        storage,
        client_type,
        &start,
        &iteration_prefix_end(client_id),
        Order::Ascending,
    )
}

fn first_consensus_state_in(
    storage: &dyn Storage,
    client_type: ClientType,
    start: &[u8],
    end: &[u8],
    order: Order,
) -> Result<Option<ConsensusState>, HostError> {
    let mut keys = storage.range(Some(start), Some(end), order);

    if let Some((_, consensus_key_bytes)) = keys.next() {
        let consensus_key = String::from_utf8_lossy(&consensus_key_bytes);
        let bytes = storage
            .get(consensus_key.as_bytes())
            .ok_or_else(|| HostError::ConsensusStateKeyDangling(consensus_key.to_string()))?;
        Ok(Some(decode_any(
            &bytes,
            client_type.consensus_state_type_url(),
        )?))
    } else {
        Ok(None)
    }
}

/// Store the consensus state
///
/// Storing the same consensus state twice is a no-op.
/// # Errors
/// Returns an error if the consensus state cannot be serialized into an Any, or a different
/// consensus state is already stored at `height`
pub fn store_consensus_state(
    storage: &mut dyn Storage,
    client_id: &str,
    client_type: ClientType,
    height: Height,
    consensus_state: &ConsensusState,
) -> Result<(), HostError> {
    let consensus_key = consensus_db_key(client_id, height);
    let bytes = encode_any(client_type.consensus_state_type_url(), consensus_state)?;

    if let Some(existing) = storage.get(consensus_key.as_bytes()) {
        if existing != bytes {
            return Err(HostError::ConsensusStateConflict(height));
        }
        return Ok(());
    }

    storage.set(consensus_key.as_bytes(), &bytes);

    let iteration_key = iteration_db_key(client_id, height);
    storage.set(&iteration_key, consensus_key.as_bytes());

    Ok(())
}

/// Store the client state
/// # Errors
/// Returns an error if the client state cannot be serialized into an Any
#[allow(clippy::module_name_repetitions)]
pub fn store_client_state(
    storage: &mut dyn Storage,
    client_id: &str,
    client_type: ClientType,
    client_state: &ClientState,
) -> Result<(), HostError> {
    let bytes = encode_any(client_type.client_state_type_url(), client_state)?;
    storage.set(client_state_key(client_id).as_bytes(), &bytes);
    Ok(())
}
