//! This module contains the query message handlers

use cosmwasm_std::Storage;
use epoch_light_client::{
    client_state::ClientState,
    error::{EpochClientError, MisbehaviourHeader},
    header::Header,
    misbehaviour::Misbehaviour,
    types::client_type::ClientType,
    verify::{StoredConsensusStates, VerifiedHeader},
};

use crate::{
    msg::{
        CheckForMisbehaviourMsg, CheckForMisbehaviourResult, ExportMetadataResult,
        LatestHeightResult, StatusResult, TimestampAtHeightMsg, TimestampAtHeightResult,
        VerifyClientMessageMsg,
    },
    registry::ClientRegistry,
    state::{
        decode_client_message, get_client_state, get_consensus_state,
        get_latest_consensus_state_at_or_below, get_next_consensus_state,
        get_previous_consensus_state, ClientMessage,
    },
    HostError,
};

/// Verifies a header against the consensus state at the latest height
///
/// A consensus state already stored at the header's height must match the header. Otherwise
/// the header time must fit between the neighbouring consensus states.
/// # Errors
/// Returns an error if the client type is not registered, the trusted consensus state is
/// missing or the header does not verify
pub(crate) fn verify_header(
    registry: &ClientRegistry,
    storage: &dyn Storage,
    client_id: &str,
    client_type: ClientType,
    client_state: &ClientState,
    header: &Header,
) -> Result<VerifiedHeader, HostError> {
    let module = registry.get(client_type)?;
    let trusted_consensus_state =
        get_consensus_state(storage, client_id, client_type, client_state.latest_height())?;

    let height = header.height();
    let existing = match get_consensus_state(storage, client_id, client_type, height) {
        Ok(consensus_state) => Some(consensus_state),
        Err(HostError::ConsensusStateNotFound(_)) => None,
        Err(e) => return Err(e),
    };
    let (previous, next) = if existing.is_some() {
        (None, None)
    } else {
        (
            get_previous_consensus_state(storage, client_id, client_type, height)?,
            get_next_consensus_state(storage, client_id, client_type, height)?,
        )
    };

    epoch_light_client::verify::verify_header(
        client_state,
        &trusted_consensus_state,
        StoredConsensusStates {
            at_height: existing.as_ref(),
            previous: previous.as_ref(),
            next: next.as_ref(),
        },
        header,
        client_type,
        module.max_epoch_headers,
        module.decoder.as_ref(),
        module.verifier.as_ref(),
    )
    .map_err(HostError::VerifyClientMessageFailed)
}

/// Verifies misbehaviour against the latest consensus state at or below the evidence height
/// # Errors
/// Returns an error if the client type is not registered, the misbehaviour is addressed to
/// another client or the misbehaviour does not verify
pub(crate) fn verify_misbehaviour(
    registry: &ClientRegistry,
    storage: &dyn Storage,
    client_id: &str,
    client_type: ClientType,
    client_state: &ClientState,
    misbehaviour: &Misbehaviour,
) -> Result<(), HostError> {
    let module = registry.get(client_type)?;
    if misbehaviour.client_id() != client_id {
        return Err(HostError::ClientIdMismatch {
            expected: client_id.to_string(),
            found: misbehaviour.client_id().to_string(),
        });
    }

    let trusted_consensus_state = match misbehaviour.height() {
        Some(height) => {
            get_latest_consensus_state_at_or_below(storage, client_id, client_type, height)?
        }
        None => None,
    };
    let Some(trusted_consensus_state) = trusted_consensus_state else {
        misbehaviour
            .validate_basic(client_type, registry.id_validator(), module.decoder.as_ref())
            .map_err(HostError::MisbehaviourFailed)?;
        let epoch = misbehaviour
            .header_1
            .as_ref()
            .map(|header| header.epoch)
            .ok_or(HostError::MisbehaviourFailed(
                EpochClientError::MissingHeader(MisbehaviourHeader::Header1),
            ))?;
        return Err(HostError::MisbehaviourFailed(
            EpochClientError::MissingCommittee { epoch },
        ));
    };

    epoch_light_client::misbehaviour::verify_misbehaviour(
        client_state,
        &trusted_consensus_state,
        misbehaviour,
        client_type,
        registry.id_validator(),
        module.decoder.as_ref(),
        module.verifier.as_ref(),
    )
    .map_err(HostError::MisbehaviourFailed)
}

/// Verifies the client message (header or misbehaviour) without storing anything
/// # Errors
/// Returns an error if the client message is invalid
/// # Returns
/// An empty response
#[allow(clippy::needless_pass_by_value)]
pub fn verify_client_message(
    registry: &ClientRegistry,
    storage: &dyn Storage,
    client_id: &str,
    verify_client_message_msg: VerifyClientMessageMsg,
) -> Result<Vec<u8>, HostError> {
    let (client_type, client_state) = get_client_state(storage, client_id)?;

    match decode_client_message(&verify_client_message_msg.client_message, client_type)? {
        ClientMessage::Header(_, header) => {
            verify_header(
                registry,
                storage,
                client_id,
                client_type,
                &client_state,
                &header,
            )?;
        }
        ClientMessage::Misbehaviour(_, misbehaviour) => {
            verify_misbehaviour(
                registry,
                storage,
                client_id,
                client_type,
                &client_state,
                &misbehaviour,
            )?;
        }
    }

    Ok(Vec::new())
}

/// Checks for misbehaviour.
///
/// Misbehaviour is found if the message is verified misbehaviour, or a header with a valid
/// commit that conflicts with the stored consensus states.
/// # Errors
/// Returns an error if the client message cannot be decoded
#[allow(clippy::needless_pass_by_value)]
pub fn check_for_misbehaviour(
    registry: &ClientRegistry,
    storage: &dyn Storage,
    client_id: &str,
    check_for_misbehaviour_msg: CheckForMisbehaviourMsg,
) -> Result<Vec<u8>, HostError> {
    let (client_type, client_state) = get_client_state(storage, client_id)?;

    let found_misbehaviour =
        match decode_client_message(&check_for_misbehaviour_msg.client_message, client_type)? {
            ClientMessage::Header(_, header) => matches!(
                verify_header(
                    registry,
                    storage,
                    client_id,
                    client_type,
                    &client_state,
                    &header,
                ),
                Err(HostError::VerifyClientMessageFailed(
                    EpochClientError::ConflictingConsensusState { .. }
                        | EpochClientError::NonMonotonicTimestamp { .. }
                ))
            ),
            ClientMessage::Misbehaviour(_, misbehaviour) => verify_misbehaviour(
                registry,
                storage,
                client_id,
                client_type,
                &client_state,
                &misbehaviour,
            )
            .is_ok(),
        };

    Ok(serde_json::to_vec(&CheckForMisbehaviourResult {
        found_misbehaviour,
    })?)
}

/// Gets the consensus timestamp at a given height
/// # Errors
/// Returns an error if the consensus state is not found
/// # Returns
/// The timestamp at the given height in nanoseconds
#[allow(clippy::needless_pass_by_value)]
pub fn timestamp_at_height(
    storage: &dyn Storage,
    client_id: &str,
    timestamp_at_height_msg: TimestampAtHeightMsg,
) -> Result<Vec<u8>, HostError> {
    let (client_type, _) = get_client_state(storage, client_id)?;
    let consensus_state = get_consensus_state(
        storage,
        client_id,
        client_type,
        timestamp_at_height_msg.height,
    )?;

    Ok(serde_json::to_vec(&TimestampAtHeightResult {
        timestamp: consensus_state.get_timestamp(),
    })?)
}

/// Gets the status of the light client
/// # Returns
/// The current status of the client
/// # Errors
/// Errors if the client state can't be deserialized.
pub fn status(storage: &dyn Storage, client_id: &str) -> Result<Vec<u8>, HostError> {
    let (_, client_state) = get_client_state(storage, client_id)?;

    Ok(serde_json::to_vec(&StatusResult {
        status: client_state.status(),
    })?)
}

/// Gets the latest height of the light client
/// # Errors
/// Errors if the client state can't be deserialized.
pub fn latest_height(storage: &dyn Storage, client_id: &str) -> Result<Vec<u8>, HostError> {
    let (_, client_state) = get_client_state(storage, client_id)?;

    Ok(serde_json::to_vec(&LatestHeightResult {
        height: client_state.latest_height(),
    })?)
}

/// Gets the genesis metadata of the light client
/// # Errors
/// Errors if the client state can't be deserialized.
pub fn export_metadata(storage: &dyn Storage, client_id: &str) -> Result<Vec<u8>, HostError> {
    let (_, client_state) = get_client_state(storage, client_id)?;

    Ok(serde_json::to_vec(&ExportMetadataResult {
        genesis_metadata: client_state.export_metadata(),
    })?)
}
