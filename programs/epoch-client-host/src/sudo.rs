//! This module contains the sudo message handlers

use cosmwasm_std::Storage;
use epoch_light_client::{
    client_state::ClientState, consensus_state::ConsensusState, header::Header,
    misbehaviour::Misbehaviour, update::update_consensus_state,
};

use crate::{
    msg::{
        InitializeMsg, SubstituteClientMsg, UpdateStateMsg, UpdateStateOnMisbehaviourMsg,
        UpdateStateResult, VerifyUpgradeAndUpdateStateMsg,
    },
    query,
    registry::ClientRegistry,
    state::{
        decode_any, decode_client_state, get_client_state, has_client_state,
        store_client_state, store_consensus_state,
    },
    HostError,
};

/// Create the client from its initial client and consensus state
/// # Errors
/// Returns an error if the client exists, the client type is not registered, either state
/// has the wrong type or the client rejects the states
#[allow(clippy::needless_pass_by_value)]
pub fn initialize(
    registry: &ClientRegistry,
    storage: &mut dyn Storage,
    client_id: &str,
    initialize_msg: InitializeMsg,
) -> Result<Vec<u8>, HostError> {
    if has_client_state(storage, client_id) {
        return Err(HostError::ClientAlreadyExists(client_id.to_string()));
    }

    let (client_type, client_state) = decode_client_state(&initialize_msg.client_state)?;
    registry.get(client_type)?;
    let consensus_state: ConsensusState = decode_any(
        &initialize_msg.consensus_state,
        client_type.consensus_state_type_url(),
    )?;

    registry
        .id_validator()
        .validate(client_id)
        .map_err(HostError::InitializeFailed)?;
    client_state
        .initialize(&consensus_state)
        .map_err(HostError::InitializeFailed)?;

    let height = client_state.latest_height();
    store_client_state(storage, client_id, client_type, &client_state)?;
    store_consensus_state(storage, client_id, client_type, height, &consensus_state)?;

    tracing::info!(client_id, %client_type, %height, "created client");

    Ok(Vec::new())
}

/// Update the state of the light client
///
/// The header is verified again before anything is stored.
/// # Errors
/// Returns an error if the client is frozen, deserialization fails or the header does not
/// verify
/// # Returns
/// The updated height
#[allow(clippy::needless_pass_by_value)]
pub fn update_state(
    registry: &ClientRegistry,
    storage: &mut dyn Storage,
    client_id: &str,
    update_state_msg: UpdateStateMsg,
) -> Result<Vec<u8>, HostError> {
    let (client_type, client_state) = get_client_state(storage, client_id)?;
    if client_state.frozen {
        return Err(HostError::ClientFrozen(client_id.to_string()));
    }

    let header: Header = decode_any(
        &update_state_msg.client_message,
        client_type.header_type_url(),
    )?;

    let verified = query::verify_header(
        registry,
        storage,
        client_id,
        client_type,
        &client_state,
        &header,
    )?;

    let (updated_height, updated_consensus_state, updated_client_state) =
        update_consensus_state(client_state, &header, verified)
            .map_err(HostError::UpdateClientStateFailed)?;

    store_consensus_state(
        storage,
        client_id,
        client_type,
        updated_height,
        &updated_consensus_state,
    )?;
    if let Some(client_state) = updated_client_state {
        store_client_state(storage, client_id, client_type, &client_state)?;
    }

    tracing::info!(
        client_id,
        %client_type,
        height = %updated_height,
        epoch = %updated_consensus_state.epoch,
        "updated client"
    );

    Ok(serde_json::to_vec(&UpdateStateResult {
        heights: vec![updated_height],
    })?)
}

/// Update the state of the light client on misbehaviour
/// # Errors
/// Returns an error if the client is frozen or the misbehaviour verification fails
#[allow(clippy::needless_pass_by_value)]
pub fn misbehaviour(
    registry: &ClientRegistry,
    storage: &mut dyn Storage,
    client_id: &str,
    msg: UpdateStateOnMisbehaviourMsg,
) -> Result<Vec<u8>, HostError> {
    let (client_type, mut client_state) = get_client_state(storage, client_id)?;
    if client_state.frozen {
        return Err(HostError::ClientFrozen(client_id.to_string()));
    }

    let misbehaviour: Misbehaviour =
        decode_any(&msg.client_message, client_type.misbehaviour_type_url())?;

    if let Err(e) = query::verify_misbehaviour(
        registry,
        storage,
        client_id,
        client_type,
        &client_state,
        &misbehaviour,
    ) {
        tracing::debug!(client_id, error = %e, "rejected misbehaviour");
        return Err(e);
    }

    client_state.freeze();
    store_client_state(storage, client_id, client_type, &client_state)?;

    tracing::warn!(
        client_id,
        %client_type,
        misbehaviour_type = misbehaviour.misbehaviour_type(),
        "client frozen by misbehaviour"
    );

    Ok(Vec::new())
}

/// Replace the client with a substitute
/// # Errors
/// Returns an error if either client is missing or the client rejects the substitute
#[allow(clippy::needless_pass_by_value)]
pub fn substitute_client(
    registry: &ClientRegistry,
    storage: &mut dyn Storage,
    client_id: &str,
    msg: SubstituteClientMsg,
) -> Result<Vec<u8>, HostError> {
    let (client_type, client_state) = get_client_state(storage, client_id)?;
    registry.get(client_type)?;
    let (_, substitute_client_state) = get_client_state(storage, &msg.substitute_client_id)?;

    let client_state = client_state
        .check_substitute_and_update_state(&substitute_client_state)
        .map_err(HostError::RecoveryFailed)?;
    store_client_state(storage, client_id, client_type, &client_state)?;

    Ok(Vec::new())
}

/// Upgrade the client
/// # Errors
/// Returns an error if the upgraded states have the wrong type or the client rejects the
/// upgrade
#[allow(clippy::needless_pass_by_value)]
pub fn upgrade_client(
    registry: &ClientRegistry,
    storage: &mut dyn Storage,
    client_id: &str,
    msg: VerifyUpgradeAndUpdateStateMsg,
) -> Result<Vec<u8>, HostError> {
    let (client_type, client_state) = get_client_state(storage, client_id)?;
    registry.get(client_type)?;

    let upgrade_client_state: ClientState = decode_any(
        &msg.upgrade_client_state,
        client_type.client_state_type_url(),
    )?;
    let upgrade_consensus_state: ConsensusState = decode_any(
        &msg.upgrade_consensus_state,
        client_type.consensus_state_type_url(),
    )?;

    let (client_state, consensus_state) = client_state
        .verify_upgrade_and_update_state(
            &upgrade_client_state,
            &upgrade_consensus_state,
            &msg.proof_upgrade_client,
            &msg.proof_upgrade_consensus_state,
        )
        .map_err(HostError::RecoveryFailed)?;

    let height = client_state.latest_height();
    store_client_state(storage, client_id, client_type, &client_state)?;
    store_consensus_state(storage, client_id, client_type, height, &consensus_state)?;

    Ok(Vec::new())
}
