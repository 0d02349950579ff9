//! Epoch light client update logic

use crate::{
    client_state::ClientState, consensus_state::ConsensusState, error::EpochClientError,
    header::Header, types::height::Height, verify::VerifiedHeader,
};

/// Updates the consensus state with a verified header
/// Returns (`new_height`, `new_consensus_state`, `optional_new_client_state`)
/// # Errors
/// Returns [`EpochClientError::TimestampOverflow`] if the beacon header time does not fit in
/// nanoseconds
pub fn update_consensus_state(
    current_client_state: ClientState,
    header: &Header,
    verified: VerifiedHeader,
) -> Result<(Height, ConsensusState, Option<ClientState>), EpochClientError> {
    let timestamp = verified.decoded.timestamp_nanos()?;

    let new_consensus_state = ConsensusState {
        epoch: header.epoch,
        validators: verified.committee,
        commitment_root: header.commitment_root.clone(),
        timestamp,
    };

    // Update client state if the height has progressed beyond the latest
    let height_has_progressed = header.number > current_client_state.latest_height;
    let new_client_state = height_has_progressed.then(|| ClientState {
        latest_height: header.number,
        latest_epoch: header.epoch.max(current_client_state.latest_epoch),
        ..current_client_state
    });

    Ok((header.height(), new_consensus_state, new_client_state))
}
