//! Header verification for the epoch light client

use alloy_primitives::U256;

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    decoder::{BeaconHeaderDecoder, DecodedBeaconHeader},
    error::EpochClientError,
    header::Header,
    quorum::{verify_commit, CommitSignatureVerifier},
    types::{client_type::ClientType, validator_set::ValidatorSet},
};

/// A header that passed [`verify_header`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VerifiedHeader {
    /// The decoded target beacon header
    pub decoded: DecodedBeaconHeader,
    /// The committee that signed the target beacon header
    pub committee: ValidatorSet,
}

/// Consensus states the host already stores around a header's height
///
/// `previous` and `next` are only consulted when nothing is stored at the height itself.
#[derive(Clone, Copy, Debug, Default)]
pub struct StoredConsensusStates<'a> {
    /// The consensus state stored at the header's height
    pub at_height: Option<&'a ConsensusState>,
    /// The consensus state with the greatest height below the header's
    pub previous: Option<&'a ConsensusState>,
    /// The consensus state with the smallest height above the header's
    pub next: Option<&'a ConsensusState>,
}

/// Verifies the header of the light client against the trusted consensus state
///
/// The header's epoch headers walk the committee forward one epoch at a time, from the
/// trusted epoch to the header's epoch. Each of them must be the last block of its epoch,
/// signed by the committee of that epoch, and announce the committee of the next one.
///
/// The stored consensus states are checked last, so a
/// [`EpochClientError::ConflictingConsensusState`] or
/// [`EpochClientError::NonMonotonicTimestamp`] is only returned for a header whose commit
/// verified.
///
/// # Errors
/// Returns an error if:
/// - The client is frozen
/// - The header is malformed
/// - The header is for an epoch older than the trusted one
/// - The epoch headers do not bridge the trusted epoch to the header's epoch
/// - A beacon header cannot be decoded or does not match the header
/// - A commit lacks a quorum or carries an invalid signature
/// - The header disagrees with the consensus state stored at its height
/// - The header time is before the previous or after the next stored consensus state
#[allow(clippy::too_many_arguments)]
pub fn verify_header<D, V>(
    client_state: &ClientState,
    trusted_consensus_state: &ConsensusState,
    stored: StoredConsensusStates<'_>,
    header: &Header,
    client_type: ClientType,
    max_epoch_headers: u64,
    decoder: &D,
    verifier: &V,
) -> Result<VerifiedHeader, EpochClientError>
where
    D: BeaconHeaderDecoder + ?Sized,
    V: CommitSignatureVerifier + ?Sized,
{
    ensure!(!client_state.frozen, EpochClientError::ClientFrozen);
    header.validate_basic(client_type)?;

    let epoch_size = U256::from(client_state.epoch_size);
    ensure!(epoch_size > U256::ZERO, EpochClientError::InvalidEpochSize);

    ensure!(
        header.epoch >= trusted_consensus_state.epoch,
        EpochClientError::StaleEpoch {
            header_epoch: header.epoch,
            trusted_epoch: trusted_consensus_state.epoch,
        }
    );

    let epoch_headers = header.epoch_headers.len() as u64;
    ensure!(
        epoch_headers <= max_epoch_headers,
        EpochClientError::InvalidEpochHeaders {
            reason: format!("{epoch_headers} epoch headers exceed the limit of {max_epoch_headers}"),
        }
    );
    let epoch_gap = header.epoch - trusted_consensus_state.epoch;
    ensure!(
        epoch_gap == U256::from(epoch_headers),
        EpochClientError::InvalidEpochHeaders {
            reason: format!(
                "expected {epoch_gap} epoch headers between epoch {} and {}, got {epoch_headers}",
                trusted_consensus_state.epoch, header.epoch
            ),
        }
    );

    let mut epoch = trusted_consensus_state.epoch;
    let mut committee = trusted_consensus_state.validators.clone();
    for epoch_header in &header.epoch_headers {
        let decoded = decoder
            .decode(&epoch_header.header)
            .map_err(EpochClientError::BeaconHeaderDecode)?;

        ensure!(
            decoded.epoch() == epoch,
            EpochClientError::InvalidEpochHeaders {
                reason: format!("expected epoch {epoch}, got {}", decoded.epoch()),
            }
        );
        let last_block = (epoch + U256::from(1)) * epoch_size - U256::from(1);
        ensure!(
            U256::from(decoded.number()) == last_block,
            EpochClientError::InvalidEpochHeaders {
                reason: format!(
                    "block {} is not the last block ({last_block}) of epoch {epoch}",
                    decoded.number()
                ),
            }
        );

        verify_commit(&committee, epoch_header, decoded.hash(), verifier)?;

        committee = decoded
            .next_committee
            .ok_or_else(|| EpochClientError::InvalidEpochHeaders {
                reason: format!("last block of epoch {epoch} does not announce the next committee"),
            })?;
        epoch += U256::from(1);
    }

    let signed_header = header.signed_header()?;
    let decoded = decoder
        .decode(&signed_header.header)
        .map_err(EpochClientError::BeaconHeaderDecode)?;

    ensure!(
        decoded.number() == header.number && decoded.epoch() == header.epoch,
        EpochClientError::MalformedHeader {
            reason: format!(
                "beacon header ({}, epoch {}) does not match header ({}, epoch {})",
                decoded.number(),
                decoded.epoch(),
                header.number,
                header.epoch
            ),
        }
    );
    header.check_epoch_membership(client_state.epoch_size)?;

    verify_commit(&committee, signed_header, decoded.hash(), verifier)?;

    check_stored_consensus_states(header, decoded.timestamp_nanos()?, stored)?;

    Ok(VerifiedHeader { decoded, committee })
}

fn check_stored_consensus_states(
    header: &Header,
    timestamp: u64,
    stored: StoredConsensusStates<'_>,
) -> Result<(), EpochClientError> {
    if let Some(existing) = stored.at_height {
        ensure!(
            existing.commitment_root == header.commitment_root && existing.timestamp == timestamp,
            EpochClientError::ConflictingConsensusState {
                height: header.height(),
            }
        );
        return Ok(());
    }

    if let Some(previous) = stored.previous {
        ensure!(
            timestamp >= previous.timestamp,
            EpochClientError::NonMonotonicTimestamp {
                reason: format!(
                    "timestamp {timestamp} is before the previous consensus timestamp {}",
                    previous.timestamp
                ),
            }
        );
    }
    if let Some(next) = stored.next {
        ensure!(
            timestamp <= next.timestamp,
            EpochClientError::NonMonotonicTimestamp {
                reason: format!(
                    "timestamp {timestamp} is after the next consensus timestamp {}",
                    next.timestamp
                ),
            }
        );
    }

    Ok(())
}
