//! This module defines [`Misbehaviour`] and the equivocation checks run against it.
//!
//! Like [`Header`], misbehaviour carries no client type of its own; it is tagged by the type URL
//! it was encoded under.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    decoder::{BeaconHeaderDecoder, DecodedBeaconHeader},
    error::{EpochClientError, MisbehaviourHeader},
    header::{Header, SignedHeader},
    identifier::ClientIdValidator,
    quorum::{verify_commit, CommitSignatureVerifier},
    types::{
        client_type::{ClientType, CLIENT_MISBEHAVIOUR_TYPE},
        height::Height,
    },
};

/// Two headers signed by the same committee at the same position of the chain
#[derive(Serialize, Deserialize, PartialEq, Eq, Clone, Debug, Default)]
pub struct Misbehaviour {
    /// The client the evidence is submitted to
    pub client_id: String,
    /// The later of the two headers
    pub header_1: Option<Header>,
    /// The earlier of the two headers
    pub header_2: Option<Header>,
}

/// A misbehaviour that passed [`Misbehaviour::validate_basic`], with its decoded beacon headers
struct Evidence<'a> {
    header_1: &'a Header,
    header_2: &'a Header,
    signed_1: &'a SignedHeader,
    signed_2: &'a SignedHeader,
    decoded_1: DecodedBeaconHeader,
    decoded_2: DecodedBeaconHeader,
}

type EvidenceHeader<'e> = (
    MisbehaviourHeader,
    &'e Header,
    &'e SignedHeader,
    &'e DecodedBeaconHeader,
);

impl Evidence<'_> {
    const fn headers(&self) -> [EvidenceHeader<'_>; 2] {
        [
            (
                MisbehaviourHeader::Header1,
                self.header_1,
                self.signed_1,
                &self.decoded_1,
            ),
            (
                MisbehaviourHeader::Header2,
                self.header_2,
                self.signed_2,
                &self.decoded_2,
            ),
        ]
    }
}

impl Misbehaviour {
    /// The client the evidence is submitted to
    #[must_use]
    pub fn client_id(&self) -> &str {
        &self.client_id
    }

    /// The evidence type reported to the host
    #[must_use]
    #[allow(clippy::unused_self)]
    pub const fn misbehaviour_type(&self) -> &'static str {
        CLIENT_MISBEHAVIOUR_TYPE
    }

    /// The height both headers claim, taken from header 1
    #[must_use]
    pub fn height(&self) -> Option<Height> {
        self.header_1.as_ref().map(Header::height)
    }

    /// Checks that the two headers are well formed and conflict
    ///
    /// Header 1 must be the later (or equally timed) of the two. Swapped evidence is rejected
    /// rather than reordered.
    ///
    /// # Errors
    /// Returns the first failing check, in this order:
    /// - Either header is missing
    /// - The client identifier is rejected by `id_validator`
    /// - Either header fails [`Header::validate_basic`]
    /// - The headers have different epochs or heights
    /// - Either header carries epoch headers
    /// - Either beacon header cannot be decoded
    /// - Header 1 is older than header 2
    /// - The commit signatures are identical
    /// - The account proofs and the beacon header hashes are both identical
    pub fn validate_basic<I, D>(
        &self,
        client_type: ClientType,
        id_validator: &I,
        decoder: &D,
    ) -> Result<(), EpochClientError>
    where
        I: ClientIdValidator + ?Sized,
        D: BeaconHeaderDecoder + ?Sized,
    {
        self.check_evidence(client_type, id_validator, decoder)
            .map(|_| ())
    }

    fn check_evidence<I, D>(
        &self,
        client_type: ClientType,
        id_validator: &I,
        decoder: &D,
    ) -> Result<Evidence<'_>, EpochClientError>
    where
        I: ClientIdValidator + ?Sized,
        D: BeaconHeaderDecoder + ?Sized,
    {
        let header_1 = self
            .header_1
            .as_ref()
            .ok_or(EpochClientError::MissingHeader(MisbehaviourHeader::Header1))?;
        let header_2 = self
            .header_2
            .as_ref()
            .ok_or(EpochClientError::MissingHeader(MisbehaviourHeader::Header2))?;

        id_validator.validate(&self.client_id)?;

        for (which, header) in [
            (MisbehaviourHeader::Header1, header_1),
            (MisbehaviourHeader::Header2, header_2),
        ] {
            header
                .validate_basic(client_type)
                .map_err(|e| EpochClientError::HeaderValidationFailed {
                    which,
                    source: Box::new(e),
                })?;
        }

        ensure!(
            header_1.epoch == header_2.epoch,
            EpochClientError::EpochMismatch {
                epoch_1: header_1.epoch,
                epoch_2: header_2.epoch,
            }
        );
        ensure!(
            header_1.height() == header_2.height(),
            EpochClientError::HeightMismatch {
                height_1: header_1.height(),
                height_2: header_2.height(),
            }
        );

        ensure!(
            header_1.epoch_headers.is_empty(),
            EpochClientError::UnsupportedEvidenceShape(MisbehaviourHeader::Header1)
        );
        ensure!(
            header_2.epoch_headers.is_empty(),
            EpochClientError::UnsupportedEvidenceShape(MisbehaviourHeader::Header2)
        );

        let signed_1 = header_1.signed_header()?;
        let signed_2 = header_2.signed_header()?;

        let decoded_1 =
            decoder
                .decode(&signed_1.header)
                .map_err(|reason| EpochClientError::DecodeFailed {
                    which: MisbehaviourHeader::Header1,
                    reason,
                })?;
        let decoded_2 =
            decoder
                .decode(&signed_2.header)
                .map_err(|reason| EpochClientError::DecodeFailed {
                    which: MisbehaviourHeader::Header2,
                    reason,
                })?;

        ensure!(
            decoded_1.time() >= decoded_2.time(),
            EpochClientError::TimestampOrdering {
                time_1: decoded_1.time(),
                time_2: decoded_2.time(),
            }
        );

        ensure!(
            signed_1.commit_sig != signed_2.commit_sig,
            EpochClientError::NonDistinctEvidence {
                reason: "headers have identical commit signatures".to_string(),
            }
        );
        ensure!(
            header_1.account_proof != header_2.account_proof
                || decoded_1.hash() != decoded_2.hash(),
            EpochClientError::NonDistinctEvidence {
                reason: "headers have identical account proofs and beacon header hashes"
                    .to_string(),
            }
        );

        Ok(Evidence {
            header_1,
            header_2,
            signed_1,
            signed_2,
            decoded_1,
            decoded_2,
        })
    }
}

/// Verifies that a misbehaviour proves the committee of the trusted consensus state signed two
/// conflicting headers
///
/// On success the caller freezes the client.
///
/// # Errors
/// Returns an error if:
/// - The client is frozen
/// - [`Misbehaviour::validate_basic`] fails
/// - The trusted consensus state is not for the evidence epoch
/// - A decoded beacon header does not match the number or epoch its header claims
/// - A header's number is outside the epoch it claims
/// - Either commit lacks a quorum of the trusted committee or carries an invalid signature
#[allow(clippy::too_many_arguments)]
pub fn verify_misbehaviour<I, D, V>(
    client_state: &ClientState,
    trusted_consensus_state: &ConsensusState,
    misbehaviour: &Misbehaviour,
    client_type: ClientType,
    id_validator: &I,
    decoder: &D,
    verifier: &V,
) -> Result<(), EpochClientError>
where
    I: ClientIdValidator + ?Sized,
    D: BeaconHeaderDecoder + ?Sized,
    V: CommitSignatureVerifier + ?Sized,
{
    ensure!(!client_state.frozen, EpochClientError::ClientFrozen);

    let evidence = misbehaviour.check_evidence(client_type, id_validator, decoder)?;

    let epoch: U256 = evidence.header_1.epoch;
    ensure!(
        trusted_consensus_state.epoch == epoch,
        EpochClientError::MissingCommittee { epoch }
    );

    for (which, header, signed_header, decoded) in evidence.headers() {
        let wrap = |e| EpochClientError::HeaderValidationFailed {
            which,
            source: Box::new(e),
        };

        ensure!(
            decoded.number() == header.number && decoded.epoch() == header.epoch,
            wrap(EpochClientError::MalformedHeader {
                reason: "beacon header does not match header number and epoch".to_string(),
            })
        );
        header
            .check_epoch_membership(client_state.epoch_size)
            .map_err(wrap)?;

        verify_commit(
            &trusted_consensus_state.validators,
            signed_header,
            decoded.hash(),
            verifier,
        )
        .map_err(wrap)?;
    }

    Ok(())
}
