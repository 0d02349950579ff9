//! Test utilities for the epoch light client

#[cfg(any(test, feature = "test-utils"))]
pub use fixtures::*;

#[allow(missing_docs, clippy::missing_panics_doc)]
#[cfg(any(test, feature = "test-utils"))]
mod fixtures {
    use alloy_primitives::{Address, Bytes, B256, U256};
    use sha2::{Digest, Sha256};

    use crate::{
        client_state::ClientState,
        consensus_state::ConsensusState,
        decoder::{BeaconHeaderDecoder, DecodedBeaconHeader},
        error::EpochClientError,
        header::{Header, SignedHeader},
        identifier::ClientIdValidator,
        misbehaviour::Misbehaviour,
        quorum::CommitSignatureVerifier,
        types::validator_set::{CommitteeMember, ValidatorSet},
    };

    pub const CLIENT_ID: &str = "harmony-0";
    pub const EPOCH: u64 = 5;
    pub const EPOCH_SIZE: u64 = 20;
    pub const LATEST_HEIGHT: u64 = 100;
    pub const TRUSTED_TIME: u64 = 1_000;

    /// Decodes beacon headers encoded with [`encode_beacon_header`]
    #[derive(Clone, Copy, Debug, Default)]
    pub struct TestBeaconHeaderDecoder;

    impl BeaconHeaderDecoder for TestBeaconHeaderDecoder {
        fn decode(&self, bytes: &[u8]) -> Result<DecodedBeaconHeader, String> {
            serde_json::from_slice(bytes).map_err(|e| e.to_string())
        }
    }

    /// Accepts signatures produced by [`sign_commit`]
    #[derive(Clone, Copy, Debug, Default)]
    pub struct TestSignatureVerifier;

    impl CommitSignatureVerifier for TestSignatureVerifier {
        type Error = String;

        fn fast_aggregate_verify(
            &self,
            public_keys: Vec<&Bytes>,
            msg: B256,
            signature: &Bytes,
        ) -> Result<(), Self::Error> {
            if aggregate_signature(public_keys, msg) == *signature {
                Ok(())
            } else {
                Err(format!("signature {signature:?} does not match message {msg:?}"))
            }
        }
    }

    /// Accepts any non-empty identifier
    #[derive(Clone, Copy, Debug, Default)]
    pub struct AnyClientIdValidator;

    impl ClientIdValidator for AnyClientIdValidator {
        fn validate(&self, client_id: &str) -> Result<(), EpochClientError> {
            if client_id.is_empty() {
                return Err(EpochClientError::InvalidClientIdentifier {
                    client_id: String::new(),
                    reason: "identifier cannot be empty".to_string(),
                });
            }
            Ok(())
        }
    }

    fn aggregate_signature(public_keys: Vec<&Bytes>, msg: B256) -> Bytes {
        let mut hasher = Sha256::new();
        for key in public_keys {
            hasher.update(key);
        }
        hasher.update(msg);
        Bytes::copy_from_slice(&hasher.finalize())
    }

    /// A committee with one member per weight; `seed` keeps committees of different epochs apart
    #[must_use]
    pub fn committee_with_seed(seed: u8, weights: &[u64]) -> ValidatorSet {
        ValidatorSet::new(
            weights
                .iter()
                .zip(1u8..)
                .map(|(&weight, i)| {
                    let id = seed.wrapping_mul(16).wrapping_add(i);
                    CommitteeMember {
                        address: Address::repeat_byte(id),
                        bls_public_key: Bytes::from(vec![id; 48]),
                        weight,
                    }
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn committee(weights: &[u64]) -> ValidatorSet {
        committee_with_seed(0, weights)
    }

    /// Signs `hash` on behalf of the members at `signers`
    #[must_use]
    pub fn sign_commit(committee: &ValidatorSet, signers: &[usize], hash: B256) -> Bytes {
        aggregate_signature(
            signers
                .iter()
                .map(|&i| &committee.members[i].bls_public_key)
                .collect(),
            hash,
        )
    }

    /// A bitmap with every member of a committee of `size` set
    #[must_use]
    pub fn full_bitmap(size: usize) -> Bytes {
        let mut bitmap = vec![0u8; size.div_ceil(8)];
        for i in 0..size {
            bitmap[i / 8] |= 1 << (i % 8);
        }
        bitmap.into()
    }

    #[must_use]
    pub fn encode_beacon_header(decoded: &DecodedBeaconHeader) -> Bytes {
        serde_json::to_vec(decoded).unwrap().into()
    }

    #[must_use]
    pub fn beacon_header(number: u64, epoch: u64, time: u64) -> DecodedBeaconHeader {
        let mut hash = [0u8; 32];
        hash[..8].copy_from_slice(&number.to_be_bytes());
        hash[8..16].copy_from_slice(&time.to_be_bytes());
        DecodedBeaconHeader {
            number,
            epoch: U256::from(epoch),
            time,
            hash: B256::from(hash),
            next_committee: None,
        }
    }

    /// A beacon header signed by the whole committee
    #[must_use]
    pub fn signed_header(committee: &ValidatorSet, decoded: &DecodedBeaconHeader) -> SignedHeader {
        let signers: Vec<usize> = (0..committee.len()).collect();
        SignedHeader {
            header: encode_beacon_header(decoded),
            commit_sig: sign_commit(committee, &signers, decoded.hash),
            commit_bitmap: full_bitmap(committee.len()),
        }
    }

    /// A header for `decoded`, signed by the whole committee
    #[must_use]
    pub fn header(committee: &ValidatorSet, decoded: &DecodedBeaconHeader) -> Header {
        Header {
            number: decoded.number,
            epoch: decoded.epoch,
            signed_header: Some(signed_header(committee, decoded)),
            account_proof: Bytes::from(decoded.number.to_be_bytes().to_vec()),
            commitment_root: Bytes::from(vec![0x22; 32]),
            epoch_headers: vec![],
        }
    }

    /// The last header of `epoch`, announcing `next_committee`
    #[must_use]
    pub fn epoch_header(
        committee: &ValidatorSet,
        epoch: u64,
        next_committee: &ValidatorSet,
    ) -> SignedHeader {
        let decoded = DecodedBeaconHeader {
            next_committee: Some(next_committee.clone()),
            ..beacon_header((epoch + 1) * EPOCH_SIZE - 1, epoch, TRUSTED_TIME + epoch)
        };
        signed_header(committee, &decoded)
    }

    #[must_use]
    pub fn client_state() -> ClientState {
        ClientState {
            client_identifier: CLIENT_ID.to_string(),
            frozen: false,
            latest_epoch: U256::from(EPOCH),
            epoch_size: EPOCH_SIZE,
            latest_height: LATEST_HEIGHT,
        }
    }

    #[must_use]
    pub fn consensus_state(epoch: u64, validators: ValidatorSet) -> ConsensusState {
        ConsensusState {
            epoch: U256::from(epoch),
            validators,
            commitment_root: Bytes::from(vec![0x11; 32]),
            timestamp: TRUSTED_TIME * 1_000_000_000,
        }
    }

    /// Two conflicting headers at the same height, both signed by `committee`
    #[must_use]
    pub fn misbehaviour(committee: &ValidatorSet, number: u64, epoch: u64) -> Misbehaviour {
        let mut decoded_2 = beacon_header(number, epoch, TRUSTED_TIME + 10);
        decoded_2.hash = B256::repeat_byte(0xbb);
        let mut header_2 = header(committee, &decoded_2);
        header_2.account_proof = Bytes::from_static(b"proof-2");

        Misbehaviour {
            client_id: CLIENT_ID.to_string(),
            header_1: Some(header(committee, &beacon_header(number, epoch, TRUSTED_TIME + 20))),
            header_2: Some(header_2),
        }
    }
}
