//! Weighted quorum math and commit signature verification

use alloy_primitives::{Bytes, B256};

use crate::{
    error::EpochClientError, header::SignedHeader, types::validator_set::ValidatorSet,
};

/// Verifies aggregate committee signatures
///
/// No implementation ships with this crate. The host registers one per client type.
pub trait CommitSignatureVerifier {
    /// The error type for the verifier
    type Error: std::fmt::Display;

    /// Verifies `signature` as the aggregate of `public_keys` signing `msg`
    ///
    /// # Errors
    /// Returns an error if the signature is invalid
    fn fast_aggregate_verify(
        &self,
        public_keys: Vec<&Bytes>,
        msg: B256,
        signature: &Bytes,
    ) -> Result<(), Self::Error>;
}

/// Returns the indices of the committee members set in `bitmap`
///
/// Bit `i` is bit `i % 8` (least significant first) of byte `i / 8`.
///
/// # Errors
/// Returns [`EpochClientError::InvalidCommitBitmap`] if the bitmap length does not match the
/// committee size or if it marks positions past the end of the committee
pub fn signer_indices(
    committee: &ValidatorSet,
    bitmap: &[u8],
) -> Result<Vec<usize>, EpochClientError> {
    let committee_size = committee.len();
    let expected_len = committee_size.div_ceil(8);
    ensure!(
        bitmap.len() == expected_len,
        EpochClientError::InvalidCommitBitmap {
            reason: format!(
                "expected {expected_len} bytes for {committee_size} members, got {}",
                bitmap.len()
            ),
        }
    );

    let is_set = |i: usize| bitmap[i / 8] & (1 << (i % 8)) != 0;
    ensure!(
        !(committee_size..expected_len * 8).any(is_set),
        EpochClientError::InvalidCommitBitmap {
            reason: "bits set past the end of the committee".to_string(),
        }
    );

    Ok((0..committee_size).filter(|&i| is_set(i)).collect())
}

/// Verifies that a commit carries a two-thirds weighted quorum of `committee` and that its
/// aggregate signature over `signing_hash` is valid
///
/// # Errors
/// Returns an error if:
/// - The commit bitmap is malformed
/// - The signers hold two-thirds or less of the total weight
/// - The aggregate signature does not verify
pub fn verify_commit<V: CommitSignatureVerifier + ?Sized>(
    committee: &ValidatorSet,
    signed_header: &SignedHeader,
    signing_hash: B256,
    verifier: &V,
) -> Result<(), EpochClientError> {
    let signers = signer_indices(committee, &signed_header.commit_bitmap)?;

    let signed_weight: u128 = signers
        .iter()
        .map(|&i| u128::from(committee.members[i].weight))
        .sum();
    let total_weight = committee.total_weight();
    ensure!(
        signed_weight * 3 > total_weight * 2,
        EpochClientError::InsufficientQuorum {
            signed_weight,
            total_weight,
        }
    );

    let public_keys = signers
        .iter()
        .map(|&i| &committee.members[i].bls_public_key)
        .collect();
    verifier
        .fast_aggregate_verify(public_keys, signing_hash, &signed_header.commit_sig)
        .map_err(|e| EpochClientError::CommitSignatureVerification(e.to_string()))
}
