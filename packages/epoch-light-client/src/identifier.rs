//! Client identifier grammar checks.

use ibc_core_host_types::identifiers::ClientId;

use crate::error::EpochClientError;

/// Validates client identifiers against the host's grammar
pub trait ClientIdValidator {
    /// Checks that `client_id` is acceptable
    ///
    /// # Errors
    /// Returns [`EpochClientError::InvalidClientIdentifier`] if the identifier is rejected
    fn validate(&self, client_id: &str) -> Result<(), EpochClientError>;
}

/// The ICS-24 client identifier grammar
#[derive(Clone, Copy, Debug, Default)]
pub struct Ics24ClientIdValidator;

impl ClientIdValidator for Ics24ClientIdValidator {
    fn validate(&self, client_id: &str) -> Result<(), EpochClientError> {
        client_id
            .parse::<ClientId>()
            .map(|_| ())
            .map_err(|e| EpochClientError::InvalidClientIdentifier {
                client_id: client_id.to_string(),
                reason: e.to_string(),
            })
    }
}
