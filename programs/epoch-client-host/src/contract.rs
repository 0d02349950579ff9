//! This module contains the [`ClientHost`] entry points that route messages to their handlers

use cosmwasm_std::Storage;
use epoch_light_client::{
    decoder::BeaconHeaderDecoder, identifier::ClientIdValidator, types::client_type::ClientType,
};

use crate::{
    config::HostConfig,
    msg::{QueryMsg, SudoMsg},
    query,
    registry::{ClientRegistry, DynSignatureVerifier},
    sudo, HostError,
};

/// Serves the epoch light clients of a host chain
///
/// All clients share one store; every handler scopes its keys by client identifier.
#[derive(Debug)]
pub struct ClientHost {
    registry: ClientRegistry,
}

impl ClientHost {
    /// Creates a host serving the enabled client types of `config`
    /// # Errors
    /// Returns an error if the configuration is invalid
    pub fn new<F>(
        config: &HostConfig,
        id_validator: Box<dyn ClientIdValidator>,
        capabilities: F,
    ) -> Result<Self, HostError>
    where
        F: FnMut(ClientType) -> (Box<dyn BeaconHeaderDecoder>, Box<DynSignatureVerifier>),
    {
        Ok(Self::from_registry(ClientRegistry::from_config(
            config,
            id_validator,
            capabilities,
        )?))
    }

    /// Creates a host from a built registry
    #[must_use]
    pub const fn from_registry(registry: ClientRegistry) -> Self {
        Self { registry }
    }

    /// The registry of served client types
    #[must_use]
    pub const fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    /// The sudo entry point.
    /// It routes the message to the appropriate handler.
    /// # Errors
    /// Will return an error if the handler returns an error.
    /// A failed call leaves the store untouched.
    pub fn sudo(
        &self,
        storage: &mut dyn Storage,
        client_id: &str,
        msg: SudoMsg,
    ) -> Result<Vec<u8>, HostError> {
        match msg {
            SudoMsg::Initialize(msg) => sudo::initialize(&self.registry, storage, client_id, msg),
            SudoMsg::UpdateState(msg) => {
                sudo::update_state(&self.registry, storage, client_id, msg)
            }
            SudoMsg::UpdateStateOnMisbehaviour(msg) => {
                sudo::misbehaviour(&self.registry, storage, client_id, msg)
            }
            SudoMsg::SubstituteClient(msg) => {
                sudo::substitute_client(&self.registry, storage, client_id, msg)
            }
            SudoMsg::UpgradeClient(msg) => {
                sudo::upgrade_client(&self.registry, storage, client_id, msg)
            }
        }
    }

    /// The query entry point.
    /// It routes the message to the appropriate handler.
    /// # Errors
    /// Will return an error if the handler returns an error.
    pub fn query(
        &self,
        storage: &dyn Storage,
        client_id: &str,
        msg: QueryMsg,
    ) -> Result<Vec<u8>, HostError> {
        match msg {
            QueryMsg::Status => query::status(storage, client_id),
            QueryMsg::LatestHeight => query::latest_height(storage, client_id),
            QueryMsg::TimestampAtHeight(msg) => {
                query::timestamp_at_height(storage, client_id, msg)
            }
            QueryMsg::ExportMetadata => query::export_metadata(storage, client_id),
            QueryMsg::VerifyClientMessage(msg) => {
                query::verify_client_message(&self.registry, storage, client_id, msg)
            }
            QueryMsg::CheckForMisbehaviour(msg) => {
                query::check_for_misbehaviour(&self.registry, storage, client_id, msg)
            }
        }
    }
}
