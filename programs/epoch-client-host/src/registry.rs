//! Maps each client type to the collaborators the client logic needs for it

use std::collections::BTreeMap;

use epoch_light_client::{
    decoder::BeaconHeaderDecoder, identifier::ClientIdValidator, quorum::CommitSignatureVerifier,
    types::client_type::ClientType,
};

use crate::{config::HostConfig, HostError};

/// A commit signature verifier usable behind a trait object
pub type DynSignatureVerifier = dyn CommitSignatureVerifier<Error = String>;

/// The capabilities registered for one client type
pub struct ClientModule {
    /// The client type
    pub client_type: ClientType,
    /// Decoder of the client type's beacon headers
    pub decoder: Box<dyn BeaconHeaderDecoder>,
    /// Verifier of the client type's commit signatures
    pub verifier: Box<DynSignatureVerifier>,
    /// The maximum number of epoch headers accepted in a single header
    pub max_epoch_headers: u64,
}

impl std::fmt::Debug for ClientModule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientModule")
            .field("client_type", &self.client_type)
            .field("max_epoch_headers", &self.max_epoch_headers)
            .finish_non_exhaustive()
    }
}

/// The client types the host serves
pub struct ClientRegistry {
    modules: BTreeMap<ClientType, ClientModule>,
    id_validator: Box<dyn ClientIdValidator>,
}

impl std::fmt::Debug for ClientRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientRegistry")
            .field("modules", &self.modules)
            .finish_non_exhaustive()
    }
}

impl ClientRegistry {
    /// Builds the registry from the enabled client types of `config`
    ///
    /// `capabilities` supplies the decoder and verifier of each enabled client type.
    ///
    /// # Errors
    /// Returns an error if the configuration is invalid
    pub fn from_config<F>(
        config: &HostConfig,
        id_validator: Box<dyn ClientIdValidator>,
        mut capabilities: F,
    ) -> Result<Self, HostError>
    where
        F: FnMut(ClientType) -> (Box<dyn BeaconHeaderDecoder>, Box<DynSignatureVerifier>),
    {
        config.validate()?;

        let modules = config
            .enabled_clients()
            .map(|client| {
                let (decoder, verifier) = capabilities(client.client_type);
                let module = ClientModule {
                    client_type: client.client_type,
                    decoder,
                    verifier,
                    max_epoch_headers: client.max_epoch_headers,
                };
                (client.client_type, module)
            })
            .collect();

        Ok(Self {
            modules,
            id_validator,
        })
    }

    /// The module registered for `client_type`
    ///
    /// # Errors
    /// Returns [`HostError::UnknownClientType`] if the client type is not enabled
    pub fn get(&self, client_type: ClientType) -> Result<&ClientModule, HostError> {
        self.modules
            .get(&client_type)
            .ok_or_else(|| HostError::UnknownClientType(client_type.to_string()))
    }

    /// The client identifier grammar of the host
    #[must_use]
    pub fn id_validator(&self) -> &dyn ClientIdValidator {
        self.id_validator.as_ref()
    }

    /// The registered client types
    pub fn client_types(&self) -> impl Iterator<Item = ClientType> + '_ {
        self.modules.keys().copied()
    }
}
