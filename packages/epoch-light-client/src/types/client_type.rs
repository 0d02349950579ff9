//! This module defines [`ClientType`], the tag selecting a supported client variant.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Client type of the Harmony light client
pub const HARMONY_CLIENT_TYPE: &str = "harmony";
/// Client type of the MAP Protocol light client
pub const MAPO_CLIENT_TYPE: &str = "mapo";

/// The misbehaviour evidence type reported to the host
pub const CLIENT_MISBEHAVIOUR_TYPE: &str = "client_misbehaviour";

/// The supported client variants
///
/// Both variants share the same state shapes. They differ in how strictly a header is
/// validated and in the beacon header decoder and signature verifier the host registers.
#[derive(Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Clone, Copy, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    /// Harmony beacon chain client
    Harmony,
    /// MAP Protocol relay chain client
    Mapo,
}

impl ClientType {
    /// All supported client types
    pub const ALL: [Self; 2] = [Self::Harmony, Self::Mapo];

    /// Returns the string identifier of the client type
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Harmony => HARMONY_CLIENT_TYPE,
            Self::Mapo => MAPO_CLIENT_TYPE,
        }
    }

    /// Whether headers of this client type must carry the encoded beacon header
    #[must_use]
    pub const fn requires_beacon_header(self) -> bool {
        matches!(self, Self::Harmony)
    }

    /// The type URL of this client type's client state
    #[must_use]
    pub const fn client_state_type_url(self) -> &'static str {
        match self {
            Self::Harmony => "/ibc.lightclients.harmony.v1.ClientState",
            Self::Mapo => "/ibc.lightclients.mapo.v1.ClientState",
        }
    }

    /// The type URL of this client type's consensus state
    #[must_use]
    pub const fn consensus_state_type_url(self) -> &'static str {
        match self {
            Self::Harmony => "/ibc.lightclients.harmony.v1.ConsensusState",
            Self::Mapo => "/ibc.lightclients.mapo.v1.ConsensusState",
        }
    }

    /// The type URL of this client type's header
    #[must_use]
    pub const fn header_type_url(self) -> &'static str {
        match self {
            Self::Harmony => "/ibc.lightclients.harmony.v1.Header",
            Self::Mapo => "/ibc.lightclients.mapo.v1.Header",
        }
    }

    /// The type URL of this client type's misbehaviour
    #[must_use]
    pub const fn misbehaviour_type_url(self) -> &'static str {
        match self {
            Self::Harmony => "/ibc.lightclients.harmony.v1.Misbehaviour",
            Self::Mapo => "/ibc.lightclients.mapo.v1.Misbehaviour",
        }
    }

    /// Finds the client type whose client state has the given type URL
    #[must_use]
    pub fn from_client_state_type_url(type_url: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|client_type| client_type.client_state_type_url() == type_url)
    }
}

impl std::fmt::Display for ClientType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|client_type| client_type.as_str() == s)
            .ok_or_else(|| format!("unknown client type: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_its_own_identifier() {
        for client_type in ClientType::ALL {
            assert_eq!(client_type.as_str().parse::<ClientType>(), Ok(client_type));
        }
        assert!("07-tendermint".parse::<ClientType>().is_err());
    }

    #[test]
    fn resolves_client_state_type_url() {
        assert_eq!(
            ClientType::from_client_state_type_url("/ibc.lightclients.mapo.v1.ClientState"),
            Some(ClientType::Mapo)
        );
        assert_eq!(
            ClientType::from_client_state_type_url("/ibc.lightclients.mapo.v1.Header"),
            None
        );
    }

    #[test]
    fn only_harmony_requires_beacon_header() {
        assert!(ClientType::Harmony.requires_beacon_header());
        assert!(!ClientType::Mapo.requires_beacon_header());
    }
}
