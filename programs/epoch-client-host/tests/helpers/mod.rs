//! Test helpers for the epoch client host tests
#![allow(dead_code)]

use cosmwasm_std::{testing::MockStorage, Order, Record, Storage};
use epoch_client_host::{
    config::HostConfig,
    msg::{
        InitializeMsg, QueryMsg, SudoMsg, UpdateStateMsg, UpdateStateOnMisbehaviourMsg,
    },
    registry::DynSignatureVerifier,
    state::encode_any,
    ClientHost, HostError,
};
use epoch_light_client::{
    client_state::ClientState,
    consensus_state::ConsensusState,
    decoder::BeaconHeaderDecoder,
    header::Header,
    identifier::Ics24ClientIdValidator,
    misbehaviour::Misbehaviour,
    test_utils::{client_state, consensus_state, TestBeaconHeaderDecoder, TestSignatureVerifier},
    types::{client_type::ClientType, validator_set::ValidatorSet},
};
use serde::de::DeserializeOwned;

pub use epoch_light_client::test_utils::{CLIENT_ID, EPOCH};

pub const HOST_CONFIG: &str = r#"{
    "clients": [
        { "client_type": "harmony", "max_epoch_headers": 4 },
        { "client_type": "mapo", "max_epoch_headers": 4 }
    ]
}"#;

#[must_use]
pub fn host_with_config(json: &str) -> ClientHost {
    let config = HostConfig::from_json(json).unwrap();
    ClientHost::new(
        &config,
        Box::new(Ics24ClientIdValidator),
        |_| -> (Box<dyn BeaconHeaderDecoder>, Box<DynSignatureVerifier>) {
            (
                Box::new(TestBeaconHeaderDecoder),
                Box::new(TestSignatureVerifier),
            )
        },
    )
    .unwrap()
}

#[must_use]
pub fn host() -> ClientHost {
    host_with_config(HOST_CONFIG)
}

#[must_use]
pub fn initialize_msg(
    client_type: ClientType,
    client_state: &ClientState,
    consensus_state: &ConsensusState,
) -> SudoMsg {
    SudoMsg::Initialize(InitializeMsg {
        client_state: encode_any(client_type.client_state_type_url(), client_state).unwrap(),
        consensus_state: encode_any(client_type.consensus_state_type_url(), consensus_state)
            .unwrap(),
    })
}

#[must_use]
pub fn update_msg(client_type: ClientType, header: &Header) -> SudoMsg {
    SudoMsg::UpdateState(UpdateStateMsg {
        client_message: encode_any(client_type.header_type_url(), header).unwrap(),
    })
}

#[must_use]
pub fn misbehaviour_msg(client_type: ClientType, misbehaviour: &Misbehaviour) -> SudoMsg {
    SudoMsg::UpdateStateOnMisbehaviour(UpdateStateOnMisbehaviourMsg {
        client_message: encode_any(client_type.misbehaviour_type_url(), misbehaviour).unwrap(),
    })
}

/// A store holding a client of `client_type` trusting `committee` at epoch [`EPOCH`]
#[must_use]
pub fn initialized_store(
    host: &ClientHost,
    client_type: ClientType,
    committee: &ValidatorSet,
) -> MockStorage {
    let mut store = MockStorage::new();
    host.sudo(
        &mut store,
        CLIENT_ID,
        initialize_msg(
            client_type,
            &client_state(),
            &consensus_state(EPOCH, committee.clone()),
        ),
    )
    .unwrap();
    store
}

pub fn query<T: DeserializeOwned>(
    host: &ClientHost,
    store: &MockStorage,
    msg: QueryMsg,
) -> Result<T, HostError> {
    let bytes = host.query(store, CLIENT_ID, msg)?;
    Ok(serde_json::from_slice(&bytes).unwrap())
}

/// Every entry of the store in key order
#[must_use]
pub fn snapshot(store: &MockStorage) -> Vec<Record> {
    store.range(None, None, Order::Ascending).collect()
}
