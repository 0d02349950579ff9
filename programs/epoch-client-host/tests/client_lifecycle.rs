//! Drives clients through the host entry points

mod helpers;

use cosmwasm_std::testing::MockStorage;
use epoch_client_host::{
    msg::{
        CheckForMisbehaviourMsg, CheckForMisbehaviourResult, ExportMetadataResult,
        LatestHeightResult, QueryMsg, StatusResult, SubstituteClientMsg, SudoMsg,
        TimestampAtHeightMsg, TimestampAtHeightResult, UpdateStateResult,
        VerifyClientMessageMsg, VerifyUpgradeAndUpdateStateMsg,
    },
    state::encode_any,
    HostError,
};
use epoch_light_client::{
    client_state::Status,
    error::{EpochClientError, MisbehaviourHeader},
    misbehaviour::Misbehaviour,
    test_utils::{
        beacon_header, client_state, committee, committee_with_seed, consensus_state,
        epoch_header, header, misbehaviour, EPOCH_SIZE, TRUSTED_TIME,
    },
    types::{client_type::ClientType, height::Height},
};

use helpers::{
    host, host_with_config, initialize_msg, initialized_store, misbehaviour_msg, query,
    snapshot, update_msg, CLIENT_ID, EPOCH,
};

fn status(host: &epoch_client_host::ClientHost, store: &MockStorage) -> Status {
    query::<StatusResult>(host, store, QueryMsg::Status)
        .unwrap()
        .status
}

fn latest_height(host: &epoch_client_host::ClientHost, store: &MockStorage) -> Height {
    query::<LatestHeightResult>(host, store, QueryMsg::LatestHeight)
        .unwrap()
        .height
}

mod initialize {
    use super::*;

    #[test]
    fn creates_active_client() {
        let host = host();
        let store = initialized_store(&host, ClientType::Harmony, &committee(&[1, 1, 1]));

        assert_eq!(status(&host, &store), Status::Active);
        assert_eq!(latest_height(&host, &store), Height::new(0, 100));

        let timestamp: TimestampAtHeightResult = query(
            &host,
            &store,
            QueryMsg::TimestampAtHeight(TimestampAtHeightMsg {
                height: Height::new(0, 100),
            }),
        )
        .unwrap();
        assert_eq!(timestamp.timestamp, TRUSTED_TIME * 1_000_000_000);

        let metadata: ExportMetadataResult =
            query(&host, &store, QueryMsg::ExportMetadata).unwrap();
        assert!(metadata.genesis_metadata.is_empty());
    }

    #[test]
    fn rejects_consensus_state_of_wrong_type() {
        let host = host();
        let mut store = MockStorage::new();
        let msg = SudoMsg::Initialize(epoch_client_host::msg::InitializeMsg {
            client_state: encode_any(ClientType::Mapo.client_state_type_url(), &client_state())
                .unwrap(),
            consensus_state: encode_any(
                ClientType::Mapo.header_type_url(),
                &consensus_state(EPOCH, committee(&[1])),
            )
            .unwrap(),
        });

        let res = host.sudo(&mut store, CLIENT_ID, msg);
        assert!(matches!(res, Err(HostError::TypeMismatch { .. })));
        assert!(snapshot(&store).is_empty());
    }

    #[test]
    fn rejects_unknown_client_type() {
        let host = host();
        let mut store = MockStorage::new();
        let msg = SudoMsg::Initialize(epoch_client_host::msg::InitializeMsg {
            client_state: encode_any("/ibc.lightclients.tendermint.v1.ClientState", &client_state())
                .unwrap(),
            consensus_state: encode_any(
                ClientType::Mapo.consensus_state_type_url(),
                &consensus_state(EPOCH, committee(&[1])),
            )
            .unwrap(),
        });

        let res = host.sudo(&mut store, CLIENT_ID, msg);
        assert!(matches!(res, Err(HostError::UnknownClientType(_))));
    }

    #[test]
    fn rejects_disabled_client_type() {
        let host = host_with_config(
            r#"{"clients": [{"client_type": "harmony"}, {"client_type": "mapo", "enabled": false}]}"#,
        );
        let mut store = MockStorage::new();

        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            initialize_msg(
                ClientType::Mapo,
                &client_state(),
                &consensus_state(EPOCH, committee(&[1])),
            ),
        );
        assert!(matches!(res, Err(HostError::UnknownClientType(_))));
        assert!(snapshot(&store).is_empty());
    }

    #[test]
    fn rejects_consensus_state_of_other_epoch() {
        let host = host();
        let mut store = MockStorage::new();

        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            initialize_msg(
                ClientType::Harmony,
                &client_state(),
                &consensus_state(EPOCH + 1, committee(&[1])),
            ),
        );
        assert!(matches!(
            res,
            Err(HostError::InitializeFailed(
                EpochClientError::InvalidConsensusState { .. }
            ))
        ));
        assert!(snapshot(&store).is_empty());
    }

    #[test]
    fn rejects_existing_client() {
        let host = host();
        let committee = committee(&[1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            initialize_msg(
                ClientType::Harmony,
                &client_state(),
                &consensus_state(EPOCH, committee),
            ),
        );
        assert!(matches!(res, Err(HostError::ClientAlreadyExists(_))));
    }
}

mod update_state {
    use super::*;

    #[test]
    fn advances_latest_height() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let target = header(&committee, &beacon_header(110, EPOCH, 1_100));
        let bytes = host
            .sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &target))
            .unwrap();
        let result: UpdateStateResult = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(result.heights, vec![Height::new(0, 110)]);
        assert_eq!(latest_height(&host, &store), Height::new(0, 110));

        let timestamp: TimestampAtHeightResult = query(
            &host,
            &store,
            QueryMsg::TimestampAtHeight(TimestampAtHeightMsg {
                height: Height::new(0, 110),
            }),
        )
        .unwrap();
        assert_eq!(timestamp.timestamp, 1_100_000_000_000);
    }

    #[test]
    fn rotates_committee_with_epoch_headers() {
        let host = host();
        let committee_5 = committee(&[1, 1, 1]);
        let committee_6 = committee_with_seed(6, &[3, 3, 3]);
        let committee_7 = committee_with_seed(7, &[1, 2, 3]);
        let mut store = initialized_store(&host, ClientType::Mapo, &committee_5);

        let mut target = header(
            &committee_7,
            &beacon_header(7 * EPOCH_SIZE + 1, 7, 1_400),
        );
        target.epoch_headers = vec![
            epoch_header(&committee_5, 5, &committee_6),
            epoch_header(&committee_6, 6, &committee_7),
        ];
        host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Mapo, &target))
            .unwrap();
        assert_eq!(latest_height(&host, &store), Height::new(0, 7 * EPOCH_SIZE + 1));

        // the rotated committee is now trusted
        let next = header(
            &committee_7,
            &beacon_header(7 * EPOCH_SIZE + 2, 7, 1_401),
        );
        host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Mapo, &next))
            .unwrap();
        assert_eq!(latest_height(&host, &store), Height::new(0, 7 * EPOCH_SIZE + 2));

        let stale = header(
            &committee_5,
            &beacon_header(7 * EPOCH_SIZE + 3, 7, 1_402),
        );
        let res = host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Mapo, &stale));
        assert!(matches!(
            res,
            Err(HostError::VerifyClientMessageFailed(
                EpochClientError::CommitSignatureVerification(_)
            ))
        ));
    }

    #[test]
    fn rejects_wrong_epoch_header_count() {
        let host = host();
        let committee_5 = committee(&[1, 1, 1]);
        let committee_6 = committee_with_seed(6, &[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee_5);
        let before = snapshot(&store);

        let mut target = header(
            &committee_6,
            &beacon_header(7 * EPOCH_SIZE, 7, 1_400),
        );
        target.epoch_headers = vec![epoch_header(&committee_5, 5, &committee_6)];

        let res = host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &target));
        assert!(matches!(
            res,
            Err(HostError::VerifyClientMessageFailed(
                EpochClientError::InvalidEpochHeaders { .. }
            ))
        ));
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn rejects_conflicting_update_at_stored_height() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let target = header(&committee, &beacon_header(110, EPOCH, 1_100));
        host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &target))
            .unwrap();
        let before = snapshot(&store);

        // resubmitting the same header is accepted and changes nothing
        host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &target))
            .unwrap();
        assert_eq!(snapshot(&store), before);

        let mut conflicting = header(&committee, &beacon_header(110, EPOCH, 1_200));
        conflicting.commitment_root = vec![0x33; 32].into();
        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            update_msg(ClientType::Harmony, &conflicting),
        );
        assert!(matches!(
            res,
            Err(HostError::VerifyClientMessageFailed(
                EpochClientError::ConflictingConsensusState { height }
            )) if height == Height::new(0, 110)
        ));
        assert_eq!(snapshot(&store), before);

        let timestamp: TimestampAtHeightResult = query(
            &host,
            &store,
            QueryMsg::TimestampAtHeight(TimestampAtHeightMsg {
                height: Height::new(0, 110),
            }),
        )
        .unwrap();
        assert_eq!(timestamp.timestamp, 1_100_000_000_000);
    }

    #[test]
    fn rejects_update_older_than_previous_consensus_state() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);
        let before = snapshot(&store);

        let target = header(&committee, &beacon_header(110, EPOCH, 500));
        let res = host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &target));
        assert!(matches!(
            res,
            Err(HostError::VerifyClientMessageFailed(
                EpochClientError::NonMonotonicTimestamp { .. }
            ))
        ));
        assert_eq!(snapshot(&store), before);
    }

    #[test]
    fn rejects_update_newer_than_next_consensus_state() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let later = header(&committee, &beacon_header(110, EPOCH, 1_100));
        host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &later))
            .unwrap();

        // fills the gap below the latest height
        let between = header(&committee, &beacon_header(105, EPOCH, 1_050));
        host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &between))
            .unwrap();
        assert_eq!(latest_height(&host, &store), Height::new(0, 110));

        let out_of_order = header(&committee, &beacon_header(107, EPOCH, 1_200));
        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            update_msg(ClientType::Harmony, &out_of_order),
        );
        assert!(matches!(
            res,
            Err(HostError::VerifyClientMessageFailed(
                EpochClientError::NonMonotonicTimestamp { .. }
            ))
        ));
    }

    #[test]
    fn rejects_header_of_other_client_type() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let target = header(&committee, &beacon_header(110, EPOCH, 1_100));
        let res = host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Mapo, &target));
        assert!(matches!(res, Err(HostError::TypeMismatch { .. })));
    }

    #[test]
    fn substitute_and_upgrade_are_unsupported() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            SudoMsg::SubstituteClient(SubstituteClientMsg {
                substitute_client_id: CLIENT_ID.to_string(),
            }),
        );
        assert!(matches!(
            res,
            Err(HostError::RecoveryFailed(
                EpochClientError::UnsupportedOperation(_)
            ))
        ));

        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            SudoMsg::UpgradeClient(VerifyUpgradeAndUpdateStateMsg {
                upgrade_client_state: encode_any(
                    ClientType::Harmony.client_state_type_url(),
                    &client_state(),
                )
                .unwrap(),
                upgrade_consensus_state: encode_any(
                    ClientType::Harmony.consensus_state_type_url(),
                    &consensus_state(EPOCH, committee),
                )
                .unwrap(),
                proof_upgrade_client: b"proof".to_vec(),
                proof_upgrade_consensus_state: b"proof".to_vec(),
            }),
        );
        assert!(matches!(
            res,
            Err(HostError::RecoveryFailed(
                EpochClientError::UnsupportedOperation(_)
            ))
        ));
    }
}

mod misbehaviour {
    use super::*;

    #[test]
    fn freezes_client() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let target = header(&committee, &beacon_header(110, EPOCH, 1_100));
        host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &target))
            .unwrap();

        let evidence = misbehaviour(&committee, 105, EPOCH);
        host.sudo(
            &mut store,
            CLIENT_ID,
            misbehaviour_msg(ClientType::Harmony, &evidence),
        )
        .unwrap();
        assert_eq!(status(&host, &store), Status::Frozen);

        let next = header(&committee, &beacon_header(111, EPOCH, 1_110));
        let res = host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &next));
        assert!(matches!(res, Err(HostError::ClientFrozen(_))));

        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            misbehaviour_msg(ClientType::Harmony, &evidence),
        );
        assert!(matches!(res, Err(HostError::ClientFrozen(_))));
    }

    #[test]
    fn failed_misbehaviour_leaves_store_untouched() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Mapo, &committee);
        let before = snapshot(&store);

        let forged = misbehaviour(&committee_with_seed(9, &[1, 1, 1]), 105, EPOCH);
        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            misbehaviour_msg(ClientType::Mapo, &forged),
        );
        assert!(matches!(res, Err(HostError::MisbehaviourFailed(_))));

        let mut swapped = misbehaviour(&committee, 105, EPOCH);
        std::mem::swap(&mut swapped.header_1, &mut swapped.header_2);
        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            misbehaviour_msg(ClientType::Mapo, &swapped),
        );
        assert!(matches!(
            res,
            Err(HostError::MisbehaviourFailed(
                EpochClientError::TimestampOrdering { .. }
            ))
        ));

        assert_eq!(snapshot(&store), before);
        assert_eq!(status(&host, &store), Status::Active);
    }

    #[test]
    fn rejects_misbehaviour_for_other_client() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let evidence = Misbehaviour {
            client_id: "harmony-1".to_string(),
            ..misbehaviour(&committee, 105, EPOCH)
        };
        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            misbehaviour_msg(ClientType::Harmony, &evidence),
        );
        assert!(matches!(res, Err(HostError::ClientIdMismatch { .. })));
    }

    #[test]
    fn rejects_evidence_without_trusted_committee() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let evidence = misbehaviour(&committee, 95, 4);
        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            misbehaviour_msg(ClientType::Harmony, &evidence),
        );
        assert!(matches!(
            res,
            Err(HostError::MisbehaviourFailed(
                EpochClientError::MissingCommittee { .. }
            ))
        ));

        let incomplete = Misbehaviour {
            header_2: None,
            ..misbehaviour(&committee, 95, 4)
        };
        let res = host.sudo(
            &mut store,
            CLIENT_ID,
            misbehaviour_msg(ClientType::Harmony, &incomplete),
        );
        assert!(matches!(
            res,
            Err(HostError::MisbehaviourFailed(EpochClientError::MissingHeader(
                MisbehaviourHeader::Header2
            )))
        ));
    }
}

mod queries {
    use super::*;

    fn check_for_misbehaviour(
        host: &epoch_client_host::ClientHost,
        store: &MockStorage,
        client_message: Vec<u8>,
    ) -> bool {
        query::<CheckForMisbehaviourResult>(
            host,
            store,
            QueryMsg::CheckForMisbehaviour(CheckForMisbehaviourMsg { client_message }),
        )
        .unwrap()
        .found_misbehaviour
    }

    #[test]
    fn verify_client_message_does_not_store() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let store = initialized_store(&host, ClientType::Harmony, &committee);
        let before = snapshot(&store);

        let target = header(&committee, &beacon_header(110, EPOCH, 1_100));
        host.query(
            &store,
            CLIENT_ID,
            QueryMsg::VerifyClientMessage(VerifyClientMessageMsg {
                client_message: encode_any(ClientType::Harmony.header_type_url(), &target)
                    .unwrap(),
            }),
        )
        .unwrap();
        assert_eq!(snapshot(&store), before);

        let res = host.query(
            &store,
            CLIENT_ID,
            QueryMsg::VerifyClientMessage(VerifyClientMessageMsg {
                client_message: encode_any(ClientType::Harmony.client_state_type_url(), &target)
                    .unwrap(),
            }),
        );
        assert!(matches!(res, Err(HostError::TypeMismatch { .. })));
    }

    #[test]
    fn detects_misbehaviour() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let store = initialized_store(&host, ClientType::Harmony, &committee);

        let evidence = misbehaviour(&committee, 105, EPOCH);
        let forged = misbehaviour(&committee_with_seed(9, &[1, 1, 1]), 105, EPOCH);
        let url = ClientType::Harmony.misbehaviour_type_url();

        assert!(check_for_misbehaviour(
            &host,
            &store,
            encode_any(url, &evidence).unwrap()
        ));
        assert!(!check_for_misbehaviour(
            &host,
            &store,
            encode_any(url, &forged).unwrap()
        ));
        assert_eq!(status(&host, &store), Status::Active);
    }

    #[test]
    fn detects_conflicting_header() {
        let host = host();
        let committee = committee(&[1, 1, 1]);
        let mut store = initialized_store(&host, ClientType::Harmony, &committee);

        let target = header(&committee, &beacon_header(110, EPOCH, 1_100));
        host.sudo(&mut store, CLIENT_ID, update_msg(ClientType::Harmony, &target))
            .unwrap();

        let url = ClientType::Harmony.header_type_url();
        assert!(!check_for_misbehaviour(
            &host,
            &store,
            encode_any(url, &target).unwrap()
        ));

        let mut conflicting = target;
        conflicting.commitment_root = vec![0x33; 32].into();
        assert!(check_for_misbehaviour(
            &host,
            &store,
            encode_any(url, &conflicting).unwrap()
        ));

        let unknown_height = header(&committee, &beacon_header(115, EPOCH, 1_150));
        assert!(!check_for_misbehaviour(
            &host,
            &store,
            encode_any(url, &unknown_height).unwrap()
        ));

        let time_travel = header(&committee, &beacon_header(115, EPOCH, 1_000));
        assert!(check_for_misbehaviour(
            &host,
            &store,
            encode_any(url, &time_travel).unwrap()
        ));

        let forged = header(
            &committee_with_seed(9, &[1, 1, 1]),
            &beacon_header(115, EPOCH, 1_000),
        );
        assert!(!check_for_misbehaviour(
            &host,
            &store,
            encode_any(url, &forged).unwrap()
        ));
    }

    #[test]
    fn fails_for_unknown_client() {
        let host = host();
        let store = MockStorage::new();

        let res = host.query(&store, CLIENT_ID, QueryMsg::Status);
        assert!(matches!(res, Err(HostError::ClientStateNotFound(_))));
    }
}
