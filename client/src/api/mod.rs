//! One trait per method group, all implemented by [`Client`](crate::Client).

pub use self::blob::BlobApi;
pub use self::das::DasApi;
pub use self::fraud::FraudApi;
pub use self::header::HeaderApi;
pub use self::node::NodeApi;
pub use self::p2p::P2pApi;
pub use self::share::ShareApi;
pub use self::state::StateApi;

mod blob;
mod das;
mod fraud;
mod header;
mod node;
mod p2p;
mod share;
mod state;

#[cfg(test)]
pub(crate) fn test_header(height: u64) -> openrpc_types::header::ExtendedHeader {
    let hash = |height: u64| format!("{height:064X}");

    let value = serde_json::json!({
        "header": {
            "version": {"block": "11", "app": "1"},
            "chain_id": "private",
            "height": height.to_string(),
            "time": "2024-01-01T00:00:00Z",
            "last_block_id": {
                "hash": hash(height.saturating_sub(1)),
                "parts": {"total": 1, "hash": "AA"}
            }
        },
        "commit": {
            "height": height.to_string(),
            "round": 0,
            "block_id": {"hash": hash(height), "parts": {"total": 1, "hash": "BB"}},
            "signatures": []
        },
        "validator_set": {"validators": [], "proposer": null},
        "dah": {"row_roots": ["AQ=="], "column_roots": ["Ag=="]}
    });

    match serde_json::from_value(value) {
        Ok(header) => header,
        Err(e) => panic!("invalid test header: {e}"),
    }
}

#[cfg(test)]
mod tests {
    use futures_util::future::BoxFuture;
    use openrpc_types::blob::{Blob, BlobProof, Commitment};
    use openrpc_types::fraud::ProofType;
    use openrpc_types::header::Hash;
    use openrpc_types::node::Permission;
    use openrpc_types::p2p::{AddrInfo, PeerId, ProtocolId};
    use openrpc_types::share::Namespace;
    use openrpc_types::state::{AccAddress, Address, Amount, Tx, ValAddress};

    use super::*;
    use crate::client::Client;
    use crate::context::Context;
    use crate::error::{ClientError, ClientResult};
    use crate::method::{Method, MethodKind};
    use crate::options::SubmitOptions;
    use crate::transport::MockTransport;

    type SlotCall<'a> = BoxFuture<'a, ClientResult<()>>;

    fn ok<T>(res: ClientResult<T>) -> ClientResult<()> {
        res.map(drop)
    }

    /// Invokes the slot behind `method` through its group trait.
    fn call_slot<'a>(client: &'a Client, ctx: &'a Context, method: Method) -> SlotCall<'a> {
        Box::pin(async move {
            let header = test_header(5);
            let ns = Namespace::new_v0(&[1]).unwrap();
            let commitment = Commitment::new(vec![1; 32]);
            let peer: PeerId = "12D3KooWL8z3KARAYJcmExhDsGwKbjChKeGaJpFPENyADdxmEHzw"
                .parse()
                .unwrap();
            let acc: AccAddress = "celestia1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5wgawu3"
                .parse()
                .unwrap();
            let val: ValAddress = "celestiavaloper1qypqxpq9qcrsszg2pvxq6rs0zqg3yyc5thlh2h"
                .parse()
                .unwrap();
            let address = Address::from(acc.clone());
            let blobs = [Blob::new(ns, vec![1, 2, 3])];
            let proof = BlobProof::default();
            let info = AddrInfo {
                id: peer.clone(),
                addrs: Vec::new(),
            };

            match method {
                Method::FraudSubscribe => {
                    ok(client.fraud_subscribe(ctx, &ProofType::bad_encoding()).await)
                }
                Method::FraudGet => ok(client.fraud_get(ctx, &ProofType::bad_encoding()).await),
                Method::DasSamplingStats => ok(client.das_sampling_stats(ctx).await),
                Method::DasWaitCatchUp => client.das_wait_catch_up(ctx).await,
                Method::BlobSubmit => {
                    ok(client.blob_submit(ctx, &blobs, &SubmitOptions::default()).await)
                }
                Method::BlobGet => ok(client.blob_get(ctx, 1, &ns, &commitment).await),
                Method::BlobGetAll => ok(client.blob_get_all(ctx, 1, &[ns]).await),
                Method::BlobGetProof => ok(client.blob_get_proof(ctx, 1, &ns, &commitment).await),
                Method::BlobIncluded => {
                    ok(client.blob_included(ctx, 1, &ns, &proof, &commitment).await)
                }
                Method::HeaderLocalHead => ok(client.header_local_head(ctx).await),
                Method::HeaderGetByHash => {
                    ok(client.header_get_by_hash(ctx, &Hash::new(vec![1; 32])).await)
                }
                Method::HeaderGetVerifiedRangeByHeight => {
                    ok(client.header_get_verified_range_by_height(ctx, &header, 7).await)
                }
                Method::HeaderGetByHeight => ok(client.header_get_by_height(ctx, 5).await),
                Method::HeaderSyncState => ok(client.header_sync_state(ctx).await),
                Method::HeaderSyncWait => client.header_sync_wait(ctx).await,
                Method::HeaderNetworkHead => ok(client.header_network_head(ctx).await),
                Method::HeaderSubscribe => ok(client.header_subscribe(ctx).await),
                Method::StateAccountAddress => ok(client.state_account_address(ctx).await),
                // Infallible, checked separately.
                Method::StateIsStopped => {
                    client.state_is_stopped(ctx).await;
                    Err(ClientError::Cancelled)
                }
                Method::StateBalance => ok(client.state_balance(ctx).await),
                Method::StateBalanceForAddress => {
                    ok(client.state_balance_for_address(ctx, &address).await)
                }
                Method::StateTransfer => {
                    ok(client.state_transfer(ctx, &acc, Amount(1), Amount(1), 1).await)
                }
                Method::StateSubmitTx => ok(client.state_submit_tx(ctx, &Tx(vec![1])).await),
                Method::StateSubmitPayForBlob => {
                    ok(client.state_submit_pay_for_blob(ctx, Amount(1), 1, &blobs).await)
                }
                Method::StateCancelUnbondingDelegation => {
                    let (amount, height) = (Amount(1), Amount(2));
                    ok(client
                        .state_cancel_unbonding_delegation(ctx, &val, amount, height, amount, 1)
                        .await)
                }
                Method::StateBeginRedelegate => ok(client
                    .state_begin_redelegate(ctx, &val, &val, Amount(1), Amount(1), 1)
                    .await),
                Method::StateUndelegate => {
                    ok(client.state_undelegate(ctx, &val, Amount(1), Amount(1), 1).await)
                }
                Method::StateDelegate => {
                    ok(client.state_delegate(ctx, &val, Amount(1), Amount(1), 1).await)
                }
                Method::StateQueryDelegation => ok(client.state_query_delegation(ctx, &val).await),
                Method::StateQueryUnbonding => ok(client.state_query_unbonding(ctx, &val).await),
                Method::StateQueryRedelegations => {
                    ok(client.state_query_redelegations(ctx, &val, &val).await)
                }
                Method::ShareSharesAvailable => client.share_shares_available(ctx, &header).await,
                Method::ShareGetShare => ok(client.share_get_share(ctx, &header, 0, 0).await),
                Method::ShareGetEds => ok(client.share_get_eds(ctx, &header).await),
                Method::ShareGetSharesByNamespace => {
                    ok(client.share_get_shares_by_namespace(ctx, &header, &ns).await)
                }
                Method::P2pPeers => ok(client.p2p_peers(ctx).await),
                Method::P2pPeerInfo => ok(client.p2p_peer_info(ctx, &peer).await),
                Method::P2pConnect => client.p2p_connect(ctx, &info).await,
                Method::P2pClosePeer => client.p2p_close_peer(ctx, &peer).await,
                Method::P2pConnectedness => ok(client.p2p_connectedness(ctx, &peer).await),
                Method::P2pNatStatus => ok(client.p2p_nat_status(ctx).await),
                Method::P2pBlockPeer => client.p2p_block_peer(ctx, &peer).await,
                Method::P2pUnblockPeer => client.p2p_unblock_peer(ctx, &peer).await,
                Method::P2pListBlockedPeers => ok(client.p2p_list_blocked_peers(ctx).await),
                Method::P2pProtect => client.p2p_protect(ctx, &peer, "tag").await,
                Method::P2pUnprotect => ok(client.p2p_unprotect(ctx, &peer, "tag").await),
                Method::P2pIsProtected => ok(client.p2p_is_protected(ctx, &peer, "tag").await),
                Method::P2pBandwidthStats => ok(client.p2p_bandwidth_stats(ctx).await),
                Method::P2pBandwidthForPeer => ok(client.p2p_bandwidth_for_peer(ctx, &peer).await),
                Method::P2pBandwidthForProtocol => ok(client
                    .p2p_bandwidth_for_protocol(ctx, &ProtocolId("/celestia/shrex".to_owned()))
                    .await),
                Method::P2pResourceState => ok(client.p2p_resource_state(ctx).await),
                Method::P2pPubSubPeers => ok(client.p2p_pub_sub_peers(ctx, "/eds-sub/0.0.1").await),
                Method::NodeInfo => ok(client.node_info(ctx).await),
                Method::NodeLogLevelSet => client.node_log_level_set(ctx, "*", "info").await,
                Method::NodeAuthVerify => ok(client.node_auth_verify(ctx, "token").await),
                Method::NodeAuthNew => ok(client.node_auth_new(ctx, &[Permission::Read]).await),
            }
        })
    }

    /// A node which never answers.
    fn silent_node() -> MockTransport {
        let mock = MockTransport::new();
        for method in Method::ALL {
            if !method.is_subscription() {
                mock.hang(*method);
            }
        }
        mock
    }

    #[tokio::test]
    async fn every_slot_hits_the_wire_once() {
        let mock = MockTransport::new();
        for method in Method::ALL {
            match method.kind() {
                MethodKind::Call | MethodKind::Wait => {
                    mock.hang(*method);
                }
                MethodKind::Subscription => {
                    mock.subscription(*method);
                }
            }
        }
        let client = Client::new(mock.clone(), Permission::Admin);
        let ctx = Context::background();

        for method in Method::ALL {
            // Calls hang, so bound them with a short deadline.
            let ctx = ctx.with_timeout(std::time::Duration::from_millis(5));
            call_slot(&client, &ctx, *method).await.ok();
        }

        let seen = mock
            .requests()
            .into_iter()
            .map(|(method, _)| method)
            .collect::<Vec<_>>();
        assert_eq!(seen, Method::ALL);
    }

    #[tokio::test]
    async fn cancelled_context_fails_every_slot() {
        let mock = silent_node();
        let client = Client::new(mock.clone(), Permission::Admin);

        let ctx = Context::background();
        ctx.cancel();

        for method in Method::ALL {
            let err = match call_slot(&client, &ctx, *method).await {
                Ok(()) => panic!("{method} succeeded with a cancelled context"),
                Err(e) => e,
            };
            assert!(err.is_cancellation(), "{method}: {err}");
        }
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn cancellation_aborts_in_flight_calls() {
        let mock = silent_node();
        let client = Client::new(mock.clone(), Permission::Admin);

        for method in Method::ALL.iter().filter(|m| !m.is_subscription()) {
            let ctx = Context::background();
            let canceller = ctx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(std::time::Duration::from_millis(10)).await;
                canceller.cancel();
            });

            let res = call_slot(&client, &ctx, *method).await;
            assert!(
                matches!(res, Err(ClientError::Cancelled)),
                "{method} was not aborted"
            );
        }
        assert_eq!(mock.request_count(), Method::ALL.len() - 2);
    }

    #[tokio::test]
    async fn read_client_cannot_reach_admin_slots() {
        let mock = MockTransport::new();
        let client = Client::new(mock.clone(), Permission::Read);
        let ctx = Context::background();

        let admin = Method::ALL
            .iter()
            .filter(|m| m.permission() == Permission::Admin)
            .collect::<Vec<_>>();
        assert_eq!(admin.len(), 21);

        for method in admin {
            let err = match call_slot(&client, &ctx, *method).await {
                Ok(()) => panic!("{method} passed the permission gate"),
                Err(e) => e,
            };
            assert!(err.is_unauthorized(), "{method}: {err}");
        }
        assert_eq!(mock.request_count(), 0);
    }
}
