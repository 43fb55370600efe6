use async_trait::async_trait;
use openrpc_types::p2p::{
    AddrInfo, BandwidthStats, Connectedness, PeerId, ProtocolId, Reachability,
    ResourceManagerStat,
};

use crate::client::Client;
use crate::context::Context;
use crate::error::ClientResult;
use crate::method::Method;

/// Peer management of the node's libp2p host. Admin only.
#[async_trait]
pub trait P2pApi {
    async fn p2p_peers(&self, ctx: &Context) -> ClientResult<Vec<PeerId>>;

    async fn p2p_peer_info(&self, ctx: &Context, id: &PeerId) -> ClientResult<AddrInfo>;

    async fn p2p_connect(&self, ctx: &Context, info: &AddrInfo) -> ClientResult<()>;

    async fn p2p_close_peer(&self, ctx: &Context, id: &PeerId) -> ClientResult<()>;

    async fn p2p_connectedness(&self, ctx: &Context, id: &PeerId) -> ClientResult<Connectedness>;

    async fn p2p_nat_status(&self, ctx: &Context) -> ClientResult<Reachability>;

    async fn p2p_block_peer(&self, ctx: &Context, id: &PeerId) -> ClientResult<()>;

    async fn p2p_unblock_peer(&self, ctx: &Context, id: &PeerId) -> ClientResult<()>;

    async fn p2p_list_blocked_peers(&self, ctx: &Context) -> ClientResult<Vec<PeerId>>;

    /// Protects the connection to `id` from trimming under `tag`.
    async fn p2p_protect(&self, ctx: &Context, id: &PeerId, tag: &str) -> ClientResult<()>;

    /// Returns whether the peer is still protected under other tags.
    async fn p2p_unprotect(&self, ctx: &Context, id: &PeerId, tag: &str) -> ClientResult<bool>;

    async fn p2p_is_protected(&self, ctx: &Context, id: &PeerId, tag: &str)
    -> ClientResult<bool>;

    async fn p2p_bandwidth_stats(&self, ctx: &Context) -> ClientResult<BandwidthStats>;

    async fn p2p_bandwidth_for_peer(
        &self,
        ctx: &Context,
        id: &PeerId,
    ) -> ClientResult<BandwidthStats>;

    async fn p2p_bandwidth_for_protocol(
        &self,
        ctx: &Context,
        protocol: &ProtocolId,
    ) -> ClientResult<BandwidthStats>;

    async fn p2p_resource_state(&self, ctx: &Context) -> ClientResult<ResourceManagerStat>;

    async fn p2p_pub_sub_peers(&self, ctx: &Context, topic: &str) -> ClientResult<Vec<PeerId>>;
}

#[async_trait]
impl P2pApi for Client {
    async fn p2p_peers(&self, ctx: &Context) -> ClientResult<Vec<PeerId>> {
        self.call::<_, Option<_>>(ctx, Method::P2pPeers, ())
            .await
            .map(Option::unwrap_or_default)
    }

    async fn p2p_peer_info(&self, ctx: &Context, id: &PeerId) -> ClientResult<AddrInfo> {
        self.call(ctx, Method::P2pPeerInfo, (id,)).await
    }

    async fn p2p_connect(&self, ctx: &Context, info: &AddrInfo) -> ClientResult<()> {
        self.call(ctx, Method::P2pConnect, (info,)).await
    }

    async fn p2p_close_peer(&self, ctx: &Context, id: &PeerId) -> ClientResult<()> {
        self.call(ctx, Method::P2pClosePeer, (id,)).await
    }

    async fn p2p_connectedness(&self, ctx: &Context, id: &PeerId) -> ClientResult<Connectedness> {
        self.call(ctx, Method::P2pConnectedness, (id,)).await
    }

    async fn p2p_nat_status(&self, ctx: &Context) -> ClientResult<Reachability> {
        self.call(ctx, Method::P2pNatStatus, ()).await
    }

    async fn p2p_block_peer(&self, ctx: &Context, id: &PeerId) -> ClientResult<()> {
        self.call(ctx, Method::P2pBlockPeer, (id,)).await
    }

    async fn p2p_unblock_peer(&self, ctx: &Context, id: &PeerId) -> ClientResult<()> {
        self.call(ctx, Method::P2pUnblockPeer, (id,)).await
    }

    async fn p2p_list_blocked_peers(&self, ctx: &Context) -> ClientResult<Vec<PeerId>> {
        self.call::<_, Option<_>>(ctx, Method::P2pListBlockedPeers, ())
            .await
            .map(Option::unwrap_or_default)
    }

    async fn p2p_protect(&self, ctx: &Context, id: &PeerId, tag: &str) -> ClientResult<()> {
        self.call(ctx, Method::P2pProtect, (id, tag)).await
    }

    async fn p2p_unprotect(&self, ctx: &Context, id: &PeerId, tag: &str) -> ClientResult<bool> {
        self.call(ctx, Method::P2pUnprotect, (id, tag)).await
    }

    async fn p2p_is_protected(
        &self,
        ctx: &Context,
        id: &PeerId,
        tag: &str,
    ) -> ClientResult<bool> {
        self.call(ctx, Method::P2pIsProtected, (id, tag)).await
    }

    async fn p2p_bandwidth_stats(&self, ctx: &Context) -> ClientResult<BandwidthStats> {
        self.call(ctx, Method::P2pBandwidthStats, ()).await
    }

    async fn p2p_bandwidth_for_peer(
        &self,
        ctx: &Context,
        id: &PeerId,
    ) -> ClientResult<BandwidthStats> {
        self.call(ctx, Method::P2pBandwidthForPeer, (id,)).await
    }

    async fn p2p_bandwidth_for_protocol(
        &self,
        ctx: &Context,
        protocol: &ProtocolId,
    ) -> ClientResult<BandwidthStats> {
        self.call(ctx, Method::P2pBandwidthForProtocol, (protocol,))
            .await
    }

    async fn p2p_resource_state(&self, ctx: &Context) -> ClientResult<ResourceManagerStat> {
        self.call(ctx, Method::P2pResourceState, ()).await
    }

    async fn p2p_pub_sub_peers(&self, ctx: &Context, topic: &str) -> ClientResult<Vec<PeerId>> {
        self.call::<_, Option<_>>(ctx, Method::P2pPubSubPeers, (topic,))
            .await
            .map(Option::unwrap_or_default)
    }
}
