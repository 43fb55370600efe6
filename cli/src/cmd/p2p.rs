use anyhow::Result;
use clap::Subcommand;
use openrpc_client::prelude::*;
use openrpc_types::p2p::{AddrInfo, PeerId, ProtocolId};

use crate::BaseArgs;
use crate::util::print_json;

#[derive(Subcommand)]
pub enum CmdP2p {
    /// List connected peers.
    Peers,
    /// Get the known addresses of a peer.
    PeerInfo { peer: PeerId },
    /// Connect to a peer at the given multiaddresses.
    Connect {
        peer: PeerId,
        #[clap(required = true)]
        addrs: Vec<String>,
    },
    /// Close all connections to a peer.
    ClosePeer { peer: PeerId },
    /// Get the connection state of a peer.
    Connectedness { peer: PeerId },
    /// Get the reachability of the node.
    NatStatus,
    /// Block a peer.
    BlockPeer { peer: PeerId },
    /// Unblock a peer.
    UnblockPeer { peer: PeerId },
    /// List blocked peers.
    ListBlockedPeers,
    /// Protect the connection to a peer under a tag.
    Protect { peer: PeerId, tag: String },
    /// Remove a protection tag from a peer.
    Unprotect { peer: PeerId, tag: String },
    /// Check whether a peer is protected under a tag.
    IsProtected { peer: PeerId, tag: String },
    /// Get total bandwidth usage.
    BandwidthStats,
    /// Get bandwidth usage with a peer.
    BandwidthForPeer { peer: PeerId },
    /// Get bandwidth usage of a protocol.
    BandwidthForProtocol { protocol: ProtocolId },
    /// Get the resource manager state.
    ResourceState,
    /// List peers of a pubsub topic.
    PubSubPeers { topic: String },
}

impl CmdP2p {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        args.rt(move |client, ctx| async move {
            match self {
                Self::Peers => print_json(client.p2p_peers(&ctx).await?),
                Self::PeerInfo { peer } => print_json(client.p2p_peer_info(&ctx, &peer).await?),
                Self::Connect { peer, addrs } => {
                    let info = AddrInfo { id: peer, addrs };
                    client.p2p_connect(&ctx, &info).await?;
                    print_json(info)
                }
                Self::ClosePeer { peer } => {
                    client.p2p_close_peer(&ctx, &peer).await?;
                    print_json(peer)
                }
                Self::Connectedness { peer } => {
                    print_json(client.p2p_connectedness(&ctx, &peer).await?)
                }
                Self::NatStatus => print_json(client.p2p_nat_status(&ctx).await?),
                Self::BlockPeer { peer } => {
                    client.p2p_block_peer(&ctx, &peer).await?;
                    print_json(peer)
                }
                Self::UnblockPeer { peer } => {
                    client.p2p_unblock_peer(&ctx, &peer).await?;
                    print_json(peer)
                }
                Self::ListBlockedPeers => print_json(client.p2p_list_blocked_peers(&ctx).await?),
                Self::Protect { peer, tag } => {
                    client.p2p_protect(&ctx, &peer, &tag).await?;
                    print_json(serde_json::json!({ "protected": true }))
                }
                Self::Unprotect { peer, tag } => {
                    let protected = client.p2p_unprotect(&ctx, &peer, &tag).await?;
                    print_json(serde_json::json!({ "protected": protected }))
                }
                Self::IsProtected { peer, tag } => {
                    let protected = client.p2p_is_protected(&ctx, &peer, &tag).await?;
                    print_json(serde_json::json!({ "protected": protected }))
                }
                Self::BandwidthStats => print_json(client.p2p_bandwidth_stats(&ctx).await?),
                Self::BandwidthForPeer { peer } => {
                    print_json(client.p2p_bandwidth_for_peer(&ctx, &peer).await?)
                }
                Self::BandwidthForProtocol { protocol } => {
                    print_json(client.p2p_bandwidth_for_protocol(&ctx, &protocol).await?)
                }
                Self::ResourceState => print_json(client.p2p_resource_state(&ctx).await?),
                Self::PubSubPeers { topic } => {
                    print_json(client.p2p_pub_sub_peers(&ctx, &topic).await?)
                }
            }
        })
    }
}
