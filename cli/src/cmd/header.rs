use anyhow::Result;
use clap::Subcommand;
use openrpc_client::prelude::*;
use openrpc_types::header::Hash;

use crate::BaseArgs;
use crate::util::{print_json, print_stream};

#[derive(Subcommand)]
pub enum CmdHeader {
    /// Get the latest header stored by the node.
    LocalHead,
    /// Get the latest header known to the network.
    NetworkHead,
    /// Get a header by its hex-encoded hash.
    GetByHash { hash: Hash },
    /// Get a header by height.
    GetByHeight { height: u64 },
    /// Get verified headers after `from` up to `to` exclusive.
    GetRange { from: u64, to: u64 },
    /// Get the state of header synchronization.
    SyncState,
    /// Wait until the node is synced.
    SyncWait,
    /// Print new headers as they are synced. Requires a `ws://` url.
    Subscribe,
}

impl CmdHeader {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        args.rt(move |client, ctx| async move {
            match self {
                Self::LocalHead => print_json(client.header_local_head(&ctx).await?),
                Self::NetworkHead => print_json(client.header_network_head(&ctx).await?),
                Self::GetByHash { hash } => {
                    print_json(client.header_get_by_hash(&ctx, &hash).await?)
                }
                Self::GetByHeight { height } => {
                    print_json(client.header_get_by_height(&ctx, height).await?)
                }
                Self::GetRange { from, to } => {
                    let from = client.header_get_by_height(&ctx, from).await?;
                    let headers = client
                        .header_get_verified_range_by_height(&ctx, &from, to)
                        .await?;
                    print_json(headers)
                }
                Self::SyncState => print_json(client.header_sync_state(&ctx).await?),
                Self::SyncWait => {
                    client.header_sync_wait(&ctx).await?;
                    print_json(client.header_sync_state(&ctx).await?)
                }
                Self::Subscribe => print_stream(client.header_subscribe(&ctx).await?).await,
            }
        })
    }
}
