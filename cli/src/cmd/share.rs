use anyhow::Result;
use clap::Subcommand;
use openrpc_client::prelude::*;
use openrpc_types::share::Namespace;

use crate::BaseArgs;
use crate::util::print_json;

/// Share commands address blocks by height. The header is fetched first.
#[derive(Subcommand)]
pub enum CmdShare {
    /// Check that the block data at `height` is available.
    SharesAvailable { height: u64 },
    /// Get a single share of the extended data square.
    GetShare { height: u64, row: u32, col: u32 },
    /// Get the whole extended data square.
    GetEds { height: u64 },
    /// Get all shares under a namespace with their proofs.
    GetSharesByNamespace { height: u64, namespace: Namespace },
}

impl CmdShare {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        args.rt(move |client, ctx| async move {
            let height = match &self {
                Self::SharesAvailable { height }
                | Self::GetShare { height, .. }
                | Self::GetEds { height }
                | Self::GetSharesByNamespace { height, .. } => *height,
            };
            let header = client.header_get_by_height(&ctx, height).await?;

            match self {
                Self::SharesAvailable { .. } => {
                    client.share_shares_available(&ctx, &header).await?;
                    print_json(serde_json::json!({ "available": true }))
                }
                Self::GetShare { row, col, .. } => {
                    print_json(client.share_get_share(&ctx, &header, row, col).await?)
                }
                Self::GetEds { .. } => print_json(client.share_get_eds(&ctx, &header).await?),
                Self::GetSharesByNamespace { namespace, .. } => {
                    let shares = client
                        .share_get_shares_by_namespace(&ctx, &header, &namespace)
                        .await?;
                    print_json(shares)
                }
            }
        })
    }
}
