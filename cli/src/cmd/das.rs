use anyhow::Result;
use clap::Subcommand;
use openrpc_client::prelude::*;

use crate::BaseArgs;
use crate::util::print_json;

#[derive(Subcommand)]
pub enum CmdDas {
    /// Get the current sampling progress.
    SamplingStats,
    /// Wait until sampling has caught up with the network head.
    WaitCatchUp,
}

impl CmdDas {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        args.rt(move |client, ctx| async move {
            match self {
                Self::SamplingStats => {
                    let stats = client.das_sampling_stats(&ctx).await?;
                    tracing::info!(lag = stats.lag(), "sampling stats received");
                    print_json(stats)
                }
                Self::WaitCatchUp => {
                    client.das_wait_catch_up(&ctx).await?;
                    print_json(serde_json::json!({ "catch_up_done": true }))
                }
            }
        })
    }
}
