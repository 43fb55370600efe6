use anyhow::Result;
use clap::Subcommand;
use openrpc_client::prelude::*;
use openrpc_types::fraud::ProofType;

use crate::BaseArgs;
use crate::util::{print_json, print_stream};

#[derive(Subcommand)]
pub enum CmdFraud {
    /// Print fraud proofs of the given type as the node receives them.
    /// Requires a `ws://` url.
    Subscribe {
        #[clap(default_value = ProofType::BAD_ENCODING)]
        proof_type: ProofType,
    },
    /// Get fraud proofs of the given type stored by the node.
    Get {
        #[clap(default_value = ProofType::BAD_ENCODING)]
        proof_type: ProofType,
    },
}

impl CmdFraud {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        args.rt(move |client, ctx| async move {
            match self {
                Self::Subscribe { proof_type } => {
                    print_stream(client.fraud_subscribe(&ctx, &proof_type).await?).await
                }
                Self::Get { proof_type } => {
                    print_json(client.fraud_get(&ctx, &proof_type).await?)
                }
            }
        })
    }
}
