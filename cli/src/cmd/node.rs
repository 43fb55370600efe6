use anyhow::Result;
use clap::Subcommand;
use openrpc_client::prelude::*;
use openrpc_types::node::Permission;

use crate::BaseArgs;
use crate::util::print_json;

#[derive(Subcommand)]
pub enum CmdNode {
    /// Get the node type and version.
    Info,
    /// Set the log level of a subsystem, `*` for all of them.
    LogLevelSet { name: String, level: String },
    /// Print the permissions granted to a token.
    AuthVerify { token: String },
    /// Create a token with the given permissions.
    AuthNew {
        #[clap(required = true)]
        permissions: Vec<Permission>,
    },
}

impl CmdNode {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        args.rt(move |client, ctx| async move {
            match self {
                Self::Info => print_json(client.node_info(&ctx).await?),
                Self::LogLevelSet { name, level } => {
                    client.node_log_level_set(&ctx, &name, &level).await?;
                    print_json(serde_json::json!({ "name": name, "level": level }))
                }
                Self::AuthVerify { token } => {
                    print_json(client.node_auth_verify(&ctx, &token).await?)
                }
                Self::AuthNew { permissions } => {
                    let token = client.node_auth_new(&ctx, &permissions).await?;
                    print_json(String::from_utf8_lossy(&token))
                }
            }
        })
    }
}
