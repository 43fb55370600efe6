use std::future::Future;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context as _, Result};
use clap::{Args, Parser, Subcommand};
use openrpc_client::{Client, ClientConfig, Context};
use openrpc_types::node::Permission;
use openrpc_util::cli::logger::init_logger;

mod cmd;
mod util;

fn main() -> ExitCode {
    match App::parse().run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Data-availability node client
#[derive(Parser)]
#[clap(name = "openrpc")]
#[clap(version)]
#[clap(subcommand_required = true, arg_required_else_help = true)]
struct App {
    #[clap(flatten)]
    args: BaseArgs,

    #[clap(subcommand)]
    cmd: Cmd,
}

impl App {
    fn run(self) -> Result<()> {
        match self.cmd {
            Cmd::Fraud(cmd) => cmd.run(self.args),
            Cmd::Das(cmd) => cmd.run(self.args),
            Cmd::Blob(cmd) => cmd.run(self.args),
            Cmd::Header(cmd) => cmd.run(self.args),
            Cmd::State(cmd) => cmd.run(self.args),
            Cmd::Share(cmd) => cmd.run(self.args),
            Cmd::P2p(cmd) => cmd.run(self.args),
            Cmd::Node(cmd) => cmd.run(self.args),
        }
    }
}

#[derive(Subcommand)]
enum Cmd {
    #[clap(subcommand)]
    Fraud(cmd::fraud::CmdFraud),
    #[clap(subcommand)]
    Das(cmd::das::CmdDas),
    #[clap(subcommand)]
    Blob(cmd::blob::CmdBlob),
    #[clap(subcommand)]
    Header(cmd::header::CmdHeader),
    #[clap(subcommand)]
    State(cmd::state::CmdState),
    #[clap(subcommand)]
    Share(cmd::share::CmdShare),
    #[clap(subcommand)]
    P2p(cmd::p2p::CmdP2p),
    #[clap(subcommand)]
    Node(cmd::node::CmdNode),
}

#[derive(Args)]
struct BaseArgs {
    /// Path to a client config file. Flags override its values.
    #[clap(long, global = true)]
    config: Option<PathBuf>,

    /// Node RPC endpoint. Use `ws://` for subscriptions.
    #[clap(long, global = true)]
    url: Option<String>,

    /// Auth token of the node.
    #[clap(long, global = true, env = "OPENRPC_AUTH_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Permission granted to the auth token.
    #[clap(long, global = true)]
    perm: Option<Permission>,

    /// Timeout of a single request. Blocking waits are not affected.
    #[clap(long, global = true, value_parser = humantime::parse_duration)]
    timeout: Option<Duration>,

    /// Path to a JSON file with per-target log levels.
    #[clap(long, global = true)]
    logger_config: Option<PathBuf>,
}

impl BaseArgs {
    fn load_config(&self) -> Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => ClientConfig::default(),
        };

        if let Some(url) = &self.url {
            config.url = url.parse().context("invalid node url")?;
        }
        if let Some(token) = &self.token {
            config.auth_token = Some(token.clone());
        }
        if let Some(perm) = self.perm {
            config.permission = perm;
        }
        if let Some(timeout) = self.timeout {
            config.request_timeout = timeout;
        }
        Ok(config)
    }

    /// Runs `f` against a connected client. Ctrl-C cancels the context
    /// passed to `f`.
    fn rt<F, FT>(self, f: F) -> Result<()>
    where
        F: FnOnce(Client, Context) -> FT,
        FT: Future<Output = Result<()>>,
    {
        init_logger(self.logger_config.as_deref(), "warn")?;
        let config = self.load_config()?;

        tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?
            .block_on(async move {
                let ctx = Context::background();
                tokio::spawn({
                    let ctx = ctx.clone();
                    async move {
                        if tokio::signal::ctrl_c().await.is_ok() {
                            tracing::info!("received interrupt signal");
                            ctx.cancel();
                        }
                    }
                });

                let client = Client::connect(&config)
                    .await
                    .with_context(|| format!("failed to connect to {}", config.url))?;
                f(client, ctx).await
            })
    }
}
