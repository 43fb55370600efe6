use anyhow::{Context as _, Result};
use base64::prelude::{BASE64_STANDARD, Engine as _};
use clap::{Args, Subcommand};
use openrpc_client::prelude::*;
use openrpc_types::blob::Blob;
use openrpc_types::share::Namespace;
use openrpc_types::state::{AccAddress, Address, Amount, Tx, TxResponse, ValAddress};

use crate::BaseArgs;
use crate::util::{print_json, read_bytes};

#[derive(Subcommand)]
pub enum CmdState {
    /// Print the address of the node's account.
    AccountAddress,
    /// Check whether the state service has stopped.
    IsStopped,
    /// Get the balance of the node's account or of `--address`.
    Balance {
        #[clap(long)]
        address: Option<Address>,
    },
    /// Send coins to an account.
    Transfer {
        to: AccAddress,
        amount: Amount,
        #[clap(flatten)]
        tx: TxArgs,
    },
    /// Broadcast a signed, base64-encoded transaction.
    SubmitTx { tx: String },
    /// Pay for a single blob.
    SubmitPayForBlob {
        namespace: Namespace,
        /// Blob data, or `@path` to read it from a file.
        data: String,
        #[clap(flatten)]
        tx: TxArgs,
    },
    /// Cancel an unbonding delegation created at `height`.
    CancelUnbondingDelegation {
        validator: ValAddress,
        amount: Amount,
        height: Amount,
        #[clap(flatten)]
        tx: TxArgs,
    },
    /// Move a delegation from one validator to another.
    BeginRedelegate {
        src_validator: ValAddress,
        dst_validator: ValAddress,
        amount: Amount,
        #[clap(flatten)]
        tx: TxArgs,
    },
    /// Undelegate coins from a validator.
    Undelegate {
        validator: ValAddress,
        amount: Amount,
        #[clap(flatten)]
        tx: TxArgs,
    },
    /// Delegate coins to a validator.
    Delegate {
        validator: ValAddress,
        amount: Amount,
        #[clap(flatten)]
        tx: TxArgs,
    },
    /// Get the node's delegation to a validator.
    QueryDelegation { validator: ValAddress },
    /// Get the node's unbonding delegation from a validator.
    QueryUnbonding { validator: ValAddress },
    /// Get the node's redelegations between two validators.
    QueryRedelegations {
        src_validator: ValAddress,
        dst_validator: ValAddress,
    },
}

#[derive(Args)]
pub struct TxArgs {
    /// Fee in utia.
    #[clap(long)]
    fee: Amount,

    /// Gas limit of the transaction.
    #[clap(long)]
    gas_limit: u64,
}

impl CmdState {
    pub fn run(self, args: BaseArgs) -> Result<()> {
        args.rt(move |client, ctx| async move {
            match self {
                Self::AccountAddress => print_json(client.state_account_address(&ctx).await?),
                Self::IsStopped => print_json(client.state_is_stopped(&ctx).await),
                Self::Balance { address: None } => print_json(client.state_balance(&ctx).await?),
                Self::Balance {
                    address: Some(address),
                } => print_json(client.state_balance_for_address(&ctx, &address).await?),
                Self::Transfer { to, amount, tx } => print_tx(
                    client
                        .state_transfer(&ctx, &to, amount, tx.fee, tx.gas_limit)
                        .await?,
                ),
                Self::SubmitTx { tx } => {
                    let tx = BASE64_STANDARD
                        .decode(tx.trim())
                        .context("invalid base64 transaction")?;
                    print_tx(client.state_submit_tx(&ctx, &Tx(tx)).await?)
                }
                Self::SubmitPayForBlob {
                    namespace,
                    data,
                    tx,
                } => {
                    let blob = Blob::new(namespace, read_bytes(&data)?);
                    let res = client
                        .state_submit_pay_for_blob(&ctx, tx.fee, tx.gas_limit, &[blob])
                        .await?;
                    print_tx(res)
                }
                Self::CancelUnbondingDelegation {
                    validator,
                    amount,
                    height,
                    tx,
                } => {
                    let res = client
                        .state_cancel_unbonding_delegation(
                            &ctx,
                            &validator,
                            amount,
                            height,
                            tx.fee,
                            tx.gas_limit,
                        )
                        .await?;
                    print_tx(res)
                }
                Self::BeginRedelegate {
                    src_validator,
                    dst_validator,
                    amount,
                    tx,
                } => {
                    let res = client
                        .state_begin_redelegate(
                            &ctx,
                            &src_validator,
                            &dst_validator,
                            amount,
                            tx.fee,
                            tx.gas_limit,
                        )
                        .await?;
                    print_tx(res)
                }
                Self::Undelegate {
                    validator,
                    amount,
                    tx,
                } => print_tx(
                    client
                        .state_undelegate(&ctx, &validator, amount, tx.fee, tx.gas_limit)
                        .await?,
                ),
                Self::Delegate {
                    validator,
                    amount,
                    tx,
                } => print_tx(
                    client
                        .state_delegate(&ctx, &validator, amount, tx.fee, tx.gas_limit)
                        .await?,
                ),
                Self::QueryDelegation { validator } => {
                    print_json(client.state_query_delegation(&ctx, &validator).await?)
                }
                Self::QueryUnbonding { validator } => {
                    print_json(client.state_query_unbonding(&ctx, &validator).await?)
                }
                Self::QueryRedelegations {
                    src_validator,
                    dst_validator,
                } => {
                    let res = client
                        .state_query_redelegations(&ctx, &src_validator, &dst_validator)
                        .await?;
                    print_json(res)
                }
            }
        })
    }
}

fn print_tx(res: TxResponse) -> Result<()> {
    if !res.is_success() {
        tracing::warn!(
            txhash = %res.txhash,
            code = res.code,
            codespace = %res.codespace,
            "transaction failed"
        );
    }
    print_json(res)
}
