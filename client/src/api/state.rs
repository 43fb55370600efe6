use async_trait::async_trait;
use openrpc_types::blob::Blob;
use openrpc_types::state::{
    AccAddress, Address, Amount, Balance, QueryDelegationResponse, QueryRedelegationsResponse,
    QueryUnbondingDelegationResponse, Tx, TxResponse, ValAddress,
};

use crate::client::Client;
use crate::context::Context;
use crate::error::ClientResult;
use crate::method::Method;

/// Account state and transactions signed by the node's key.
///
/// Every transaction method takes a `fee` and a `gas_limit`, both are
/// used as is.
#[async_trait]
pub trait StateApi {
    /// Address of the node's signing key.
    async fn state_account_address(&self, ctx: &Context) -> ClientResult<Address>;

    /// Whether the node's state service is stopped.
    ///
    /// Never fails: any error is logged and reported as `false`.
    async fn state_is_stopped(&self, ctx: &Context) -> bool;

    async fn state_balance(&self, ctx: &Context) -> ClientResult<Balance>;

    async fn state_balance_for_address(
        &self,
        ctx: &Context,
        address: &Address,
    ) -> ClientResult<Balance>;

    async fn state_transfer(
        &self,
        ctx: &Context,
        to: &AccAddress,
        amount: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse>;

    async fn state_submit_tx(&self, ctx: &Context, tx: &Tx) -> ClientResult<TxResponse>;

    async fn state_submit_pay_for_blob(
        &self,
        ctx: &Context,
        fee: Amount,
        gas_limit: u64,
        blobs: &[Blob],
    ) -> ClientResult<TxResponse>;

    async fn state_cancel_unbonding_delegation(
        &self,
        ctx: &Context,
        validator: &ValAddress,
        amount: Amount,
        height: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse>;

    async fn state_begin_redelegate(
        &self,
        ctx: &Context,
        src_validator: &ValAddress,
        dst_validator: &ValAddress,
        amount: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse>;

    async fn state_undelegate(
        &self,
        ctx: &Context,
        validator: &ValAddress,
        amount: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse>;

    async fn state_delegate(
        &self,
        ctx: &Context,
        validator: &ValAddress,
        amount: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse>;

    async fn state_query_delegation(
        &self,
        ctx: &Context,
        validator: &ValAddress,
    ) -> ClientResult<QueryDelegationResponse>;

    async fn state_query_unbonding(
        &self,
        ctx: &Context,
        validator: &ValAddress,
    ) -> ClientResult<QueryUnbondingDelegationResponse>;

    async fn state_query_redelegations(
        &self,
        ctx: &Context,
        src_validator: &ValAddress,
        dst_validator: &ValAddress,
    ) -> ClientResult<QueryRedelegationsResponse>;
}

#[async_trait]
impl StateApi for Client {
    async fn state_account_address(&self, ctx: &Context) -> ClientResult<Address> {
        self.call(ctx, Method::StateAccountAddress, ()).await
    }

    async fn state_is_stopped(&self, ctx: &Context) -> bool {
        match self.call(ctx, Method::StateIsStopped, ()).await {
            Ok(stopped) => stopped,
            Err(e) => {
                tracing::warn!(%e, "failed to check whether the state service is stopped");
                false
            }
        }
    }

    async fn state_balance(&self, ctx: &Context) -> ClientResult<Balance> {
        self.call(ctx, Method::StateBalance, ()).await
    }

    async fn state_balance_for_address(
        &self,
        ctx: &Context,
        address: &Address,
    ) -> ClientResult<Balance> {
        self.call(ctx, Method::StateBalanceForAddress, (address,))
            .await
    }

    async fn state_transfer(
        &self,
        ctx: &Context,
        to: &AccAddress,
        amount: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse> {
        self.call(ctx, Method::StateTransfer, (to, amount, fee, gas_limit))
            .await
    }

    async fn state_submit_tx(&self, ctx: &Context, tx: &Tx) -> ClientResult<TxResponse> {
        self.call(ctx, Method::StateSubmitTx, (tx,)).await
    }

    async fn state_submit_pay_for_blob(
        &self,
        ctx: &Context,
        fee: Amount,
        gas_limit: u64,
        blobs: &[Blob],
    ) -> ClientResult<TxResponse> {
        self.call(ctx, Method::StateSubmitPayForBlob, (fee, gas_limit, blobs))
            .await
    }

    async fn state_cancel_unbonding_delegation(
        &self,
        ctx: &Context,
        validator: &ValAddress,
        amount: Amount,
        height: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse> {
        self.call(
            ctx,
            Method::StateCancelUnbondingDelegation,
            (validator, amount, height, fee, gas_limit),
        )
        .await
    }

    async fn state_begin_redelegate(
        &self,
        ctx: &Context,
        src_validator: &ValAddress,
        dst_validator: &ValAddress,
        amount: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse> {
        self.call(
            ctx,
            Method::StateBeginRedelegate,
            (src_validator, dst_validator, amount, fee, gas_limit),
        )
        .await
    }

    async fn state_undelegate(
        &self,
        ctx: &Context,
        validator: &ValAddress,
        amount: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse> {
        self.call(
            ctx,
            Method::StateUndelegate,
            (validator, amount, fee, gas_limit),
        )
        .await
    }

    async fn state_delegate(
        &self,
        ctx: &Context,
        validator: &ValAddress,
        amount: Amount,
        fee: Amount,
        gas_limit: u64,
    ) -> ClientResult<TxResponse> {
        self.call(
            ctx,
            Method::StateDelegate,
            (validator, amount, fee, gas_limit),
        )
        .await
    }

    async fn state_query_delegation(
        &self,
        ctx: &Context,
        validator: &ValAddress,
    ) -> ClientResult<QueryDelegationResponse> {
        self.call(ctx, Method::StateQueryDelegation, (validator,))
            .await
    }

    async fn state_query_unbonding(
        &self,
        ctx: &Context,
        validator: &ValAddress,
    ) -> ClientResult<QueryUnbondingDelegationResponse> {
        self.call(ctx, Method::StateQueryUnbonding, (validator,))
            .await
    }

    async fn state_query_redelegations(
        &self,
        ctx: &Context,
        src_validator: &ValAddress,
        dst_validator: &ValAddress,
    ) -> ClientResult<QueryRedelegationsResponse> {
        self.call(
            ctx,
            Method::StateQueryRedelegations,
            (src_validator, dst_validator),
        )
        .await
    }
}
