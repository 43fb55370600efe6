use async_trait::async_trait;
use openrpc_types::header::ExtendedHeader;
use openrpc_types::share::{ExtendedDataSquare, Namespace, NamespacedShares, Share};

use crate::client::Client;
use crate::context::Context;
use crate::error::ClientResult;
use crate::method::Method;

/// Block data retrieval, addressed by the header committing to it.
#[async_trait]
pub trait ShareApi {
    /// Succeeds once the node has verified the block data is available.
    async fn share_shares_available(&self, ctx: &Context, header: &ExtendedHeader)
    -> ClientResult<()>;

    async fn share_get_share(
        &self,
        ctx: &Context,
        header: &ExtendedHeader,
        row: u32,
        col: u32,
    ) -> ClientResult<Share>;

    async fn share_get_eds(
        &self,
        ctx: &Context,
        header: &ExtendedHeader,
    ) -> ClientResult<ExtendedDataSquare>;

    async fn share_get_shares_by_namespace(
        &self,
        ctx: &Context,
        header: &ExtendedHeader,
        namespace: &Namespace,
    ) -> ClientResult<NamespacedShares>;
}

#[async_trait]
impl ShareApi for Client {
    async fn share_shares_available(
        &self,
        ctx: &Context,
        header: &ExtendedHeader,
    ) -> ClientResult<()> {
        self.call(ctx, Method::ShareSharesAvailable, (header,))
            .await
    }

    async fn share_get_share(
        &self,
        ctx: &Context,
        header: &ExtendedHeader,
        row: u32,
        col: u32,
    ) -> ClientResult<Share> {
        self.call(ctx, Method::ShareGetShare, (header, row, col))
            .await
    }

    async fn share_get_eds(
        &self,
        ctx: &Context,
        header: &ExtendedHeader,
    ) -> ClientResult<ExtendedDataSquare> {
        self.call(ctx, Method::ShareGetEds, (header,)).await
    }

    async fn share_get_shares_by_namespace(
        &self,
        ctx: &Context,
        header: &ExtendedHeader,
        namespace: &Namespace,
    ) -> ClientResult<NamespacedShares> {
        self.call::<_, Option<NamespacedShares>>(
            ctx,
            Method::ShareGetSharesByNamespace,
            (header, namespace),
        )
        .await
        .map(Option::unwrap_or_default)
    }
}
