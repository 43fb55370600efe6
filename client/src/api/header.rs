use async_trait::async_trait;
use openrpc_types::header::{ExtendedHeader, Hash, SyncState};

use crate::client::Client;
use crate::context::Context;
use crate::error::ClientResult;
use crate::method::Method;
use crate::subscription::Subscription;

#[async_trait]
pub trait HeaderApi {
    /// Latest header stored by the node.
    async fn header_local_head(&self, ctx: &Context) -> ClientResult<ExtendedHeader>;

    async fn header_get_by_hash(&self, ctx: &Context, hash: &Hash) -> ClientResult<ExtendedHeader>;

    /// Headers after `from` up to `to_height` (exclusive), verified against
    /// `from`.
    async fn header_get_verified_range_by_height(
        &self,
        ctx: &Context,
        from: &ExtendedHeader,
        to_height: u64,
    ) -> ClientResult<Vec<ExtendedHeader>>;

    /// Waits for the node to sync up to `height` if it has not yet.
    async fn header_get_by_height(&self, ctx: &Context, height: u64)
    -> ClientResult<ExtendedHeader>;

    async fn header_sync_state(&self, ctx: &Context) -> ClientResult<SyncState>;

    /// Blocks until the node has synced to the network head.
    async fn header_sync_wait(&self, ctx: &Context) -> ClientResult<()>;

    /// Latest header known to the network, which may not be stored yet.
    async fn header_network_head(&self, ctx: &Context) -> ClientResult<ExtendedHeader>;

    /// Streams headers as the node syncs them.
    async fn header_subscribe(&self, ctx: &Context) -> ClientResult<Subscription<ExtendedHeader>>;
}

#[async_trait]
impl HeaderApi for Client {
    async fn header_local_head(&self, ctx: &Context) -> ClientResult<ExtendedHeader> {
        self.call(ctx, Method::HeaderLocalHead, ()).await
    }

    async fn header_get_by_hash(&self, ctx: &Context, hash: &Hash) -> ClientResult<ExtendedHeader> {
        self.call(ctx, Method::HeaderGetByHash, (hash,)).await
    }

    async fn header_get_verified_range_by_height(
        &self,
        ctx: &Context,
        from: &ExtendedHeader,
        to_height: u64,
    ) -> ClientResult<Vec<ExtendedHeader>> {
        self.call::<_, Option<Vec<ExtendedHeader>>>(
            ctx,
            Method::HeaderGetVerifiedRangeByHeight,
            (from, to_height),
        )
        .await
        .map(Option::unwrap_or_default)
    }

    async fn header_get_by_height(
        &self,
        ctx: &Context,
        height: u64,
    ) -> ClientResult<ExtendedHeader> {
        self.call(ctx, Method::HeaderGetByHeight, (height,)).await
    }

    async fn header_sync_state(&self, ctx: &Context) -> ClientResult<SyncState> {
        self.call(ctx, Method::HeaderSyncState, ()).await
    }

    async fn header_sync_wait(&self, ctx: &Context) -> ClientResult<()> {
        self.call(ctx, Method::HeaderSyncWait, ()).await
    }

    async fn header_network_head(&self, ctx: &Context) -> ClientResult<ExtendedHeader> {
        self.call(ctx, Method::HeaderNetworkHead, ()).await
    }

    async fn header_subscribe(&self, ctx: &Context) -> ClientResult<Subscription<ExtendedHeader>> {
        self.subscribe(ctx, Method::HeaderSubscribe, ()).await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use futures_util::StreamExt;
    use openrpc_types::node::Permission;

    use super::*;
    use crate::api::test_header;
    use crate::error::{ClientError, TransportError};
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn subscription_stops_at_cancellation() {
        openrpc_util::test::init_logger("subscription_stops_at_cancellation", "debug");

        let mock = MockTransport::new();
        let tx = mock.subscription(Method::HeaderSubscribe);
        let client = Client::new(mock.clone(), Permission::Read);

        let ctx = Context::background().child();
        let mut headers = client.header_subscribe(&ctx).await.unwrap();

        // The node keeps producing headers in the background.
        let producer = tokio::spawn(async move {
            for height in 1.. {
                let header = serde_json::to_value(test_header(height)).unwrap();
                if tx.send(Ok(header)).is_err() {
                    break;
                }
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        });

        let mut received = Vec::new();
        while let Some(header) = headers.next().await {
            let header = header.unwrap();
            received.push(header.height());
            if received.len() == 3 {
                ctx.cancel();
            }
        }

        assert_eq!(received, [1, 2, 3]);
        assert!(headers.next().await.is_none());

        // The stream released the channel, so the producer stops.
        drop(headers);
        producer.await.unwrap();
    }

    #[tokio::test]
    async fn lost_connection_ends_subscription() {
        let mock = MockTransport::new();
        let tx = mock.subscription(Method::HeaderSubscribe);
        let client = Client::new(mock, Permission::Read);

        let mut headers = client
            .header_subscribe(&Context::background())
            .await
            .unwrap();

        tx.send(Ok(serde_json::to_value(test_header(7)).unwrap()))
            .unwrap();
        tx.send(Err(TransportError::Closed.into())).unwrap();
        drop(tx);

        assert_eq!(headers.next().await.unwrap().unwrap().height(), 7);
        assert!(matches!(
            headers.next().await,
            Some(Err(ClientError::Transport(TransportError::Closed)))
        ));
        assert!(headers.next().await.is_none());
    }

    #[tokio::test]
    async fn range_params() {
        let mock = MockTransport::new();
        mock.respond(Method::HeaderGetVerifiedRangeByHeight, [
            test_header(11),
            test_header(12),
        ]);
        let client = Client::new(mock.clone(), Permission::Read);

        let from = test_header(10);
        let range = client
            .header_get_verified_range_by_height(&Context::background(), &from, 13)
            .await
            .unwrap();
        assert_eq!(range.len(), 2);
        assert!(from.is_adjacent(&range[0]));

        let params = &mock.requests()[0].1;
        assert_eq!(params[0]["header"]["height"], "10");
        assert_eq!(params[1], 13);
    }
}
