use std::sync::Arc;
use std::time::{Duration, Instant};

use openrpc_types::node::Permission;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::context::Context;
use crate::error::{AuthError, ClientError, ClientResult, TransportError};
use crate::method::{Method, MethodKind};
use crate::subscription::Subscription;
use crate::transport::{HttpTransport, Transport};

/// Node RPC client.
///
/// Every method group is exposed through its own trait (see [`crate::api`]),
/// all of them go through [`Client::call`] or [`Client::subscribe`]:
///
/// 1. the context is checked,
/// 2. the method permission is compared with the configured one,
/// 3. params are encoded and sent, racing the context,
/// 4. the result is decoded.
///
/// Nothing is retried.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    permission: Permission,
    request_timeout: Option<Duration>,
}

impl Client {
    pub fn new<T: Transport>(transport: T, permission: Permission) -> Self {
        Self::from_arc(Arc::new(transport), permission)
    }

    pub fn from_arc(transport: Arc<dyn Transport>, permission: Permission) -> Self {
        Self {
            transport,
            permission,
            request_timeout: None,
        }
    }

    /// Connects to the node described by `config`.
    ///
    /// `ws://` urls use a WebSocket connection, everything else plain HTTP.
    pub async fn connect(config: &ClientConfig) -> ClientResult<Self> {
        let token = config.auth_token.as_deref();

        let transport: Arc<dyn Transport> = if config.is_websocket() {
            connect_ws(config, token).await?
        } else {
            Arc::new(HttpTransport::new(config.url.clone(), token)?)
        };

        tracing::info!(
            url = %config.url,
            permission = %config.permission,
            "client created"
        );

        Ok(Self::from_arc(transport, config.permission)
            .with_request_timeout(config.request_timeout))
    }

    /// Bounds every plain request by `timeout` in addition to the caller's
    /// context. Blocking waits and subscription streams are not affected.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Rejects methods which require more than the configured permission.
    pub fn authorize(&self, method: Method) -> ClientResult<()> {
        let required = method.permission();
        if self.permission >= required {
            Ok(())
        } else {
            Err(AuthError::InsufficientPermission {
                method: method.name(),
                required,
                granted: self.permission,
            }
            .into())
        }
    }

    /// Calls `method` with positional `params`, given as a tuple.
    pub async fn call<P, R>(&self, ctx: &Context, method: Method, params: P) -> ClientResult<R>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        ctx.check()?;
        self.authorize(method)?;
        let params = encode_params(&params)?;

        let ctx = match self.request_timeout {
            Some(timeout) if method.kind() == MethodKind::Call => ctx.with_timeout(timeout),
            _ => ctx.clone(),
        };

        tracing::debug!(%method, "calling");
        let started_at = Instant::now();

        let res = ctx.run(self.transport.request(method, params)).await;
        match &res {
            Ok(_) => tracing::debug!(%method, elapsed = ?started_at.elapsed(), "call finished"),
            Err(e) => tracing::debug!(%method, elapsed = ?started_at.elapsed(), %e, "call failed"),
        }

        serde_json::from_value(res?).map_err(|e| TransportError::InvalidResponse(e).into())
    }

    /// Opens a subscription for `method`, which lives as long as `ctx`.
    pub async fn subscribe<P, R>(
        &self,
        ctx: &Context,
        method: Method,
        params: P,
    ) -> ClientResult<Subscription<R>>
    where
        P: Serialize + Send,
        R: DeserializeOwned,
    {
        debug_assert!(method.is_subscription(), "{method} is not a subscription");

        ctx.check()?;
        self.authorize(method)?;
        let params = encode_params(&params)?;

        let stream = ctx.run(self.transport.subscribe(method, params)).await?;
        Ok(Subscription::new(ctx, method, stream))
    }
}

#[cfg(feature = "ws")]
async fn connect_ws(
    config: &ClientConfig,
    token: Option<&str>,
) -> ClientResult<Arc<dyn Transport>> {
    let transport = crate::transport::WsTransport::connect(&config.url, token).await?;
    Ok(Arc::new(transport))
}

#[cfg(not(feature = "ws"))]
async fn connect_ws(_: &ClientConfig, _: Option<&str>) -> ClientResult<Arc<dyn Transport>> {
    Err(TransportError::SubscriptionsUnsupported("ws").into())
}

/// Tuples become positional arrays, `()` an empty one.
fn encode_params<P: Serialize>(params: &P) -> ClientResult<Vec<Value>> {
    match serde_json::to_value(params).map_err(ClientError::InvalidParams)? {
        Value::Null => Ok(Vec::new()),
        Value::Array(params) => Ok(params),
        param => Ok(vec![param]),
    }
}

#[cfg(test)]
mod tests {
    use futures_util::StreamExt;
    use openrpc_types::header::ExtendedHeader;

    use super::*;
    use crate::transport::{MockReply, MockTransport};

    #[test]
    fn params_encoding() {
        assert!(encode_params(&()).unwrap().is_empty());
        assert_eq!(encode_params(&(5u64,)).unwrap(), [Value::from(5)]);
        assert_eq!(
            encode_params(&(1u64, "a", [true])).unwrap(),
            [Value::from(1), Value::from("a"), serde_json::json!([true])]
        );
    }

    #[tokio::test]
    async fn gate_runs_before_transport() {
        openrpc_util::test::init_logger("gate_runs_before_transport", "debug");

        let mock = MockTransport::new();
        mock.respond(Method::NodeInfo, serde_json::json!({"type": 1, "api_version": "v1"}));
        let client = Client::new(mock.clone(), Permission::Write);

        let err = client
            .call::<_, Value>(&Context::background(), Method::NodeInfo, ())
            .await
            .unwrap_err();
        match err {
            ClientError::Unauthorized(AuthError::InsufficientPermission {
                method,
                required,
                granted,
            }) => {
                assert_eq!(method, "node.Info");
                assert_eq!(required, Permission::Admin);
                assert_eq!(granted, Permission::Write);
            }
            e => panic!("unexpected error: {e}"),
        }
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn cancelled_context_is_checked_first() {
        let mock = MockTransport::new();
        let client = Client::new(mock.clone(), Permission::Read);

        let ctx = Context::background();
        ctx.cancel();

        // Even a gated method reports the cancellation.
        let err = client
            .call::<_, Value>(&ctx, Method::P2pPeers, ())
            .await
            .unwrap_err();
        assert!(err.is_cancellation());
        assert_eq!(mock.request_count(), 0);
    }

    #[tokio::test]
    async fn request_timeout_bounds_calls() {
        let mock = MockTransport::new();
        mock.hang(Method::HeaderLocalHead);
        let client = Client::new(mock.clone(), Permission::Read)
            .with_request_timeout(Duration::from_millis(20));

        let err = client
            .call::<_, Value>(&Context::background(), Method::HeaderLocalHead, ())
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::DeadlineExceeded));
        assert_eq!(mock.request_count(), 1);
    }

    #[tokio::test]
    async fn waits_outlive_request_timeout() {
        let mock = MockTransport::new();
        mock.hang(Method::DasWaitCatchUp);
        mock.hang(Method::HeaderSyncWait);
        let client = Client::new(mock.clone(), Permission::Read)
            .with_request_timeout(Duration::from_millis(20));

        let ctx = Context::background().child();
        let das = tokio::spawn({
            let (client, ctx) = (client.clone(), ctx.clone());
            async move { client.call::<_, ()>(&ctx, Method::DasWaitCatchUp, ()).await }
        });
        let sync = tokio::spawn({
            let (client, ctx) = (client.clone(), ctx.clone());
            async move { client.call::<_, ()>(&ctx, Method::HeaderSyncWait, ()).await }
        });

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(!das.is_finished());
        assert!(!sync.is_finished());

        // Only the caller's context ends them.
        ctx.cancel();
        assert!(matches!(das.await.unwrap(), Err(ClientError::Cancelled)));
        assert!(matches!(sync.await.unwrap(), Err(ClientError::Cancelled)));
        assert_eq!(mock.request_count(), 2);
    }

    #[tokio::test]
    async fn malformed_results() {
        let mock = MockTransport::new();
        mock.on(Method::HeaderGetByHeight, |params| {
            MockReply::Value(params[0].clone())
        });
        let client = Client::new(mock.clone(), Permission::Read);

        let err = client
            .call::<_, ExtendedHeader>(&Context::background(), Method::HeaderGetByHeight, (5u64,))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Transport(TransportError::InvalidResponse(_))
        ));
        assert_eq!(mock.requests(), [(Method::HeaderGetByHeight, vec![Value::from(5)])]);
    }

    #[tokio::test]
    async fn subscription_ends_with_context() {
        let mock = MockTransport::new();
        let tx = mock.subscription(Method::HeaderSubscribe);
        let client = Client::new(mock.clone(), Permission::Read);

        let ctx = Context::background().child();
        let mut sub = client
            .subscribe::<_, u64>(&ctx, Method::HeaderSubscribe, ())
            .await
            .unwrap();

        tx.send(Ok(Value::from(1))).unwrap();
        tx.send(Ok(Value::from(2))).unwrap();
        assert_eq!(sub.next().await.unwrap().unwrap(), 1);
        assert_eq!(sub.next().await.unwrap().unwrap(), 2);

        ctx.cancel();
        tx.send(Ok(Value::from(3))).unwrap();
        assert!(sub.next().await.is_none());
        assert!(sub.next().await.is_none());
        assert!(sub.is_terminated());

        // The transport stream is released right away, not on drop.
        assert!(tx.send(Ok(Value::from(4))).is_err());
    }
}
