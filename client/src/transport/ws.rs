use std::collections::hash_map;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use jsonrpsee::core::client::{
    ClientT, Error as JsonrpseeError, Subscription as RpcSubscription, SubscriptionClientT,
};
use jsonrpsee::core::params::ArrayParams;
use jsonrpsee::ws_client::{HeaderMap, WsClient, WsClientBuilder};
use openrpc_util::{FastHashMap, FastHashSet};
use parking_lot::Mutex;
use reqwest::Url;
use serde_json::Value;
use tokio::sync::mpsc;

use super::{Transport, ValueStream};
use crate::error::{ClientError, ClientResult, RemoteError, TransportError};
use crate::method::Method;

const CHANNEL_VALUE: &str = "xrpc.ch.val";
const CHANNEL_CLOSE: &str = "xrpc.ch.close";

/// Request timeouts are applied by the client per method kind, blocking
/// methods must not be cut short by the connection.
const NO_REQUEST_TIMEOUT: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// JSON-RPC over a persistent WebSocket connection.
///
/// Subscriptions are channels: the subscribe call returns a channel id, the
/// node then pushes `xrpc.ch.val [id, value]` notifications and finishes
/// with `xrpc.ch.close [id]`.
///
/// The connection is not re-established. Once it is lost every open
/// subscription yields [`TransportError::Closed`] and ends, and all further
/// requests fail.
pub struct WsTransport {
    client: Arc<WsClient>,
    router: Arc<ChannelRouter>,
}

impl WsTransport {
    pub async fn connect(url: &Url, auth_token: Option<&str>) -> ClientResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = auth_token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                super::bearer(token).map_err(TransportError::InvalidAuthToken)?,
            );
        }

        let client = WsClientBuilder::default()
            .set_headers(headers)
            .request_timeout(NO_REQUEST_TIMEOUT)
            .build(url.as_str())
            .await
            .map_err(TransportError::Ws)?;

        let values = client
            .subscribe_to_method::<(u64, Value)>(CHANNEL_VALUE)
            .await
            .map_err(TransportError::Ws)?;
        let closes = client
            .subscribe_to_method::<(u64,)>(CHANNEL_CLOSE)
            .await
            .map_err(TransportError::Ws)?;

        let router = Arc::new(ChannelRouter::default());
        tokio::spawn(route_notifications(router.clone(), values, closes));

        tracing::debug!(%url, "websocket connected");

        Ok(Self {
            client: Arc::new(client),
            router,
        })
    }

    pub fn is_connected(&self) -> bool {
        self.client.is_connected()
    }
}

#[async_trait]
impl Transport for WsTransport {
    async fn request(&self, method: Method, params: Vec<Value>) -> ClientResult<Value> {
        self.client
            .request::<Value, _>(method.name(), array_params(params)?)
            .await
            .map_err(map_error)
    }

    async fn subscribe(&self, method: Method, params: Vec<Value>) -> ClientResult<ValueStream> {
        let params = array_params(params)?;

        let channel = {
            let _pending = self.router.begin_subscribe();
            let channel = self
                .client
                .request::<u64, _>(method.name(), params)
                .await
                .map_err(map_error)?;
            ChannelGuard {
                channel,
                rx: self.router.register(channel),
                router: self.router.clone(),
                client: self.client.clone(),
            }
        };

        tracing::debug!(%method, channel = channel.channel, "channel opened");

        Ok(futures_util::stream::unfold(channel, |mut channel| async move {
            channel.rx.recv().await.map(|item| (item, channel))
        })
        .boxed())
    }
}

/// Receiving end of an open channel. Dropping it before the node closes
/// the channel asks the node to close it.
struct ChannelGuard {
    channel: u64,
    rx: ChannelRx,
    router: Arc<ChannelRouter>,
    client: Arc<WsClient>,
}

impl Drop for ChannelGuard {
    fn drop(&mut self) {
        if !self.router.release(self.channel) {
            return;
        }

        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let channel = self.channel;
        let client = self.client.clone();
        handle.spawn(async move {
            let res = match array_params(vec![Value::from(channel)]) {
                Ok(params) => client.notification(CHANNEL_CLOSE, params).await,
                Err(_) => return,
            };
            match res {
                Ok(()) => tracing::debug!(channel, "channel released"),
                Err(e) => tracing::debug!(channel, %e, "failed to release channel"),
            }
        });
    }
}

fn array_params(params: Vec<Value>) -> ClientResult<ArrayParams> {
    let mut array = ArrayParams::new();
    for param in params {
        array.insert(param).map_err(ClientError::InvalidParams)?;
    }
    Ok(array)
}

fn map_error(error: JsonrpseeError) -> ClientError {
    match error {
        JsonrpseeError::Call(e) => RemoteError {
            code: e.code() as i64,
            message: e.message().to_owned(),
            data: e.data().and_then(|raw| serde_json::from_str(raw.get()).ok()),
        }
        .into(),
        JsonrpseeError::ParseError(e) => TransportError::InvalidResponse(e).into(),
        e => TransportError::Ws(e).into(),
    }
}

async fn route_notifications(
    router: Arc<ChannelRouter>,
    mut values: RpcSubscription<(u64, Value)>,
    mut closes: RpcSubscription<(u64,)>,
) {
    loop {
        tokio::select! {
            value = values.next() => match value {
                Some(Ok((channel, value))) => router.push(channel, value),
                Some(Err(e)) => tracing::warn!(%e, "malformed channel value"),
                None => break,
            },
            close = closes.next() => match close {
                Some(Ok((channel,))) => router.close(channel),
                Some(Err(e)) => tracing::warn!(%e, "malformed channel close"),
                None => break,
            },
        }
    }

    router.disconnect();
}

type ChannelTx = mpsc::UnboundedSender<ClientResult<Value>>;
type ChannelRx = mpsc::UnboundedReceiver<ClientResult<Value>>;

/// Dispatches channel notifications to subscribers.
///
/// The node may push values before the subscribe response arrives, so
/// notifications for unknown channels are kept while a subscribe request
/// is in flight. Values for released channels are dropped.
#[derive(Default)]
struct ChannelRouter {
    state: Mutex<RouterState>,
}

#[derive(Default)]
struct RouterState {
    channels: FastHashMap<u64, ChannelTx>,
    early: FastHashMap<u64, EarlyChannel>,
    /// Released by the client but not yet closed by the node.
    finished: FastHashSet<u64>,
    /// Subscribe requests waiting for a channel id.
    pending: usize,
    disconnected: bool,
}

#[derive(Default)]
struct EarlyChannel {
    values: Vec<Value>,
    closed: bool,
}

struct PendingSubscribe<'a> {
    router: &'a ChannelRouter,
}

impl Drop for PendingSubscribe<'_> {
    fn drop(&mut self) {
        let mut state = self.router.state.lock();
        state.pending -= 1;
        if state.pending == 0 && !state.early.is_empty() {
            tracing::debug!(count = state.early.len(), "dropping values of unknown channels");
            state.early.clear();
        }
    }
}

impl ChannelRouter {
    fn begin_subscribe(&self) -> PendingSubscribe<'_> {
        self.state.lock().pending += 1;
        PendingSubscribe { router: self }
    }

    fn register(&self, channel: u64) -> ChannelRx {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut state = self.state.lock();
        if state.disconnected {
            tx.send(Err(TransportError::Closed.into())).ok();
            return rx;
        }

        let early = state.early.remove(&channel).unwrap_or_default();
        for value in early.values {
            tx.send(Ok(value)).ok();
        }
        if !early.closed {
            state.finished.remove(&channel);
            state.channels.insert(channel, tx);
        }
        rx
    }

    /// Forgets the channel. Returns `true` if the node still has it open.
    fn release(&self, channel: u64) -> bool {
        let mut state = self.state.lock();
        if state.disconnected || state.channels.remove(&channel).is_none() {
            return false;
        }
        state.finished.insert(channel);
        true
    }

    fn push(&self, channel: u64, value: Value) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        match state.channels.entry(channel) {
            hash_map::Entry::Occupied(entry) => {
                if entry.get().send(Ok(value)).is_err() {
                    // Subscriber is gone.
                    entry.remove();
                    state.finished.insert(channel);
                }
            }
            hash_map::Entry::Vacant(_) => {
                if state.pending > 0 && !state.finished.contains(&channel) {
                    state.early.entry(channel).or_default().values.push(value);
                } else {
                    tracing::trace!(channel, "dropping value of unknown channel");
                }
            }
        }
    }

    fn close(&self, channel: u64) {
        let mut guard = self.state.lock();
        let state = &mut *guard;
        if state.channels.remove(&channel).is_some() || state.finished.remove(&channel) {
            tracing::debug!(channel, "channel closed by node");
        } else if state.pending > 0 {
            state.early.entry(channel).or_default().closed = true;
        }
    }

    fn disconnect(&self) {
        let mut state = self.state.lock();
        state.disconnected = true;
        state.early.clear();
        state.finished.clear();
        for (channel, tx) in state.channels.drain() {
            tracing::warn!(channel, "connection lost, closing channel");
            tx.send(Err(TransportError::Closed.into())).ok();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn drain(mut rx: ChannelRx) -> Vec<ClientResult<Value>> {
        let mut items = Vec::new();
        while let Some(item) = rx.recv().await {
            items.push(item);
        }
        items
    }

    #[tokio::test]
    async fn values_before_registration_are_kept() {
        let router = ChannelRouter::default();
        let pending = router.begin_subscribe();
        router.push(1, Value::from(10));
        router.push(1, Value::from(11));

        let rx = router.register(1);
        drop(pending);
        router.push(1, Value::from(12));
        router.close(1);

        let items = drain(rx).await;
        let values = items.into_iter().map(Result::unwrap).collect::<Vec<_>>();
        assert_eq!(values, [10, 11, 12]);
    }

    #[tokio::test]
    async fn close_before_registration() {
        let router = ChannelRouter::default();
        let _pending = router.begin_subscribe();
        router.push(3, Value::from("a"));
        router.close(3);

        let items = drain(router.register(3)).await;
        assert_eq!(items.len(), 1);
        assert!(router.state.lock().channels.is_empty());
    }

    #[tokio::test]
    async fn disconnect_ends_every_channel_once() {
        let router = ChannelRouter::default();
        let a = router.register(1);
        let b = router.register(2);
        router.push(2, Value::from(1));

        router.disconnect();

        let a = drain(a).await;
        assert_eq!(a.len(), 1);
        assert!(matches!(a[0], Err(ClientError::Transport(TransportError::Closed))));

        let b = drain(b).await;
        assert_eq!(b.len(), 2);
        assert!(b[0].is_ok());
        assert!(b[1].is_err());

        // No resubscription after the connection is gone.
        let late = drain(router.register(5)).await;
        assert_eq!(late.len(), 1);
        assert!(late[0].is_err());
    }

    #[tokio::test]
    async fn dropped_subscriber_is_forgotten() {
        let router = ChannelRouter::default();
        drop(router.register(7));
        for i in 0..1000 {
            router.push(7, Value::from(i));
        }

        let state = router.state.lock();
        assert!(!state.channels.contains_key(&7));
        assert!(state.early.is_empty());
        assert!(state.finished.contains(&7));
    }

    #[tokio::test]
    async fn released_channel_drops_values_until_closed() {
        let router = ChannelRouter::default();
        let rx = router.register(4);
        assert!(router.release(4));
        assert!(!router.release(4));
        drop(rx);

        // Another subscribe in flight must not buffer values of a released channel.
        let pending = router.begin_subscribe();
        router.push(4, Value::from(1));
        assert!(router.state.lock().early.is_empty());

        router.close(4);
        assert!(router.state.lock().finished.is_empty());
        drop(pending);
    }

    #[tokio::test]
    async fn unknown_channels_are_not_buffered() {
        let router = ChannelRouter::default();
        router.push(9, Value::from(1));
        router.close(9);
        assert!(router.state.lock().early.is_empty());

        let pending = router.begin_subscribe();
        router.push(9, Value::from(2));
        assert_eq!(router.state.lock().early.len(), 1);

        // The request failed, nobody will claim the values.
        drop(pending);
        let state = router.state.lock();
        assert!(state.early.is_empty());
        assert_eq!(state.pending, 0);
    }

    #[tokio::test]
    async fn closed_channel_is_not_released() {
        let router = ChannelRouter::default();
        let rx = router.register(2);
        router.close(2);
        assert!(drain(rx).await.is_empty());
        assert!(!router.release(2));
        assert!(router.state.lock().finished.is_empty());
    }
}
