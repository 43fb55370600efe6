use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::StreamExt;
use openrpc_util::FastHashMap;
use parking_lot::Mutex;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::mpsc;

use super::{Transport, ValueStream};
use crate::error::{ClientError, ClientResult, RemoteError};
use crate::method::Method;

/// Scripted reply of a [`MockTransport`] handler.
pub enum MockReply {
    Value(Value),
    Error(ClientError),
    /// The request never completes.
    Pending,
}

type Handler = Box<dyn Fn(&[Value]) -> MockReply + Send + Sync>;
type ItemRx = mpsc::UnboundedReceiver<ClientResult<Value>>;

/// In-memory transport with scripted replies and a request log.
#[derive(Clone, Default)]
pub struct MockTransport {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    handlers: Mutex<FastHashMap<Method, Handler>>,
    subscriptions: Mutex<FastHashMap<Method, VecDeque<ItemRx>>>,
    requests: Mutex<Vec<(Method, Vec<Value>)>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies to `method` with whatever `f` returns for the params.
    pub fn on<F>(&self, method: Method, f: F) -> &Self
    where
        F: Fn(&[Value]) -> MockReply + Send + Sync + 'static,
    {
        self.inner.handlers.lock().insert(method, Box::new(f));
        self
    }

    /// Always replies to `method` with `value`.
    pub fn respond<T: Serialize>(&self, method: Method, value: T) -> &Self {
        let reply = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => panic!("mock reply for {method} is not serializable: {e}"),
        };
        self.on(method, move |_| MockReply::Value(reply.clone()))
    }

    /// Always fails `method` with a fresh error from `f`.
    pub fn fail<F>(&self, method: Method, f: F) -> &Self
    where
        F: Fn() -> ClientError + Send + Sync + 'static,
    {
        self.on(method, move |_| MockReply::Error(f()))
    }

    /// Leaves every request to `method` hanging.
    pub fn hang(&self, method: Method) -> &Self {
        self.on(method, |_| MockReply::Pending)
    }

    /// Queues a subscription for `method`. Items sent to the returned
    /// sender are delivered to the subscriber, dropping it closes the
    /// stream.
    pub fn subscription(&self, method: Method) -> mpsc::UnboundedSender<ClientResult<Value>> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.inner
            .subscriptions
            .lock()
            .entry(method)
            .or_default()
            .push_back(rx);
        tx
    }

    /// All requests and subscriptions seen so far, in order.
    pub fn requests(&self) -> Vec<(Method, Vec<Value>)> {
        self.inner.requests.lock().clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.lock().len()
    }

    fn record(&self, method: Method, params: &[Value]) {
        self.inner.requests.lock().push((method, params.to_vec()));
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn request(&self, method: Method, params: Vec<Value>) -> ClientResult<Value> {
        self.record(method, &params);

        let reply = match self.inner.handlers.lock().get(&method) {
            Some(handler) => handler(&params),
            None => MockReply::Error(method_not_found(method)),
        };

        match reply {
            MockReply::Value(value) => Ok(value),
            MockReply::Error(e) => Err(e),
            MockReply::Pending => std::future::pending().await,
        }
    }

    async fn subscribe(&self, method: Method, params: Vec<Value>) -> ClientResult<ValueStream> {
        self.record(method, &params);

        let rx = self
            .inner
            .subscriptions
            .lock()
            .get_mut(&method)
            .and_then(VecDeque::pop_front);

        match rx {
            Some(rx) => Ok(futures_util::stream::unfold(rx, |mut rx| async move {
                rx.recv().await.map(|item| (item, rx))
            })
            .boxed()),
            None => Err(method_not_found(method)),
        }
    }
}

fn method_not_found(method: Method) -> ClientError {
    RemoteError::new(-32601, format!("method '{method}' not found")).into()
}
