use std::future::Future;
use std::marker::PhantomData;
use std::pin::Pin;
use std::task::{Context as TaskContext, Poll};

use futures_util::Stream;
use serde::de::DeserializeOwned;

use crate::context::Context;
use crate::error::{ClientError, ClientResult, TransportError};
use crate::method::Method;
use crate::transport::ValueStream;

/// Values pushed by the node for a subscription method.
///
/// Ends when the node closes the channel, the connection is lost or the
/// context used to open it ends. Nothing is yielded after that. A finished
/// subscription is not reopened, call the method again instead.
///
/// Ending it on the client side (context or drop) releases the channel on
/// the node as well.
pub struct Subscription<T> {
    method: Method,
    inner: Option<ValueStream>,
    done: Pin<Box<dyn Future<Output = ClientError> + Send>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Subscription<T> {
    pub(crate) fn new(ctx: &Context, method: Method, inner: ValueStream) -> Self {
        let ctx = ctx.clone();
        tracing::info!(%method, "subscription opened");

        Self {
            method,
            inner: Some(inner),
            done: Box::pin(async move { ctx.done().await }),
            _marker: PhantomData,
        }
    }

    pub fn method(&self) -> Method {
        self.method
    }

    pub fn is_terminated(&self) -> bool {
        self.inner.is_none()
    }

    fn finish(&mut self, reason: &str) {
        if self.inner.take().is_some() {
            tracing::info!(method = %self.method, reason, "subscription closed");
        }
    }
}

impl<T: DeserializeOwned> Stream for Subscription<T> {
    type Item = ClientResult<T>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut TaskContext<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        let Some(inner) = this.inner.as_mut() else {
            return Poll::Ready(None);
        };

        // Context first, so that nothing is delivered after it ends.
        if this.done.as_mut().poll(cx).is_ready() {
            this.finish("context ended");
            return Poll::Ready(None);
        }

        match inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(value))) => Poll::Ready(Some(
                serde_json::from_value(value)
                    .map_err(|e| TransportError::InvalidResponse(e).into()),
            )),
            Poll::Ready(Some(Err(e))) => Poll::Ready(Some(Err(e))),
            Poll::Ready(None) => {
                this.finish("channel closed");
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        self.finish("dropped");
    }
}
