use async_trait::async_trait;
use futures_util::stream::BoxStream;
use reqwest::header::{HeaderValue, InvalidHeaderValue};
use serde_json::Value;

use crate::error::ClientResult;
use crate::method::Method;

pub use self::http::HttpTransport;
#[cfg(any(test, feature = "test"))]
pub use self::mock::{MockReply, MockTransport};
#[cfg(feature = "ws")]
pub use self::ws::WsTransport;

mod http;
#[cfg(any(test, feature = "test"))]
mod mock;
#[cfg(feature = "ws")]
mod ws;

/// Raw values pushed by the node for a single subscription.
pub type ValueStream = BoxStream<'static, ClientResult<Value>>;

/// Moves JSON-RPC messages between the client and the node.
///
/// Implementations do not check permissions or contexts, this is done once
/// by the [`Client`](crate::Client) for every transport.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends a single request with positional `params`.
    async fn request(&self, method: Method, params: Vec<Value>) -> ClientResult<Value>;

    /// Opens a channel subscription. The stream ends when the node closes
    /// the channel or the connection is lost.
    async fn subscribe(&self, method: Method, params: Vec<Value>) -> ClientResult<ValueStream>;
}

fn bearer(token: &str) -> Result<HeaderValue, InvalidHeaderValue> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}"))?;
    value.set_sensitive(true);
    Ok(value)
}
