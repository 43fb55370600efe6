use openrpc_types::node::Permission;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("transport failed: {0}")]
    Transport(#[from] TransportError),
    #[error("node responded with an error: {0}")]
    Remote(RemoteError),
    #[error("unauthorized: {0}")]
    Unauthorized(#[from] AuthError),
    #[error("context cancelled")]
    Cancelled,
    #[error("context deadline exceeded")]
    DeadlineExceeded,
    #[error("failed to encode params: {0}")]
    InvalidParams(#[source] serde_json::Error),
}

impl ClientError {
    /// Whether the call ended because its context did.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, Self::Cancelled | Self::DeadlineExceeded)
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized(_))
    }
}

impl From<RemoteError> for ClientError {
    fn from(err: RemoteError) -> Self {
        if err.is_permission_denied() {
            Self::Unauthorized(AuthError::Rejected(err.message))
        } else {
            Self::Remote(err)
        }
    }
}

pub type ClientResult<T, E = ClientError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected http status: {0}")]
    Status(reqwest::StatusCode),
    #[error("auth token is not a valid header value")]
    InvalidAuthToken(#[source] reqwest::header::InvalidHeaderValue),
    #[cfg(feature = "ws")]
    #[error("websocket client failed: {0}")]
    Ws(#[source] jsonrpsee::core::client::Error),
    #[error("invalid response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
    #[error("subscriptions are not supported over {0}")]
    SubscriptionsUnsupported(&'static str),
    #[error("connection closed")]
    Closed,
}

/// JSON-RPC error object returned by the node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{message} (code {code})")]
pub struct RemoteError {
    pub code: i64,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl RemoteError {
    const MISSING_PERMISSION: &'static str = "missing permission";

    pub fn new<S: Into<String>>(code: i64, message: S) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// The node refused the token for this method.
    pub fn is_permission_denied(&self) -> bool {
        self.message.starts_with(Self::MISSING_PERMISSION)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{method} requires {required} permission, client has {granted}")]
    InsufficientPermission {
        method: &'static str,
        required: Permission,
        granted: Permission,
    },
    #[error("rejected by node: {0}")]
    Rejected(String),
}
