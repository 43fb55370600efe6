//! Typed JSON-RPC client for a data-availability node.
//!
//! ```no_run
//! # async fn example() -> openrpc_client::ClientResult<()> {
//! use openrpc_client::prelude::*;
//!
//! let client = Client::connect(&ClientConfig::default()).await?;
//! let head = client.header_local_head(&Context::background()).await?;
//! println!("local head: {}", head.height());
//! # Ok(())
//! # }
//! ```

pub use openrpc_types as types;

pub use self::client::Client;
pub use self::config::ClientConfig;
pub use self::context::Context;
pub use self::error::{AuthError, ClientError, ClientResult, RemoteError, TransportError};
pub use self::method::{Method, MethodGroup, MethodKind};
pub use self::options::SubmitOptions;
pub use self::subscription::Subscription;

pub mod api;
pub mod transport;

mod client;
mod config;
mod context;
mod error;
mod method;
mod options;
mod subscription;

/// Everything needed to make calls.
pub mod prelude {
    pub use crate::api::{
        BlobApi, DasApi, FraudApi, HeaderApi, NodeApi, P2pApi, ShareApi, StateApi,
    };
    pub use crate::{Client, ClientConfig, ClientError, ClientResult, Context, SubmitOptions};
}
