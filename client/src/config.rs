use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use openrpc_types::node::Permission;
use openrpc_util::serde_helpers;
use reqwest::Url;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Node RPC endpoint. `ws://` and `wss://` urls enable subscriptions.
    ///
    /// Default: `http://127.0.0.1:26658`.
    #[serde(with = "serde_helpers::string")]
    pub url: Url,

    /// Bearer token attached to every request.
    ///
    /// Default: none.
    pub auth_token: Option<String>,

    /// Permission granted to `auth_token`. Calls which require more are
    /// rejected without contacting the node.
    ///
    /// Default: `read`.
    pub permission: Permission,

    /// Timeout of a single request. Blocking waits (`das.WaitCatchUp`,
    /// `header.SyncWait`) and subscriptions are not affected.
    ///
    /// Default: 1 minute.
    #[serde(with = "serde_helpers::humantime")]
    pub request_timeout: Duration,
}

impl ClientConfig {
    pub const DEFAULT_URL: &'static str = "http://127.0.0.1:26658";

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        serde_helpers::load_json_from_file(path)
    }

    pub fn is_websocket(&self) -> bool {
        matches!(self.url.scheme(), "ws" | "wss")
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: Url::parse(Self::DEFAULT_URL).unwrap_or_else(|_| unreachable!()),
            auth_token: None,
            permission: Permission::Read,
            request_timeout: Duration::from_secs(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"url": "ws://localhost:26658", "permission": "admin", "request_timeout": "5s"}"#,
        )
        .unwrap();

        assert!(config.is_websocket());
        assert_eq!(config.permission, Permission::Admin);
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.auth_token, None);

        let default = ClientConfig::default();
        assert!(!default.is_websocket());
        assert_eq!(default.permission, Permission::Read);
    }

    #[test]
    fn invalid_fields_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.json");
        std::fs::write(&path, r#"{"permission": "root"}"#).unwrap();

        let err = ClientConfig::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("permission"), "{err}");
    }
}
