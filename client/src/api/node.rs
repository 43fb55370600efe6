use async_trait::async_trait;
use openrpc_types::node::{NodeInfo, Permission};
use openrpc_util::serde_helpers;
use serde::Deserialize;

use crate::client::Client;
use crate::context::Context;
use crate::error::ClientResult;
use crate::method::Method;

/// Node administration. Admin only.
#[async_trait]
pub trait NodeApi {
    async fn node_info(&self, ctx: &Context) -> ClientResult<NodeInfo>;

    /// Sets the log level of the `name` subsystem, `*` for all of them.
    async fn node_log_level_set(&self, ctx: &Context, name: &str, level: &str) -> ClientResult<()>;

    /// Permissions granted to `token`.
    async fn node_auth_verify(&self, ctx: &Context, token: &str) -> ClientResult<Vec<Permission>>;

    /// Mints a new token with `permissions`.
    async fn node_auth_new(
        &self,
        ctx: &Context,
        permissions: &[Permission],
    ) -> ClientResult<Vec<u8>>;
}

#[async_trait]
impl NodeApi for Client {
    async fn node_info(&self, ctx: &Context) -> ClientResult<NodeInfo> {
        self.call(ctx, Method::NodeInfo, ()).await
    }

    async fn node_log_level_set(&self, ctx: &Context, name: &str, level: &str) -> ClientResult<()> {
        self.call(ctx, Method::NodeLogLevelSet, (name, level))
            .await
    }

    async fn node_auth_verify(&self, ctx: &Context, token: &str) -> ClientResult<Vec<Permission>> {
        self.call::<_, Option<_>>(ctx, Method::NodeAuthVerify, (token,))
            .await
            .map(Option::unwrap_or_default)
    }

    async fn node_auth_new(
        &self,
        ctx: &Context,
        permissions: &[Permission],
    ) -> ClientResult<Vec<u8>> {
        #[derive(Deserialize)]
        #[serde(transparent)]
        struct Token(#[serde(with = "serde_helpers::base64")] Vec<u8>);

        self.call::<_, Token>(ctx, Method::NodeAuthNew, (permissions,))
            .await
            .map(|token| token.0)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;
    use crate::transport::MockTransport;

    #[tokio::test]
    async fn auth_roundtrip() {
        let mock = MockTransport::new();
        mock.respond(Method::NodeAuthNew, "ZXlKaGJHY2lPaUpJVXpJMU5pSjk=")
            .respond(Method::NodeAuthVerify, ["read", "write"]);
        let client = Client::new(mock.clone(), Permission::Admin);
        let ctx = Context::background();

        let token = client
            .node_auth_new(&ctx, &Permission::Write.implied()[1..])
            .await
            .unwrap();
        assert_eq!(token, b"eyJhbGciOiJIUzI1NiJ9");

        let granted = client
            .node_auth_verify(&ctx, std::str::from_utf8(&token).unwrap())
            .await
            .unwrap();
        assert_eq!(granted, [Permission::Read, Permission::Write]);

        assert_eq!(mock.requests()[0].1, [serde_json::json!(["read", "write"])]);
        assert_eq!(mock.requests()[1].1, [Value::from("eyJhbGciOiJIUzI1NiJ9")]);
    }

    #[tokio::test]
    async fn write_token_cannot_administer() {
        let mock = MockTransport::new();
        let client = Client::new(mock.clone(), Permission::Write);

        let err = client
            .node_log_level_set(&Context::background(), "*", "debug")
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(mock.request_count(), 0);
    }
}
