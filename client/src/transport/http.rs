use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Transport, ValueStream};
use crate::error::{AuthError, ClientResult, RemoteError, TransportError};
use crate::method::Method;

/// JSON-RPC over plain HTTP POST requests.
///
/// Does not support subscriptions.
pub struct HttpTransport {
    client: reqwest::Client,
    url: Url,
    next_id: AtomicU64,
}

impl HttpTransport {
    pub fn new(url: Url, auth_token: Option<&str>) -> ClientResult<Self> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::CONTENT_TYPE,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = auth_token {
            headers.insert(
                reqwest::header::AUTHORIZATION,
                super::bearer(token).map_err(TransportError::InvalidAuthToken)?,
            );
        }

        let client = reqwest::ClientBuilder::new()
            .default_headers(headers)
            .build()
            .map_err(TransportError::Http)?;

        Ok(Self {
            client,
            url,
            next_id: AtomicU64::new(1),
        })
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn post(&self, method: Method, params: &[Value]) -> ClientResult<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let response = self
            .client
            .post(self.url.clone())
            .json(&JrpcRequest {
                id,
                method: method.name(),
                params,
            })
            .send()
            .await
            .map_err(TransportError::Http)?;

        let status = response.status();
        if matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) {
            let body = response.text().await.unwrap_or_default();
            let reason = match body.trim() {
                "" => status.to_string(),
                body => body.to_owned(),
            };
            return Err(AuthError::Rejected(reason).into());
        }

        let res = response.text().await.map_err(TransportError::Http)?;
        tracing::trace!(id, res);

        match serde_json::from_str(&res) {
            Ok(JrpcResponse::Success(res)) => Ok(res),
            Ok(JrpcResponse::Err(err)) => Err(err.into()),
            Err(_) if !status.is_success() => Err(TransportError::Status(status).into()),
            Err(e) => Err(TransportError::InvalidResponse(e).into()),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, method: Method, params: Vec<Value>) -> ClientResult<Value> {
        self.post(method, &params).await
    }

    async fn subscribe(&self, _method: Method, _params: Vec<Value>) -> ClientResult<ValueStream> {
        Err(TransportError::SubscriptionsUnsupported("http").into())
    }
}

struct JrpcRequest<'a, T: ?Sized> {
    id: u64,
    method: &'a str,
    params: &'a T,
}

impl<T: Serialize + ?Sized> Serialize for JrpcRequest<'_, T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;

        let mut ser = serializer.serialize_struct("JrpcRequest", 4)?;
        ser.serialize_field("jsonrpc", "2.0")?;
        ser.serialize_field("id", &self.id)?;
        ser.serialize_field("method", self.method)?;
        ser.serialize_field("params", self.params)?;
        ser.end()
    }
}

enum JrpcResponse<T> {
    Success(T),
    Err(RemoteError),
}

impl<'de, T> Deserialize<'de> for JrpcResponse<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(de: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Debug, Deserialize)]
        #[serde(rename_all = "lowercase")]
        enum Field {
            Result,
            Error,
            #[serde(other)]
            Other,
        }

        struct ResponseVisitor<T>(PhantomData<T>);

        impl<'de, T> serde::de::Visitor<'de> for ResponseVisitor<T>
        where
            T: Deserialize<'de>,
        {
            type Value = JrpcResponse<T>;

            fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str("a JSON-RPC response object")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: serde::de::MapAccess<'de>,
            {
                let mut result = None::<JrpcResponse<T>>;

                while let Some(key) = map.next_key()? {
                    match key {
                        Field::Result if result.is_none() => {
                            result = Some(map.next_value().map(JrpcResponse::Success)?);
                        }
                        Field::Error if result.is_none() => {
                            result = Some(map.next_value().map(JrpcResponse::Err)?);
                        }
                        Field::Other => {
                            map.next_value::<serde::de::IgnoredAny>()?;
                        }
                        Field::Result => return Err(serde::de::Error::duplicate_field("result")),
                        Field::Error => return Err(serde::de::Error::duplicate_field("error")),
                    }
                }

                result.ok_or_else(|| serde::de::Error::missing_field("result or error"))
            }
        }

        de.deserialize_map(ResponseVisitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ClientError;

    #[test]
    fn request_shape() {
        let params = vec![Value::from(42), Value::from("AAAA")];
        let request = serde_json::to_value(JrpcRequest {
            id: 7,
            method: Method::BlobGet.name(),
            params: &params[..],
        })
        .unwrap();

        assert_eq!(
            request,
            serde_json::json!({
                "jsonrpc": "2.0",
                "id": 7,
                "method": "blob.Get",
                "params": [42, "AAAA"],
            })
        );
    }

    #[test]
    fn response_shape() {
        let json = r#"{"jsonrpc":"2.0","id":1,"result":null}"#;
        assert!(matches!(
            serde_json::from_str::<JrpcResponse<Value>>(json).unwrap(),
            JrpcResponse::Success(Value::Null)
        ));

        let json = r#"{"jsonrpc":"2.0","result":42,"id":1}"#;
        assert!(matches!(
            serde_json::from_str::<JrpcResponse<u64>>(json).unwrap(),
            JrpcResponse::Success(42)
        ));

        let json = r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"method 'blob.Nope' not found"},"id":1}"#;
        let JrpcResponse::Err(err) = serde_json::from_str::<JrpcResponse<Value>>(json).unwrap() else {
            panic!("expected an error");
        };
        assert_eq!(err.code, -32601);
        assert!(matches!(ClientError::from(err), ClientError::Remote(_)));

        let json = r#"{"jsonrpc":"2.0","error":{"code":1,"message":"missing permission to invoke 'AuthNew' (need 'admin')"},"id":1}"#;
        let JrpcResponse::Err(err) = serde_json::from_str::<JrpcResponse<Value>>(json).unwrap() else {
            panic!("expected an error");
        };
        assert!(ClientError::from(err).is_unauthorized());

        let invalid_json = r#"{"jsonrpc":"2.0","id":1}"#;
        assert!(serde_json::from_str::<JrpcResponse<Value>>(invalid_json).is_err());

        let duplicate = r#"{"result":1,"error":{"code":1,"message":""}}"#;
        assert!(serde_json::from_str::<JrpcResponse<Value>>(duplicate).is_err());
    }

    #[tokio::test]
    async fn subscriptions_are_unsupported() {
        let transport = HttpTransport::new(Url::parse("http://127.0.0.1:1").unwrap(), Some("token"))
            .unwrap();
        let res = transport.subscribe(Method::HeaderSubscribe, Vec::new()).await;
        assert!(matches!(
            res,
            Err(ClientError::Transport(TransportError::SubscriptionsUnsupported(_)))
        ));
    }

    #[test]
    fn invalid_token() {
        let res = HttpTransport::new(Url::parse("http://127.0.0.1:1").unwrap(), Some("bad\ntoken"));
        assert!(matches!(
            res,
            Err(ClientError::Transport(TransportError::InvalidAuthToken(_)))
        ));
    }
}
