use async_trait::async_trait;
use reqwest::Method;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::{error::PayRelayError, path::ApiPath};

#[cfg(test)]
use mockall::automock;

/// Capability to perform one authenticated round trip against the PayRelay api.
///
/// `PayRelayClient` is the real implementation. The resource clients only depend
/// on this trait, so they can run against a stub.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Sends `body` (or an empty payload) to `path` and returns the decoded json
    /// of a 200 response.
    async fn fetch(
        &self,
        method: Method,
        path: ApiPath,
        body: Option<Value>,
    ) -> Result<Value, PayRelayError>;
}

pub fn json_body<B: Serialize + ?Sized>(body: &B) -> Result<Option<Value>, PayRelayError> {
    serde_json::to_value(body)
        .map(Some)
        .map_err(PayRelayError::Serialize)
}

pub async fn fetch_json<F, T>(
    provider: &F,
    method: Method,
    path: ApiPath,
    body: Option<Value>,
) -> Result<T, PayRelayError>
where
    F: Fetch + ?Sized,
    T: DeserializeOwned,
{
    let value = provider.fetch(method, path, body).await?;
    serde_json::from_value(value).map_err(PayRelayError::Decode)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;
    use reqwest::Method;
    use serde::Deserialize;
    use serde_json::json;

    use super::{fetch_json, json_body, MockFetch};
    use crate::{error::PayRelayError, path::ApiPath};

    #[derive(Debug, Deserialize, PartialEq)]
    struct Amount {
        amount: u64,
    }

    #[test]
    fn test_json_body_serializes() -> anyhow::Result<()> {
        let body = json_body(&BTreeMap::from([("amount", 100)]))?;
        assert_eq!(Some(json!({"amount": 100})), body);
        Ok(())
    }

    #[test]
    fn test_json_body_serialize_error() {
        // non-string map keys can not be represented in json
        let body = BTreeMap::from([((1, 2), "x")]);
        assert!(matches!(json_body(&body), Err(PayRelayError::Serialize(_))));
    }

    #[tokio::test]
    async fn test_fetch_json_decodes_into_destination() -> anyhow::Result<()> {
        let mut provider = MockFetch::new();
        provider
            .expect_fetch()
            .withf(|method, path, body| {
                *method == Method::GET && path.to_string() == "/amount" && body.is_none()
            })
            .returning(|_, _, _| Ok(json!({"amount": 21})));

        let result: Amount =
            fetch_json(&provider, Method::GET, ApiPath::parse("amount")?, None).await?;
        assert_eq!(Amount { amount: 21 }, result);
        Ok(())
    }

    #[tokio::test]
    async fn test_fetch_json_decode_error() -> anyhow::Result<()> {
        let mut provider = MockFetch::new();
        provider
            .expect_fetch()
            .returning(|_, _, _| Ok(json!({"amount": "many"})));

        let result =
            fetch_json::<_, Amount>(&provider, Method::GET, ApiPath::parse("amount")?, None).await;
        assert!(matches!(result, Err(PayRelayError::Decode(_))));
        Ok(())
    }
}
