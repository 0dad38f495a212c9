use reqwest::Method;
use serde_json::Value;

use crate::{
    error::PayRelayError,
    fetch::{fetch_json, json_body, Fetch},
    model::{CreateWithdrawalParams, CreateWithdrawalResponse, Withdrawal, WithdrawalResponse},
    path::ApiPath,
};

/// LNURL-withdraw links. Transport is delegated to any `Fetch` provider,
/// usually the parent `PayRelayClient`.
pub struct LnurlClient<F> {
    provider: F,
}

impl<F: Fetch> LnurlClient<F> {
    pub const fn new(provider: F) -> Self {
        Self { provider }
    }

    /// Creates a withdrawal link. A response without `state` is a freshly
    /// created link and is reported as `READY`.
    pub async fn create_withdrawal(
        &self,
        params: &CreateWithdrawalParams,
    ) -> Result<Withdrawal, PayRelayError> {
        let response: CreateWithdrawalResponse = fetch_json(
            &self.provider,
            Method::POST,
            ApiPath::parse("/lnurl/withdrawal/create")?,
            json_body(params)?,
        )
        .await?;

        response.try_into()
    }

    pub async fn query_withdrawal(&self, id: &str) -> Result<Withdrawal, PayRelayError> {
        let response: WithdrawalResponse = fetch_json(
            &self.provider,
            Method::GET,
            ApiPath::from_segments(["lnurl", "withdrawal", id])?,
            None,
        )
        .await?;

        response.try_into()
    }

    pub async fn delete_withdrawal(&self, id: &str) -> Result<(), PayRelayError> {
        let _: Value = fetch_json(
            &self.provider,
            Method::POST,
            ApiPath::from_segments(["lnurl", "withdrawal", id, "delete"])?,
            None,
        )
        .await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use reqwest::Method;
    use serde_json::{json, Value};

    use super::LnurlClient;
    use crate::{
        error::PayRelayError,
        fetch::MockFetch,
        model::{CreateWithdrawalParams, Withdrawal, WithdrawalState},
    };

    fn mock_response(
        expected_method: Method,
        expected_path: &'static str,
        response: Value,
    ) -> MockFetch {
        let mut provider = MockFetch::new();
        provider
            .expect_fetch()
            .withf(move |method, path, _| {
                *method == expected_method && path.to_string() == expected_path
            })
            .times(1)
            .returning(move |_, _, _| Ok(response.clone()));
        provider
    }

    #[tokio::test]
    async fn test_create_withdrawal_without_state_is_ready() -> anyhow::Result<()> {
        let mut provider = MockFetch::new();
        provider
            .expect_fetch()
            .withf(|method, path, body| {
                *method == Method::POST
                    && path.to_string() == "/lnurl/withdrawal/create"
                    && *body == Some(json!({"amount": 100, "description": "Hello World"}))
            })
            .returning(|_, _, _| Ok(json!({"lnurl": "LNURL1DP68", "id": "w1"})));

        let withdrawal = LnurlClient::new(provider)
            .create_withdrawal(&CreateWithdrawalParams::new(100, "Hello World"))
            .await?;
        assert_eq!(
            Withdrawal {
                lnurl: "LNURL1DP68".to_string(),
                id: "w1".to_string(),
                state: WithdrawalState::Ready,
            },
            withdrawal
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_create_withdrawal_with_state() -> anyhow::Result<()> {
        let provider = mock_response(
            Method::POST,
            "/lnurl/withdrawal/create",
            json!({"lnurl": "LNURL1DP68", "id": "w1", "state": "SCANNED"}),
        );

        let withdrawal = LnurlClient::new(provider)
            .create_withdrawal(
                &CreateWithdrawalParams::new(100, "Hello World")
                    .with_webhook_url("https://example.com/hook"),
            )
            .await?;
        assert_eq!(WithdrawalState::Scanned, withdrawal.state);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_withdrawal_scanned() -> anyhow::Result<()> {
        let provider = mock_response(
            Method::GET,
            "/lnurl/withdrawal/w1",
            json!({"lnurl": "LNURL1DP68", "id": "w1", "state": "SCANNED"}),
        );

        let withdrawal = LnurlClient::new(provider).query_withdrawal("w1").await?;
        assert_eq!(WithdrawalState::Scanned, withdrawal.state);
        assert_eq!("w1", withdrawal.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_withdrawal_callback() -> anyhow::Result<()> {
        let provider = mock_response(
            Method::GET,
            "/lnurl/withdrawal/w1",
            json!({"lnurl": "LNURL1DP68", "id": "w1", "state": "CALLBACK"}),
        );

        let withdrawal = LnurlClient::new(provider).query_withdrawal("w1").await?;
        assert_eq!(WithdrawalState::Callback, withdrawal.state);
        Ok(())
    }

    #[tokio::test]
    async fn test_query_withdrawal_unknown_state() {
        let provider = mock_response(
            Method::GET,
            "/lnurl/withdrawal/w1",
            json!({"lnurl": "LNURL1DP68", "id": "w1", "state": "BOGUS"}),
        );

        let result = LnurlClient::new(provider).query_withdrawal("w1").await;
        assert!(matches!(result, Err(PayRelayError::UnknownState(ref s)) if s == "BOGUS"));
    }

    #[tokio::test]
    async fn test_query_withdrawal_missing_state_is_decode_error() {
        // the query endpoint always carries a state; a missing one is not defaulted
        let provider = mock_response(
            Method::GET,
            "/lnurl/withdrawal/w1",
            json!({"lnurl": "LNURL1DP68", "id": "w1"}),
        );

        let result = LnurlClient::new(provider).query_withdrawal("w1").await;
        assert!(matches!(result, Err(PayRelayError::Decode(_))));
    }

    #[tokio::test]
    async fn test_delete_withdrawal_discards_response() -> anyhow::Result<()> {
        let provider = mock_response(
            Method::POST,
            "/lnurl/withdrawal/w1/delete",
            json!({"deleted": true}),
        );

        LnurlClient::new(provider).delete_withdrawal("w1").await?;
        Ok(())
    }

    #[tokio::test]
    async fn test_dot_ids_are_rejected_before_sending() {
        let mut provider = MockFetch::new();
        provider.expect_fetch().never();
        let lnurl = LnurlClient::new(provider);

        for id in [".", ".."] {
            assert!(matches!(
                lnurl.query_withdrawal(id).await,
                Err(PayRelayError::InvalidPath(_))
            ));
            assert!(matches!(
                lnurl.delete_withdrawal(id).await,
                Err(PayRelayError::InvalidPath(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_delete_withdrawal_api_error() {
        let mut provider = MockFetch::new();
        provider
            .expect_fetch()
            .returning(|_, _, _| {
                Err(PayRelayError::Api("withdrawal already claimed".to_string()))
            });

        let result = LnurlClient::new(provider).delete_withdrawal("w1").await;
        assert_eq!(
            "withdrawal already claimed",
            result.unwrap_err().to_string()
        );
    }
}
