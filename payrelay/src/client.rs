use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{
    header::{HeaderValue, ACCEPT, CONTENT_TYPE},
    Method, StatusCode,
};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::{
    config::PayRelaySettings,
    error::PayRelayError,
    fetch::Fetch,
    invoice::InvoiceClient,
    lnurl::LnurlClient,
    model::ErrorResponse,
    path::ApiPath,
};

/// Handle to the PayRelay api. Cloning is cheap and clones share the
/// underlying connection pool.
#[derive(Clone)]
pub struct PayRelayClient {
    settings: Arc<PayRelaySettings>,
    reqwest_client: reqwest::Client,
    cancel: CancellationToken,
}

impl PayRelayClient {
    pub fn new(settings: PayRelaySettings) -> Result<Self, PayRelayError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = settings.timeout() {
            if timeout.is_zero() {
                return Err(PayRelayError::InvalidTimeout);
            }
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_reqwest_client(settings, builder.build()?))
    }

    pub fn with_reqwest_client(
        settings: PayRelaySettings,
        reqwest_client: reqwest::Client,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            reqwest_client,
            cancel: CancellationToken::new(),
        }
    }

    /// Returns a handle whose requests are aborted with `PayRelayError::Cancelled`
    /// once `cancel` fires.
    pub fn with_cancellation(&self, cancel: CancellationToken) -> Self {
        Self {
            cancel,
            ..self.clone()
        }
    }

    pub fn settings(&self) -> &PayRelaySettings {
        &self.settings
    }

    pub fn invoices(&self) -> InvoiceClient<Self> {
        InvoiceClient::new(self.clone())
    }

    pub fn lnurl(&self) -> LnurlClient<Self> {
        LnurlClient::new(self.clone())
    }

    async fn round_trip(
        &self,
        method: Method,
        url: Url,
        body: Option<Value>,
    ) -> Result<Value, PayRelayError> {
        let payload = match body {
            Some(body) => serde_json::to_vec(&body).map_err(PayRelayError::Serialize)?,
            None => Vec::new(),
        };

        let response = self
            .reqwest_client
            .request(method, url)
            .bearer_auth(&self.settings.secret)
            .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .body(payload)
            .send()
            .await?;

        let status = response.status();
        debug!("response status: {}", status);

        if status == StatusCode::NOT_FOUND {
            return Err(PayRelayError::NotFound);
        }

        let bytes = response.bytes().await?;

        if status != StatusCode::OK {
            let data =
                serde_json::from_slice::<ErrorResponse>(&bytes).map_err(PayRelayError::Decode)?;
            warn!("payrelay returned {}: {}", status, data.error.message);
            return Err(PayRelayError::Api(data.error.message));
        }

        // delete answers with an empty body on success
        if bytes.is_empty() {
            return Ok(Value::Null);
        }

        serde_json::from_slice(&bytes).map_err(PayRelayError::Decode)
    }
}

#[async_trait]
impl Fetch for PayRelayClient {
    #[instrument(level = "debug", skip(self, body), err)]
    async fn fetch(
        &self,
        method: Method,
        path: ApiPath,
        body: Option<Value>,
    ) -> Result<Value, PayRelayError> {
        let url = path.join_onto(&self.settings.base_url)?;

        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(PayRelayError::Cancelled),
            result = self.round_trip(method, url, body) => result,
        }
    }
}
