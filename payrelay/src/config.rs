use std::{
    fmt::{self, Formatter},
    time::Duration,
};

use clap::Parser;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://api.payrelay.dev/2024-06-19";

#[derive(Deserialize, Serialize, Debug, Clone, Parser)]
pub struct PayRelaySettings {
    #[clap(long, env = "PAYRELAY_SECRET", hide_env_values = true)]
    pub secret: String,

    #[clap(long, env = "PAYRELAY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: Url,

    /// request timeout in milliseconds
    #[clap(
        long = "timeout-ms",
        env = "PAYRELAY_TIMEOUT_MS",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub timeout_ms: Option<u64>,
}

impl Default for PayRelaySettings {
    fn default() -> Self {
        Self {
            secret: String::new(),
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base url is valid"),
            timeout_ms: None,
        }
    }
}

// never print the secret
impl fmt::Display for PayRelaySettings {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "base_url: {}, timeout_ms: {:?}, secret: ****",
            self.base_url, self.timeout_ms
        )
    }
}

impl PayRelaySettings {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_owned(),
            ..Default::default()
        }
    }

    pub fn with_base_url(self, base_url: Url) -> Self {
        Self { base_url, ..self }
    }

    /// Sub-millisecond deadlines are rounded up to 1ms. A zero duration is kept
    /// as zero and rejected by `PayRelayClient::new`.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let mut timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        if timeout_ms == 0 && !timeout.is_zero() {
            timeout_ms = 1;
        }

        Self {
            timeout_ms: Some(timeout_ms),
            ..self
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}
