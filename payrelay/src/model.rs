use std::{
    fmt::{self, Display, Formatter},
    str::FromStr,
};

use serde::{Deserialize, Serialize};

use crate::error::PayRelayError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorMessage {
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateInvoiceParams {
    pub amount: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Invoice {
    pub id: String,
    pub state: String,
    pub amount: u64,
    pub payreq: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateWithdrawalParams {
    pub amount: u64,
    pub description: String,
    #[serde(rename = "webhookURL", skip_serializing_if = "Option::is_none")]
    pub webhook_url: Option<String>,
}

impl CreateWithdrawalParams {
    pub fn new(amount: u64, description: &str) -> Self {
        Self {
            amount,
            description: description.to_owned(),
            webhook_url: None,
        }
    }

    pub fn with_webhook_url(self, webhook_url: &str) -> Self {
        Self {
            webhook_url: Some(webhook_url.to_owned()),
            ..self
        }
    }
}

/// Server side lifecycle of a withdrawal link: `READY -> SCANNED -> CALLBACK`.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum WithdrawalState {
    Ready,
    Scanned,
    Callback,
}

impl FromStr for WithdrawalState {
    type Err = PayRelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "READY" => Ok(Self::Ready),
            "SCANNED" => Ok(Self::Scanned),
            "CALLBACK" => Ok(Self::Callback),
            _ => Err(PayRelayError::UnknownState(s.to_owned())),
        }
    }
}

impl Display for WithdrawalState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "READY"),
            Self::Scanned => write!(f, "SCANNED"),
            Self::Callback => write!(f, "CALLBACK"),
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Withdrawal {
    pub lnurl: String,
    pub id: String,
    pub state: WithdrawalState,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct WithdrawalResponse {
    pub lnurl: String,
    pub id: String,
    pub state: String,
}

/// The create endpoint may omit `state` for a link that was just created.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct CreateWithdrawalResponse {
    pub lnurl: String,
    pub id: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl TryFrom<WithdrawalResponse> for Withdrawal {
    type Error = PayRelayError;

    fn try_from(response: WithdrawalResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            state: response.state.parse()?,
            lnurl: response.lnurl,
            id: response.id,
        })
    }
}

impl TryFrom<CreateWithdrawalResponse> for Withdrawal {
    type Error = PayRelayError;

    fn try_from(response: CreateWithdrawalResponse) -> Result<Self, Self::Error> {
        let state = match response.state {
            Some(state) => state.parse()?,
            None => WithdrawalState::Ready,
        };

        Ok(Self {
            lnurl: response.lnurl,
            id: response.id,
            state,
        })
    }
}
