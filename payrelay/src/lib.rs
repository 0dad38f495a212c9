//! Client for the PayRelay lightning payment api.
//!
//! ```no_run
//! use payrelay::{CreateInvoiceParams, PayRelayClient, PayRelaySettings};
//!
//! # async fn run() -> Result<(), payrelay::PayRelayError> {
//! let client = PayRelayClient::new(PayRelaySettings::new("00000000-0000-0000-0000-000000000000"))?;
//! let invoice = client
//!     .invoices()
//!     .create_invoice(&CreateInvoiceParams { amount: 100 })
//!     .await?;
//! println!("{}", invoice.payreq);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod fetch;
pub mod invoice;
pub mod lnurl;
pub mod model;
pub mod path;

pub use client::PayRelayClient;
pub use config::PayRelaySettings;
pub use error::PayRelayError;
pub use fetch::Fetch;
pub use invoice::InvoiceClient;
pub use lnurl::LnurlClient;
pub use model::{CreateInvoiceParams, CreateWithdrawalParams, Invoice, Withdrawal, WithdrawalState};
pub use path::ApiPath;
