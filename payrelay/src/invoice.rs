use reqwest::Method;

use crate::{
    error::PayRelayError,
    fetch::{fetch_json, json_body, Fetch},
    model::{CreateInvoiceParams, Invoice},
    path::ApiPath,
};

pub struct InvoiceClient<F> {
    provider: F,
}

impl<F: Fetch> InvoiceClient<F> {
    pub const fn new(provider: F) -> Self {
        Self { provider }
    }

    pub async fn create_invoice(
        &self,
        params: &CreateInvoiceParams,
    ) -> Result<Invoice, PayRelayError> {
        fetch_json(
            &self.provider,
            Method::POST,
            ApiPath::parse("/invoice/create")?,
            json_body(params)?,
        )
        .await
    }

    pub async fn query_invoice(&self, id: &str) -> Result<Invoice, PayRelayError> {
        fetch_json(
            &self.provider,
            Method::GET,
            ApiPath::from_segments(["invoice", id])?,
            None,
        )
        .await
    }
}
