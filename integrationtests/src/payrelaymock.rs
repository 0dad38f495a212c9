use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderMap, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::net::TcpListener;

pub const MOCK_SECRET: &str = "00000000-0000-0000-0000-000000000000";
pub const MOCK_API_PREFIX: &str = "/2024-06-19";
pub const MOCK_BALANCE: u64 = 10_000;

/// Invoice ids with canned behaviour.
pub const SLOW_INVOICE_ID: &str = "slow";
pub const BROKEN_INVOICE_ID: &str = "broken";
pub const PENDING_INVOICE_ID: &str = "pending";

#[derive(Debug, Deserialize)]
struct CreateInvoiceRequest {
    amount: u64,
}

#[derive(Clone, Debug, Serialize)]
struct InvoiceResponse {
    id: String,
    state: String,
    amount: u64,
    payreq: String,
}

#[derive(Debug, Deserialize)]
struct CreateWithdrawalRequest {
    amount: u64,
    description: String,
    #[serde(rename = "webhookURL")]
    webhook_url: Option<String>,
}

#[derive(Clone, Debug)]
pub struct MockWithdrawal {
    pub lnurl: String,
    pub id: String,
    pub state: String,
    pub amount: u64,
    pub description: String,
    pub webhook_url: Option<String>,
}

/// Raw request as seen by the mock, for asserting what the client sent.
#[derive(Clone, Debug)]
pub struct RecordedRequest {
    pub path: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub accept: Option<String>,
    pub body: Bytes,
}

#[derive(Default)]
struct MockState {
    next_id: u64,
    invoices: HashMap<String, InvoiceResponse>,
    withdrawals: HashMap<String, MockWithdrawal>,
    requests: Vec<RecordedRequest>,
}

type SharedState = Arc<Mutex<MockState>>;

#[derive(Clone)]
pub struct PayRelayMock {
    addr: SocketAddr,
    state: SharedState,
}

impl PayRelayMock {
    pub fn base_url(&self) -> String {
        format!("http://{}{}", self.addr, MOCK_API_PREFIX)
    }

    pub fn set_withdrawal_state(&self, id: &str, state: &str) {
        if let Some(withdrawal) = self.lock().withdrawals.get_mut(id) {
            withdrawal.state = state.to_owned();
        }
    }

    pub fn withdrawal(&self, id: &str) -> Option<MockWithdrawal> {
        self.lock().withdrawals.get(id).cloned()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.lock().requests.last().cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state poisoned")
    }
}

/// Binds the mock on an ephemeral localhost port and serves it in the background.
pub async fn start() -> anyhow::Result<PayRelayMock> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let state = SharedState::default();

    let router = app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });

    Ok(PayRelayMock { addr, state })
}

fn app(state: SharedState) -> Router {
    let api = Router::new()
        .route("/invoice/create", post(post_invoice))
        .route("/invoice/:id", get(get_invoice))
        .route("/lnurl/withdrawal/create", post(post_withdrawal))
        .route("/lnurl/withdrawal/:id", get(get_withdrawal))
        .route("/lnurl/withdrawal/:id/delete", post(delete_withdrawal))
        .with_state(state);

    Router::new().nest(MOCK_API_PREFIX, api)
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": { "message": message } }))).into_response()
}

fn header_value(headers: &HeaderMap, name: axum::http::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

// records the request and rejects it unless it carries the mock secret
fn authorize(
    state: &SharedState,
    path: String,
    headers: &HeaderMap,
    body: &Bytes,
) -> Result<(), Response> {
    let expected = format!("Bearer {MOCK_SECRET}");
    let authorization = header_value(headers, AUTHORIZATION);
    let authorized = authorization.as_deref() == Some(expected.as_str());

    state
        .lock()
        .expect("mock state poisoned")
        .requests
        .push(RecordedRequest {
            path,
            authorization,
            content_type: header_value(headers, CONTENT_TYPE),
            accept: header_value(headers, ACCEPT),
            body: body.clone(),
        });

    if authorized {
        Ok(())
    } else {
        Err(error_response(StatusCode::UNAUTHORIZED, "invalid api secret"))
    }
}

fn parse_body<T: serde::de::DeserializeOwned>(body: &Bytes) -> Result<T, Response> {
    serde_json::from_slice(body)
        .map_err(|e| error_response(StatusCode::BAD_REQUEST, &format!("invalid body: {e}")))
}

async fn post_invoice(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InvoiceResponse>, Response> {
    authorize(&state, "/invoice/create".to_owned(), &headers, &body)?;
    let request: CreateInvoiceRequest = parse_body(&body)?;

    if request.amount == 0 {
        return Err(error_response(
            StatusCode::BAD_REQUEST,
            "amount must be greater than zero",
        ));
    }

    let mut state = state.lock().expect("mock state poisoned");
    state.next_id += 1;
    let invoice = InvoiceResponse {
        id: format!("inv-{}", state.next_id),
        state: "READY".to_owned(),
        amount: request.amount,
        payreq: format!("lnbcrt{}n1pmock", request.amount),
    };
    state.invoices.insert(invoice.id.clone(), invoice.clone());

    Ok(Json(invoice))
}

async fn get_invoice(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InvoiceResponse>, Response> {
    authorize(&state, format!("/invoice/{id}"), &headers, &body)?;

    match id.as_str() {
        SLOW_INVOICE_ID => {
            tokio::time::sleep(Duration::from_secs(10)).await;
        }
        BROKEN_INVOICE_ID => {
            return Err(
                (StatusCode::INTERNAL_SERVER_ERROR, "<html>bad gateway</html>").into_response(),
            );
        }
        PENDING_INVOICE_ID => {
            return Err(error_response(
                StatusCode::ACCEPTED,
                "invoice is still being created",
            ));
        }
        _ => {}
    }

    let invoice = state
        .lock()
        .expect("mock state poisoned")
        .invoices
        .get(&id)
        .cloned();

    // not found answers with a body that is not the error shape on purpose
    invoice
        .map(Json)
        .ok_or_else(|| (StatusCode::NOT_FOUND, "no such invoice").into_response())
}

async fn post_withdrawal(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, Response> {
    authorize(&state, "/lnurl/withdrawal/create".to_owned(), &headers, &body)?;
    let request: CreateWithdrawalRequest = parse_body(&body)?;

    if request.amount > MOCK_BALANCE {
        return Err(error_response(StatusCode::BAD_REQUEST, "insufficient funds"));
    }

    let mut state = state.lock().expect("mock state poisoned");
    state.next_id += 1;
    let withdrawal = MockWithdrawal {
        lnurl: format!("LNURL1DP68GURN8GHJ7MOCK{}", state.next_id),
        id: format!("wd-{}", state.next_id),
        state: "READY".to_owned(),
        amount: request.amount,
        description: request.description,
        webhook_url: request.webhook_url,
    };
    state
        .withdrawals
        .insert(withdrawal.id.clone(), withdrawal.clone());

    // the create endpoint does not report a state
    Ok(Json(json!({ "lnurl": withdrawal.lnurl, "id": withdrawal.id })))
}

async fn get_withdrawal(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, Response> {
    authorize(&state, format!("/lnurl/withdrawal/{id}"), &headers, &body)?;

    let withdrawal = state
        .lock()
        .expect("mock state poisoned")
        .withdrawals
        .get(&id)
        .cloned()
        .ok_or_else(|| StatusCode::NOT_FOUND.into_response())?;

    Ok(Json(json!({
        "lnurl": withdrawal.lnurl,
        "id": withdrawal.id,
        "state": withdrawal.state,
    })))
}

async fn delete_withdrawal(
    State(state): State<SharedState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, Response> {
    authorize(&state, format!("/lnurl/withdrawal/{id}/delete"), &headers, &body)?;

    let mut state = state.lock().expect("mock state poisoned");
    match state.withdrawals.get(&id).map(|w| w.state.clone()) {
        None => Err(StatusCode::NOT_FOUND.into_response()),
        Some(current) if current == "CALLBACK" => Err(error_response(
            StatusCode::CONFLICT,
            "withdrawal already claimed",
        )),
        Some(_) => {
            state.withdrawals.remove(&id);
            // empty body on success
            Ok(StatusCode::OK)
        }
    }
}
