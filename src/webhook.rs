//! Inbound webhook — the Meta Graph API delivers messages here.
//!
//! `GET /webhook` answers the platform's verification handshake;
//! `POST /webhook` receives message payloads. Deliveries are always
//! acknowledged with 200 so the platform never builds a redelivery backlog.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tower_http::trace::TraceLayer;

use crate::dispatch::IntakeService;

/// Shared state for the webhook routes.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<IntakeService>,
    pub verify_token: SecretString,
}

/// Query parameters of the Meta verification handshake.
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// GET /webhook: echo the challenge when the pre-shared token matches.
async fn verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    match (params.mode, params.verify_token, params.challenge) {
        (Some(_), Some(token), Some(challenge))
            if token == state.verify_token.expose_secret() =>
        {
            (StatusCode::OK, challenge).into_response()
        }
        _ => {
            tracing::warn!("webhook verification failed");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// POST /webhook: process at most one text message per delivery.
///
/// The body is parsed leniently: anything that isn't a text message (status
/// updates, media, malformed JSON) is acknowledged and dropped.
async fn receive(State(state): State<AppState>, body: String) -> StatusCode {
    match serde_json::from_str::<serde_json::Value>(&body) {
        Ok(payload) => {
            if let Some((from, text)) = extract_text_message(&payload) {
                state.service.handle_message(&from, &text).await;
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "ignoring unparsable webhook body");
        }
    }
    StatusCode::OK
}

/// Pull `(from, text)` out of a Graph webhook payload.
///
/// A message with no text body yields an empty string; the state machine
/// treats that as no actionable input at steps that need one.
fn extract_text_message(payload: &serde_json::Value) -> Option<(String, String)> {
    let message = payload
        .get("entry")?
        .get(0)?
        .get("changes")?
        .get(0)?
        .get("value")?
        .get("messages")?
        .get(0)?;

    let from = message.get("from")?.as_str()?.to_string();
    let text = message
        .get("text")
        .and_then(|t| t.get("body"))
        .and_then(serde_json::Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some((from, text))
}

async fn health() -> &'static str {
    "ok"
}

/// Build the webhook router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/webhook", get(verify).post(receive))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
