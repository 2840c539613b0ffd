//! WhatsApp channel — sends messages through the Meta Graph API.
//!
//! Inbound traffic arrives via the webhook (see [`crate::webhook`]); this
//! module only covers the outbound side.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use crate::channels::Messenger;
use crate::error::ChannelError;

const GRAPH_API_BASE: &str = "https://graph.facebook.com/v18.0";

/// Client for one WhatsApp Business phone number.
pub struct WhatsAppClient {
    phone_number_id: String,
    access_token: SecretString,
    client: reqwest::Client,
}

impl WhatsAppClient {
    pub fn new(phone_number_id: String, access_token: SecretString) -> Self {
        Self {
            phone_number_id,
            access_token,
            client: reqwest::Client::new(),
        }
    }

    fn messages_url(&self) -> String {
        format!("{GRAPH_API_BASE}/{}/messages", self.phone_number_id)
    }
}

/// Request body for a plain text message.
fn text_payload(to: &str, body: &str) -> serde_json::Value {
    serde_json::json!({
        "messaging_product": "whatsapp",
        "to": to,
        "text": { "body": body },
    })
}

#[async_trait]
impl Messenger for WhatsAppClient {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), ChannelError> {
        let resp = self
            .client
            .post(self.messages_url())
            .bearer_auth(self.access_token.expose_secret())
            .json(&text_payload(to, body))
            .send()
            .await
            .map_err(|e| ChannelError::SendFailed {
                name: "whatsapp".into(),
                reason: e.to_string(),
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let err = resp.text().await.unwrap_or_default();
            return Err(ChannelError::SendFailed {
                name: "whatsapp".into(),
                reason: format!("sendMessage failed ({status}): {err}"),
            });
        }

        tracing::debug!(%to, "WhatsApp message sent");
        Ok(())
    }
}
