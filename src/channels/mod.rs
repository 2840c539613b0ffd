//! Outbound messaging abstraction.

pub mod whatsapp;

use async_trait::async_trait;

use crate::error::ChannelError;

pub use whatsapp::WhatsAppClient;

/// Sends one text message to one address. Single attempt; callers decide
/// whether a failure matters.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_text(&self, to: &str, body: &str) -> Result<(), ChannelError>;
}
