//! Environment-driven configuration.

use secrecy::SecretString;

use crate::error::ConfigError;

const DEFAULT_PORT: u16 = 5000;

/// Everything the service needs at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Meta Graph API access token for outbound sends.
    pub access_token: SecretString,
    /// WhatsApp Business phone number id (the sender).
    pub phone_number_id: String,
    /// Pre-shared token for the webhook verification handshake.
    pub verify_token: SecretString,
    /// Spreadsheet holding the roster and submission tabs.
    pub spreadsheet_id: String,
    /// Bearer token for the Sheets API.
    pub sheets_token: SecretString,
    /// Port the webhook server binds on.
    pub port: u16,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        let port = match std::env::var("INTAKE_BOT_PORT") {
            Ok(raw) => raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: "INTAKE_BOT_PORT".into(),
                message: format!("not a port number: {raw}"),
            })?,
            Err(_) => DEFAULT_PORT,
        };

        Ok(Self {
            access_token: SecretString::from(require("WHATSAPP_ACCESS_TOKEN")?),
            phone_number_id: require("WHATSAPP_PHONE_NUMBER_ID")?,
            verify_token: SecretString::from(require("WHATSAPP_VERIFY_TOKEN")?),
            spreadsheet_id: require("SHEETS_SPREADSHEET_ID")?,
            sheets_token: SecretString::from(require("SHEETS_API_TOKEN")?),
            port,
        })
    }
}

fn require(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}
