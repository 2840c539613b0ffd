use std::sync::Arc;

use intake_bot::catalog::Catalog;
use intake_bot::channels::WhatsAppClient;
use intake_bot::config::Config;
use intake_bot::dispatch::IntakeService;
use intake_bot::sheets::GoogleSheets;
use intake_bot::webhook::{self, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = Config::from_env().unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        eprintln!("  required: WHATSAPP_ACCESS_TOKEN, WHATSAPP_PHONE_NUMBER_ID,");
        eprintln!("            WHATSAPP_VERIFY_TOKEN, SHEETS_SPREADSHEET_ID, SHEETS_API_TOKEN");
        std::process::exit(1);
    });

    eprintln!("🦷 Intake Bot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Webhook: http://0.0.0.0:{}/webhook", config.port);
    eprintln!("   Spreadsheet: {}", config.spreadsheet_id);

    let sheets = Arc::new(GoogleSheets::new(
        config.spreadsheet_id.clone(),
        config.sheets_token.clone(),
    ));
    let messenger = Arc::new(WhatsAppClient::new(
        config.phone_number_id.clone(),
        config.access_token.clone(),
    ));

    let service = Arc::new(IntakeService::new(
        Catalog::default(),
        sheets.clone(),
        sheets,
        messenger,
    ));

    let app = webhook::router(AppState {
        service,
        verify_token: config.verify_token.clone(),
    });

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port)).await?;
    tracing::info!(port = config.port, "webhook server started");
    axum::serve(listener, app).await?;

    Ok(())
}
