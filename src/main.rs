use std::sync::{Arc, Mutex};

use tracing_subscriber::EnvFilter;

use fincabook::config::AppConfig;
use fincabook::db;
use fincabook::services::auth;
use fincabook::services::messaging::twilio::TwilioWhatsAppProvider;
use fincabook::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = AppConfig::from_env();

    let conn = db::init_db(&config.database_url)?;
    auth::seed_admin(&conn, &config)?;

    if !config.twilio_configured() {
        tracing::warn!("Twilio credentials missing, outbound messages will be simulated");
    }

    let messaging = TwilioWhatsAppProvider::new(
        config.twilio_account_sid.clone(),
        config.twilio_auth_token.clone(),
        config.twilio_whatsapp_number.clone(),
    );

    let state = Arc::new(AppState {
        db: Arc::new(Mutex::new(conn)),
        config: config.clone(),
        messaging: Box::new(messaging),
    });

    let app = fincabook::router(state);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
