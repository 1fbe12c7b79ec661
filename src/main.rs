use chama_ledger::{
    config::{database, settings::Settings},
    core::member,
    errors::Result,
};
use chrono::Utc;
use dotenvy::dotenv;
use std::time::Duration;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Cadence of the member status refresh.
const REFRESH_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file (as early as possible)
    dotenv().ok(); // Non-fatal, env vars can be set externally

    // 3. Load the group policy settings
    let settings = Settings::load_or_default("config.toml")
        .inspect(|s| info!(group = %s.group_name, "loaded group policy settings"))
        .inspect_err(|e| error!("Failed to load settings: {e}"))?;

    // 4. Initialize database
    let db = database::connect_and_init()
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {e}"))?;

    // 5. Refresh member statuses at startup, then daily. The refresh is
    //    idempotent, so a missed or doubled tick is harmless.
    let thresholds = settings.member_status_thresholds;
    let mut ticker = tokio::time::interval(REFRESH_INTERVAL);
    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) =
                    member::refresh_all_member_statuses(&db, Utc::now(), &thresholds).await
                {
                    error!("Member status refresh failed: {e}");
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                break;
            }
        }
    }

    Ok(())
}
