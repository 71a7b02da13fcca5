use forecast_bot::{router, AppState, BotConfig, BotError};
use sales_forecast::ReadyState;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), BotError> {
    // Load .env file (optional - won't fail if missing)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "forecast_bot=info,sales_forecast=info,tower_http=info".into()
            }),
        )
        .init();

    let config = BotConfig::from_env()?;
    if !config.bot_enabled() {
        warn!("TELEGRAM_TOKEN not set, bot endpoints are disabled");
    } else if config.webhook_url.is_none() {
        warn!("WEBHOOK_URL not set, /set_webhook will fail until it is configured");
    }

    let addr = config.socket_addr()?;
    let state = AppState::new(config)?;

    // Warm the model up without delaying the listener
    let warmup = state.clone();
    tokio::spawn(async move {
        match warmup.ensure_ready().await {
            Ok(ReadyState::Trained(report)) => {
                info!(mae = report.mae, rmse = report.rmse, "model trained at startup")
            }
            Ok(_) => info!("model ready"),
            Err(e) => error!(error = %e, "model warm-up failed, will retry on first request"),
        }
    });

    info!("forecast_bot v{} listening on {}", env!("CARGO_PKG_VERSION"), addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router(state)).await?;
    Ok(())
}
