use attendance_hub::config::Config;
use attendance_hub::router::{AppState, attendance_router};
use attendance_hub::service::{FormsService, TrackingNotifier};
use attendance_hub::shutdown::shutdown_signal;
use mimalloc::MiMalloc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::from_filename(".env.local").ok();
    dotenvy::dotenv().ok();

    let cfg = Config::load()?;

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cfg.loglevel.clone()));
    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_level(true)
                .with_target(false),
        )
        .init();

    info!(
        listen_addr = %cfg.listen_addr,
        database_url = %cfg.database_url.as_deref().unwrap_or("<none>"),
        data_path = %cfg.data_path.display(),
        proxy = %cfg.proxy.as_ref().map(|u| u.as_str()).unwrap_or("<none>"),
        loglevel = %cfg.loglevel,
    );
    if cfg.google_sheets_api_key.is_none() {
        warn!("GOOGLE_SHEETS_API_KEY not set; instructor sheet reads will be unavailable");
    }

    let store = attendance_hub::db::open(&cfg).await?;
    let notifier = TrackingNotifier::new(&cfg, cfg.http_client()?);
    let forms = FormsService::new(store, notifier);

    let state = AppState::new(forms.clone(), cfg.google_sheets_api_key.clone());
    let app = attendance_router(state);

    let listener = TcpListener::bind(&cfg.listen_addr).await?;
    info!("HTTP server listening on {}", cfg.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    forms.close().await;
    info!("server stopped");
    Ok(())
}
