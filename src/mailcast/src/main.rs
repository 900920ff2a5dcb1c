//! MailCast — multi-tenant email-campaign manager.
//!
//! Main entry point: loads configuration, owns the mail-transport
//! lifecycle, and starts the scheduler and HTTP server.

use clap::Parser;
use mailcast_api::auth::SessionStore;
use mailcast_api::{ApiServer, ApiState};
use mailcast_core::config::AppConfig;
use mailcast_delivery::{Dispatcher, DryRunTransport, MailTransport, ScheduleRunner, SmtpTransport};
use mailcast_reporting::CampaignAggregator;
use mailcast_store::seed::seed_demo_data;
use mailcast_store::Store;
use mailcast_tracking::EngagementTracker;
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "mailcast")]
#[command(about = "Multi-tenant email-campaign manager")]
#[command(version)]
struct Cli {
    /// HTTP port (overrides config)
    #[arg(long, env = "MAILCAST__API__HTTP_PORT")]
    http_port: Option<u16>,

    /// Log sends instead of talking to the SMTP relay
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Skip the scheduled-send runner (API-only mode)
    #[arg(long, default_value_t = false)]
    no_scheduler: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mailcast=info,tower_http=info".into()),
        )
        .json()
        .init();

    let cli = Cli::parse();

    info!("MailCast starting up");

    // Load configuration
    let mut config = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load config, using defaults");
        AppConfig::default()
    });
    if let Some(port) = cli.http_port {
        config.api.http_port = port;
    }

    info!(
        http_port = config.api.http_port,
        smtp_host = %config.smtp.host,
        min_send_interval_ms = config.dispatch.min_send_interval_ms,
        "Configuration loaded"
    );

    // Storage
    let store = Arc::new(Store::new());
    if config.seed_demo {
        seed_demo_data(&store);
    }

    // Mail transport. Lifecycle is owned here and injected; the session is
    // probed lazily on first dispatch.
    let transport: Arc<dyn MailTransport> = if cli.dry_run {
        info!("Dry-run mode: no mail will leave this process");
        Arc::new(DryRunTransport)
    } else {
        Arc::new(SmtpTransport::new(&config.smtp)?)
    };

    // Core services
    let dispatcher = Arc::new(Dispatcher::new(
        store.clone(),
        transport,
        config.dispatch.clone(),
        &config.tracking,
    ));
    let state = ApiState {
        tracker: Arc::new(EngagementTracker::new(store.clone())),
        aggregator: Arc::new(CampaignAggregator::new(store.clone())),
        sessions: Arc::new(SessionStore::new(config.auth.session_ttl_hours)),
        dispatcher: dispatcher.clone(),
        store: store.clone(),
    };

    // Scheduled-send runner
    if !cli.no_scheduler {
        ScheduleRunner::new(store, dispatcher, config.dispatch.scheduler_poll()).spawn();
    }

    // Serve
    let server = ApiServer::new(config, state);
    server.start_metrics()?;
    server.start_http().await
}
